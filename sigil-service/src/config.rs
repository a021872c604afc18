use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    /// Mail provider API key. Absent means delivery is disabled and the
    /// send endpoint reports persistence-only success.
    pub mail_api_key: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("SIGIL_PORT", "8787"),
            mail_api_key: env::var("SIGIL_MAIL_API_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    env::var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
