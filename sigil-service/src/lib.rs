//! sigil-service: the certificate platform's HTTP collaborator surface.
//!
//! Three groups of endpoints:
//! - `POST /send-certificate`: persist a composed certificate and
//!   attempt delivery (degraded success on mail failure).
//! - `GET/POST/DELETE /elements`: the decorative-asset catalog.
//! - `GET /verify/{code}`: the placeholder verification lookup.
//!
//! Persistence, auth, storage and mail sit behind the traits in
//! [`backend`]; the default binary wires the in-memory fakes, which makes
//! a development instance self-contained.

use std::time::Duration;

use axum::{
    http::{header::AUTHORIZATION, header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::info;

pub mod backend;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod verify;

use config::Config;
use routes::{
    create_element_handler, delete_element_handler, list_elements_handler,
    send_certificate_handler, verify_handler,
};
use state::AppState;

/// Build the router over an injected state; tests drive this directly.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/send-certificate", post(send_certificate_handler))
        .route(
            "/elements",
            get(list_elements_handler).post(create_element_handler),
        )
        .route("/elements/{id}", axum::routing::delete(delete_element_handler))
        .route("/verify/{code}", get(verify_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server() {
    let config = Config::load();

    info!("Initializing state...");
    let (state, backend) = AppState::in_memory();
    if config.mail_api_key.is_some() {
        // The trait seam is where a real provider client plugs in; until
        // one exists the key only flips the response message.
        info!("mail API key present, but no provider client is wired; delivery stays disabled");
    }
    // Development credentials for a self-contained instance.
    backend.register_token("dev-admin", true);
    backend.register_token("dev-user", false);

    info!("Starting server...");
    let router = app(state);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await.expect("bind listener");
    info!("Server running on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("serve");

    info!("Server shutting down...");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
