//! Placeholder certificate verification.
//!
//! NOT AUTHORITATIVE. The original verification surface fabricates its
//! outcome instead of consulting the certificate store, and this port
//! keeps that behavior on purpose: a pseudo-random ~70% pass mixed from
//! the code bytes and the clock, with canned certificate metadata on
//! success. Wiring this to real records is a deliberate behavior change,
//! not a bug fix.

use chrono::{DateTime, Utc};
use sigil_api::{VerificationReport, VerifiedCertificate};
use tracing::debug;

/// SplitMix64-style mixing (stable, fast, no deps).
fn mix(state: u64, value: u64) -> u64 {
    let mut z = state.wrapping_add(0x9E3779B97F4A7C15).wrapping_add(value);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Simulate a lookup for `code` at time `now`. Roughly 70% of rolls pass.
pub fn verify_code(code: &str, now: DateTime<Utc>) -> VerificationReport {
    let mut state = 0u64;
    for b in code.bytes() {
        state = mix(state, b as u64);
    }
    let roll = mix(state, now.timestamp_millis() as u64) % 100;
    let is_valid = roll < 70;
    debug!(code, roll, is_valid, "simulated verification");

    if is_valid {
        VerificationReport {
            is_valid: true,
            certificate: Some(VerifiedCertificate {
                id: "CERT-2024-001".into(),
                title: "Excellence in Leadership".into(),
                recipient_name: "John Doe".into(),
                issued_by: "Leadership Institute".into(),
                issue_date: "January 15, 2024".into(),
                verification_date: now.format("%B %-d, %Y, %-I:%M:%S %p").to_string(),
                credential_id: code.to_string(),
            }),
            error: None,
        }
    } else {
        VerificationReport {
            is_valid: false,
            certificate: None,
            error: Some("Certificate not found or has been revoked".into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn outcome_is_deterministic_for_fixed_inputs() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let a = verify_code("CERT-2024-001", t);
        let b = verify_code("CERT-2024-001", t);
        assert_eq!(a.is_valid, b.is_valid);
    }

    #[test]
    fn pass_rate_is_roughly_seventy_percent() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        let passes = (0..1000)
            .filter(|i| verify_code(&format!("CERT-{i:04}"), t).is_valid)
            .count();
        assert!((600..800).contains(&passes), "got {passes}");
    }

    #[test]
    fn valid_report_carries_the_submitted_code() {
        let t = Utc::now();
        // Find a passing code so the metadata block is populated.
        let report = (0..100)
            .map(|i| verify_code(&format!("probe-{i}"), t))
            .find(|r| r.is_valid)
            .expect("some probe should pass");
        let cert = report.certificate.unwrap();
        assert!(cert.credential_id.starts_with("probe-"));
        assert!(report.error.is_none());
    }

    #[test]
    fn invalid_report_has_error_and_no_metadata() {
        let t = Utc::now();
        let report = (0..100)
            .map(|i| verify_code(&format!("probe-{i}"), t))
            .find(|r| !r.is_valid)
            .expect("some probe should fail");
        assert!(report.certificate.is_none());
        assert!(report.error.is_some());
    }
}
