// This defines the JSON contracts shared between the editor and the
// service endpoints (send-certificate, element catalog, verification).
// Parse and validate them here so both sides agree on one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Categories the element catalog recognizes. `"all"` is a filter value,
/// not a storable category.
pub const ELEMENT_CATEGORIES: &[&str] = &[
    "general",
    "medals",
    "ribbons",
    "crowns",
    "seals",
    "badges",
    "decorative",
];

pub fn is_valid_category(category: &str) -> bool {
    ELEMENT_CATEGORIES.contains(&category)
}

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("unknown element category: {category}")]
    UnknownCategory { category: String },

    #[error("field must not be empty: {field}")]
    EmptyField { field: &'static str },
}

/// Request body for the send-certificate endpoint. Field names stay
/// camelCase on the wire for compatibility with existing clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SendCertificateRequest {
    pub recipient_email: String,
    pub recipient_name: String,
    pub certificate_title: String,
    /// Base64-encoded PNG raster of the composed certificate.
    pub certificate_data: String,
    pub sender_name: Option<String>,
    pub message: Option<String>,
}

impl SendCertificateRequest {
    /// Reject requests with blank identifying fields before touching any
    /// collaborator.
    pub fn validate(&self) -> Result<(), ContractError> {
        for (field, value) in [
            ("recipientEmail", &self.recipient_email),
            ("recipientName", &self.recipient_name),
            ("certificateTitle", &self.certificate_title),
            ("certificateData", &self.certificate_data),
        ] {
            if value.trim().is_empty() {
                return Err(ContractError::EmptyField { field });
            }
        }
        Ok(())
    }
}

/// Response for the send-certificate endpoint.
///
/// `success` reports persistence; `email_error` carries a delivery
/// failure that happened after the record was saved; the two are
/// deliberately not atomic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCertificateResponse {
    pub success: bool,
    pub certificate_id: Uuid,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

/// One row of the element catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// Metadata for a new catalog element; the image file travels out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewElement {
    pub title: String,
    pub category: String,
}

impl NewElement {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.title.trim().is_empty() {
            return Err(ContractError::EmptyField { field: "title" });
        }
        if !is_valid_category(&self.category) {
            return Err(ContractError::UnknownCategory {
                category: self.category.clone(),
            });
        }
        Ok(())
    }
}

/// Fabricated certificate metadata returned by the placeholder verifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedCertificate {
    pub id: String,
    pub title: String,
    pub recipient_name: String,
    pub issued_by: String,
    pub issue_date: String,
    pub verification_date: String,
    pub credential_id: String,
}

/// Outcome of a verification lookup. Non-authoritative: see the service's
/// verify module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<VerifiedCertificate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_request_wire_names_are_camel_case() {
        let json = r#"{
            "recipientEmail": "jo@example.com",
            "recipientName": "Jo",
            "certificateTitle": "Excellence in Leadership",
            "certificateData": "aGVsbG8=",
            "senderName": null,
            "message": null
        }"#;
        let req: SendCertificateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.recipient_name, "Jo");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn send_request_rejects_unknown_fields() {
        let json = r#"{
            "recipientEmail": "jo@example.com",
            "recipientName": "Jo",
            "certificateTitle": "t",
            "certificateData": "d",
            "bogus": 1
        }"#;
        assert!(serde_json::from_str::<SendCertificateRequest>(json).is_err());
    }

    #[test]
    fn blank_fields_are_rejected() {
        let req = SendCertificateRequest {
            recipient_email: "  ".into(),
            recipient_name: "Jo".into(),
            certificate_title: "t".into(),
            certificate_data: "d".into(),
            sender_name: None,
            message: None,
        };
        assert!(matches!(
            req.validate(),
            Err(ContractError::EmptyField {
                field: "recipientEmail"
            })
        ));
    }

    #[test]
    fn categories_validate() {
        assert!(is_valid_category("medals"));
        assert!(!is_valid_category("all"));
        let bad = NewElement {
            title: "Ribbon".into(),
            category: "nope".into(),
        };
        assert!(matches!(
            bad.validate(),
            Err(ContractError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn degraded_success_keeps_email_error() {
        let resp = SendCertificateResponse {
            success: true,
            certificate_id: Uuid::new_v4(),
            message: "Certificate saved; delivery failed".into(),
            email_id: None,
            email_error: Some("mailer unavailable".into()),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("emailError"));
        assert!(!json.contains("emailId"));
    }
}
