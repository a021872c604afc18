//! Backend collaborator contracts.
//!
//! Persistence, auth, file storage and mail delivery are external
//! services. The handlers only see these narrow traits, injected through
//! the shared state rather than an ambient global client, so the whole
//! surface runs against the in-memory fakes in tests and development.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sigil_api::ElementRecord;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("record not found")]
    NotFound,

    #[error("store failed: {reason}")]
    Store { reason: String },

    #[error("file storage failed: {reason}")]
    Storage { reason: String },

    #[error("delivery failed: {reason}")]
    Delivery { reason: String },
}

/// The caller a bearer credential resolves to.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub is_admin: bool,
}

/// A persisted certificate row.
#[derive(Debug, Clone)]
pub struct CertificateRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub recipient_name: String,
    pub recipient_email: String,
    /// Base64 PNG as submitted; stored verbatim.
    pub certificate_data: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new certificate row.
#[derive(Debug, Clone)]
pub struct NewCertificate {
    pub user_id: Uuid,
    pub title: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub certificate_data: String,
}

#[async_trait]
pub trait CertificateStore: Send + Sync {
    /// Resolve a bearer token. `BackendError::Unauthorized` for anything
    /// unknown.
    async fn authenticate(&self, token: &str) -> Result<AuthContext, BackendError>;

    async fn insert_certificate(
        &self,
        new: NewCertificate,
    ) -> Result<CertificateRecord, BackendError>;

    async fn certificate(&self, id: Uuid) -> Result<CertificateRecord, BackendError>;
}

#[async_trait]
pub trait ElementStore: Send + Sync {
    /// Active catalog rows, newest first. `None` means unfiltered.
    async fn list(&self, category: Option<&str>) -> Result<Vec<ElementRecord>, BackendError>;

    async fn insert(
        &self,
        title: String,
        category: String,
        image_url: String,
        created_by: Uuid,
    ) -> Result<ElementRecord, BackendError>;

    /// Delete a row, returning it so the caller can clean up the backing
    /// file.
    async fn delete(&self, id: Uuid) -> Result<ElementRecord, BackendError>;
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store bytes under a name, returning the public URL.
    async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, BackendError>;

    async fn remove(&self, file_name: &str) -> Result<(), BackendError>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Deliver a certificate. `Ok(Some(id))` on delivery, `Ok(None)` when
    /// delivery is disabled (no provider configured). Errors here never
    /// roll back the already-persisted record.
    async fn send(
        &self,
        recipient_email: &str,
        recipient_name: &str,
        certificate_title: &str,
        certificate_data: &str,
    ) -> Result<Option<String>, BackendError>;
}

pub mod memory {
    //! In-memory implementations used by tests and development runs.

    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Token-keyed auth plus vectors behind a mutex. Nothing survives a
    /// restart; that is the point.
    #[derive(Default)]
    pub struct MemoryBackend {
        tokens: Mutex<HashMap<String, AuthContext>>,
        certificates: Mutex<Vec<CertificateRecord>>,
        elements: Mutex<Vec<ElementRecord>>,
        files: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl MemoryBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Register a bearer token and return it for use in requests.
        pub fn register_token(&self, token: &str, is_admin: bool) -> Uuid {
            let user_id = Uuid::new_v4();
            self.tokens.lock().unwrap().insert(
                token.to_string(),
                AuthContext { user_id, is_admin },
            );
            user_id
        }

        pub fn certificate_count(&self) -> usize {
            self.certificates.lock().unwrap().len()
        }

        pub fn stored_file(&self, name: &str) -> Option<Vec<u8>> {
            self.files.lock().unwrap().get(name).cloned()
        }
    }

    #[async_trait]
    impl CertificateStore for MemoryBackend {
        async fn authenticate(&self, token: &str) -> Result<AuthContext, BackendError> {
            self.tokens
                .lock()
                .unwrap()
                .get(token)
                .copied()
                .ok_or(BackendError::Unauthorized)
        }

        async fn insert_certificate(
            &self,
            new: NewCertificate,
        ) -> Result<CertificateRecord, BackendError> {
            let record = CertificateRecord {
                id: Uuid::new_v4(),
                user_id: new.user_id,
                title: new.title,
                recipient_name: new.recipient_name,
                recipient_email: new.recipient_email,
                certificate_data: new.certificate_data,
                created_at: Utc::now(),
            };
            self.certificates.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn certificate(&self, id: Uuid) -> Result<CertificateRecord, BackendError> {
            self.certificates
                .lock()
                .unwrap()
                .iter()
                .find(|c| c.id == id)
                .cloned()
                .ok_or(BackendError::NotFound)
        }
    }

    #[async_trait]
    impl ElementStore for MemoryBackend {
        async fn list(&self, category: Option<&str>) -> Result<Vec<ElementRecord>, BackendError> {
            let mut rows: Vec<ElementRecord> = self
                .elements
                .lock()
                .unwrap()
                .iter()
                .filter(|e| category.map_or(true, |c| e.category == c))
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn insert(
            &self,
            title: String,
            category: String,
            image_url: String,
            _created_by: Uuid,
        ) -> Result<ElementRecord, BackendError> {
            let record = ElementRecord {
                id: Uuid::new_v4(),
                title,
                category,
                image_url,
                created_at: Utc::now(),
            };
            self.elements.lock().unwrap().push(record.clone());
            Ok(record)
        }

        async fn delete(&self, id: Uuid) -> Result<ElementRecord, BackendError> {
            let mut rows = self.elements.lock().unwrap();
            let index = rows
                .iter()
                .position(|e| e.id == id)
                .ok_or(BackendError::NotFound)?;
            Ok(rows.remove(index))
        }
    }

    #[async_trait]
    impl FileStorage for MemoryBackend {
        async fn store(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, BackendError> {
            self.files
                .lock()
                .unwrap()
                .insert(file_name.to_string(), bytes);
            Ok(format!("memory://elements/{file_name}"))
        }

        async fn remove(&self, file_name: &str) -> Result<(), BackendError> {
            self.files
                .lock()
                .unwrap()
                .remove(file_name)
                .map(|_| ())
                .ok_or(BackendError::NotFound)
        }
    }

    /// Mailer for deployments with no provider configured: persistence
    /// succeeds, delivery is reported as disabled.
    pub struct DisabledMailer;

    #[async_trait]
    impl Mailer for DisabledMailer {
        async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> Result<Option<String>, BackendError> {
            Ok(None)
        }
    }

    /// Mailer that always fails; exercises the degraded-success path.
    pub struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> Result<Option<String>, BackendError> {
            Err(BackendError::Delivery {
                reason: "mail provider unavailable".into(),
            })
        }
    }

    /// Mailer that always succeeds with a fixed delivery id.
    pub struct RecordingMailer;

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, _: &str, _: &str, _: &str, _: &str) -> Result<Option<String>, BackendError> {
            Ok(Some("mail-0001".into()))
        }
    }
}
