use std::sync::Arc;

use crate::backend::memory::{DisabledMailer, MemoryBackend};
use crate::backend::{CertificateStore, ElementStore, FileStorage, Mailer};

/// Shared handler state: the injected backend collaborators.
#[derive(Clone)]
pub struct AppState {
    pub certificates: Arc<dyn CertificateStore>,
    pub elements: Arc<dyn ElementStore>,
    pub storage: Arc<dyn FileStorage>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// State backed entirely by the in-memory fakes, delivery disabled.
    /// Used by development runs and tests; the returned backend handle
    /// lets callers register tokens and inspect persisted rows.
    pub fn in_memory() -> (Self, Arc<MemoryBackend>) {
        let backend = Arc::new(MemoryBackend::new());
        let state = Self {
            certificates: backend.clone(),
            elements: backend.clone(),
            storage: backend.clone(),
            mailer: Arc::new(DisabledMailer),
        };
        (state, backend)
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }
}
