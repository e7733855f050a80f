//! Application state for the HTTP API.
//!
//! Everything here is built once at startup and lives for the whole
//! process: configuration, secrets, the document store, the outbound
//! clients and the attendance book.

use std::sync::Arc;

use crate::attendance::AttendanceService;
use crate::config::ConfigLoader;
use crate::llm::TextGenerator;
use crate::messenger::MessageSender;
use crate::store::DocumentStore;

/// Secrets the API checks callers against.
#[derive(Debug, Clone)]
pub struct AccessTokens {
    /// Webhook verification token.
    pub verify_token: String,
    /// Bearer token for admin endpoints.
    pub admin_token: String,
}

struct Inner {
    config: ConfigLoader,
    tokens: AccessTokens,
    store: Arc<dyn DocumentStore>,
    generator: Arc<dyn TextGenerator>,
    sender: Arc<dyn MessageSender>,
    attendance: AttendanceService,
}

/// Shared application state.
///
/// Cheap to clone; every clone refers to the same process-scoped resources.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    /// Creates the application state.
    pub fn new(
        config: ConfigLoader,
        tokens: AccessTokens,
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn TextGenerator>,
        sender: Arc<dyn MessageSender>,
    ) -> Self {
        let attendance = AttendanceService::new(config.attendance().clone());
        Self {
            inner: Arc::new(Inner {
                config,
                tokens,
                store,
                generator,
                sender,
                attendance,
            }),
        }
    }

    /// Returns the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.inner.config
    }

    /// Returns the access tokens.
    pub fn tokens(&self) -> &AccessTokens {
        &self.inner.tokens
    }

    /// Returns the document store.
    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    /// Returns the text generator.
    pub fn generator(&self) -> &dyn TextGenerator {
        self.inner.generator.as_ref()
    }

    /// Returns the message sender.
    pub fn sender(&self) -> &dyn MessageSender {
        self.inner.sender.as_ref()
    }

    /// Returns the attendance service.
    pub fn attendance(&self) -> &AttendanceService {
        &self.inner.attendance
    }
}
