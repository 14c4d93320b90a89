//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ContactBookConfig;
use crate::db::{ContactRepository, UserRepository};
use crate::services::{AuthService, ContactService, TokenKeys};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the store, the token keys and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ContactBookConfig,
    users: Arc<dyn UserRepository>,
    contacts: Arc<dyn ContactRepository>,
    tokens: TokenKeys,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `store` - Backing store for users and contacts (`PgStore` or `MemoryStore`)
    #[must_use]
    pub fn new<S>(config: ContactBookConfig, store: S) -> Self
    where
        S: UserRepository + ContactRepository + 'static,
    {
        let store = Arc::new(store);
        let tokens = TokenKeys::new(&config.jwt_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                users: store.clone(),
                contacts: store,
                tokens,
            }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ContactBookConfig {
        &self.inner.config
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserRepository {
        self.inner.users.as_ref()
    }

    /// Authentication service borrowing this state.
    #[must_use]
    pub fn auth(&self) -> AuthService<'_> {
        AuthService::new(self.inner.users.as_ref(), &self.inner.tokens)
    }

    /// Contact service borrowing this state.
    #[must_use]
    pub fn contacts(&self) -> ContactService<'_> {
        ContactService::new(self.inner.contacts.as_ref())
    }
}
