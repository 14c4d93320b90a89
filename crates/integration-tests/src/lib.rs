//! Integration test harness for Contact Book.
//!
//! Each test spawns the real router on an ephemeral port, backed by a fresh
//! [`MemoryStore`] unless the test supplies its own store, and talks to it
//! over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p contact-book-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::{Ipv4Addr, SocketAddr};

use reqwest::{Client, Response};
use secrecy::SecretString;
use serde_json::json;

use contact_book_server::config::ContactBookConfig;
use contact_book_server::db::{ContactRepository, MemoryStore, UserRepository};
use contact_book_server::services::TokenKeys;
use contact_book_server::state::AppState;

/// Signing secret shared by the spawned server and [`TestServer::keys`].
pub const TEST_JWT_SECRET: &str = "q7V!m2Lr#9xT@k4Wz$8Nc&3Hp*6Jd^1Fs";

/// A server running in the current test's runtime.
pub struct TestServer {
    addr: SocketAddr,
    client: Client,
    keys: TokenKeys,
}

impl TestServer {
    /// Spawn a server over an empty [`MemoryStore`].
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn spawn() -> std::io::Result<Self> {
        Self::spawn_with(MemoryStore::new()).await
    }

    /// Spawn a server over `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if no local port can be bound.
    pub async fn spawn_with<S>(store: S) -> std::io::Result<Self>
    where
        S: UserRepository + ContactRepository + 'static,
    {
        let secret = SecretString::from(TEST_JWT_SECRET);
        let config = ContactBookConfig {
            database_url: SecretString::from("postgres://unused"),
            host: Ipv4Addr::LOCALHOST.into(),
            port: 0,
            jwt_secret: secret.clone(),
            cors_origins: Vec::new(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
        let addr = listener.local_addr()?;
        let app = contact_book_server::app(AppState::new(config, store));

        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(Self {
            addr,
            client: Client::new(),
            keys: TokenKeys::new(&secret),
        })
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// The HTTP client.
    #[must_use]
    pub const fn client(&self) -> &Client {
        &self.client
    }

    /// Keys matching the server's signing secret, for minting tokens directly.
    #[must_use]
    pub const fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    /// `POST /api/auth/register` with a matching confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> reqwest::Result<Response> {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "password2": password,
            }))
            .send()
            .await
    }

    /// `POST /api/auth/login`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent.
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Result<Response> {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
    }
}
