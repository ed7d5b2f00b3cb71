//! HTTP server wiring for minipaste (router, handlers, and shared state).

/// Basic-auth gate for static and admin pages.
pub mod auth;
/// HTTP error mapping for handlers.
pub mod error;
/// HTTP handlers.
pub mod handlers;
/// Static pages and the admin listing.
pub mod pages;

pub use auth::{AuthVerifier, BasicAuth};
pub use minipaste_core::{
    config, db, models, read, render, AppError, Config, Database, PasteStore, DEFAULT_PORT,
};

use axum::{routing::get, Router};
use minipaste_core::render::{
    CmarkRenderer, HighlightRenderer, MarkdownRenderer, SyntectHighlighter,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state passed to HTTP handlers.
///
/// Everything is immutable after construction; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PasteStore>,
    pub config: Arc<Config>,
    pub markdown: Arc<dyn MarkdownRenderer>,
    pub highlighter: Arc<dyn HighlightRenderer>,
    pub auth: Arc<dyn AuthVerifier>,
}

impl AppState {
    /// Construct shared application state with the default collaborators.
    ///
    /// # Arguments
    /// - `config`: Loaded configuration.
    /// - `store`: Paste store, usually an open [`Database`].
    ///
    /// # Returns
    /// State using pulldown-cmark, syntect, and basic auth.
    pub fn new(config: Config, store: impl PasteStore + 'static) -> Self {
        let highlighter = SyntectHighlighter::new(&config.highlight_theme);
        Self::with_renderers(
            config,
            Arc::new(store),
            Arc::new(CmarkRenderer),
            Arc::new(highlighter),
        )
    }

    /// Construct shared application state with explicit renderers.
    ///
    /// # Returns
    /// State using the given collaborators and basic auth.
    pub fn with_renderers(
        config: Config,
        store: Arc<dyn PasteStore>,
        markdown: Arc<dyn MarkdownRenderer>,
        highlighter: Arc<dyn HighlightRenderer>,
    ) -> Self {
        Self {
            store,
            config: Arc::new(config),
            markdown,
            highlighter,
            auth: Arc::new(BasicAuth),
        }
    }

    /// Replace the auth verifier.
    pub fn with_auth(mut self, auth: Arc<dyn AuthVerifier>) -> Self {
        self.auth = auth;
        self
    }
}

/// Create the application router.
///
/// Every path is served by [`handlers::read::handle_get`]; other methods get
/// `405 Method Not Allowed`.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::read::handle_get))
        .route("/*path", get(handlers::read::handle_get))
        .with_state(state)
        .layer(tower::ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Arguments
/// - `config`: Server configuration containing the configured `port`.
/// - `allow_public_access`: Whether non-loopback bind targets are permitted.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
}

#[cfg(test)]
mod tests {
    use super::resolve_bind_address;
    use minipaste_core::env::{lock_env, EnvGuard};
    use minipaste_core::Config;
    use std::net::SocketAddr;

    fn config_on_port(port: u16) -> Config {
        Config {
            port,
            ..Config::default()
        }
    }

    #[test]
    fn resolve_bind_address_enforces_loopback_when_public_access_disabled() {
        let _lock = lock_env();
        let _bind = EnvGuard::set("BIND", "0.0.0.0:4040");
        let resolved = resolve_bind_address(&config_on_port(4040), false);
        assert_eq!(resolved, SocketAddr::from(([127, 0, 0, 1], 4040)));

        let public = resolve_bind_address(&config_on_port(4040), true);
        assert_eq!(public, SocketAddr::from(([0, 0, 0, 0], 4040)));
    }

    #[test]
    fn resolve_bind_address_allows_loopback_and_invalid_fallback() {
        let _lock = lock_env();
        {
            let _bind = EnvGuard::remove("BIND");
            let loopback = resolve_bind_address(&config_on_port(4041), false);
            assert_eq!(loopback, SocketAddr::from(([127, 0, 0, 1], 4041)));
        }

        let _bind = EnvGuard::set("BIND", "bad:host");
        let fallback = resolve_bind_address(&config_on_port(4041), false);
        assert_eq!(fallback, SocketAddr::from(([127, 0, 0, 1], 4041)));
    }
}
