//! Shared constants used across minipaste crates.

/// Default HTTP port for the minipaste server.
pub const DEFAULT_PORT: u16 = 38412;

/// Default syntect theme for highlighted views.
pub const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Realm advertised in `WWW-Authenticate` challenges.
pub const AUTH_REALM: &str = "minipaste";

/// MIME type used when neither the query nor the extension resolves one.
pub const FALLBACK_MIME: &str = "text/plain";

/// Content type for every HTML page the server renders.
pub const HTML_CONTENT_TYPE: &str = "text/html;charset=UTF-8";
