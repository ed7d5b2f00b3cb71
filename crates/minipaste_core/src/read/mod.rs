//! GET-request resolution for stored pastes.
//!
//! The pipeline runs strictly in order: [`path::parse_path`] →
//! (auth, in the server) → store fetch → [`conditional::evaluate`] →
//! [`dispatch::dispatch`] → [`negotiate::negotiate`] for raw bodies.
//! Nothing here touches the HTTP framework, so the server only maps the
//! resulting [`dispatch::Rendition`] onto a response.

/// Conditional-request (`If-Modified-Since`) evaluation.
pub mod conditional;
/// Role dispatch over the fetched paste.
pub mod dispatch;
/// MIME type and content-disposition resolution.
pub mod negotiate;
/// Request path parsing.
pub mod path;

pub use conditional::{evaluate as evaluate_conditional, http_date, CacheCheck};
pub use dispatch::{dispatch, ReadQuery, Rendition};
pub use negotiate::{negotiate, Disposition, Negotiated};
pub use path::{parse_path, RequestDescriptor, Role};
