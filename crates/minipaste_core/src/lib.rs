//! Core domain library for minipaste (config, storage, rendering, read pipeline).

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// redb-backed paste storage.
pub mod db;
/// Process-global environment mutation helpers.
pub mod env;
/// Application error types (storage/domain).
pub mod error;
/// Data models for stored pastes.
pub mod models;
/// Request resolution: path parsing, conditional caching, negotiation, dispatch.
pub mod read;
/// Markdown and syntax-highlight renderers.
pub mod render;
/// Narrow storage capability consumed by the read pipeline.
pub mod store;

pub use config::Config;
pub use constants::DEFAULT_PORT;
pub use db::Database;
pub use error::AppError;
pub use store::PasteStore;
