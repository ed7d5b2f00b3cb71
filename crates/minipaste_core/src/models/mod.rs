//! Data models shared by storage and the read pipeline.

/// Stored paste records and listings.
pub mod paste;

pub use paste::{PasteListing, PasteMetadata, StoredPaste};
