//! Storage capability consumed by the read pipeline.

use crate::error::AppError;
use crate::models::{PasteListing, StoredPaste};

/// Read-only view of a key-value paste store.
///
/// Implementations must treat expired rows as absent. Calls are single-shot;
/// callers never retry.
pub trait PasteStore: Send + Sync {
    /// All live pastes with their expiry.
    fn list(&self) -> Result<Vec<PasteListing>, AppError>;

    /// Fetch content and metadata for `id`, or `None` if the key is absent.
    fn get_with_metadata(&self, id: &str) -> Result<Option<StoredPaste>, AppError>;
}

impl<T: PasteStore + ?Sized> PasteStore for std::sync::Arc<T> {
    fn list(&self) -> Result<Vec<PasteListing>, AppError> {
        (**self).list()
    }

    fn get_with_metadata(&self, id: &str) -> Result<Option<StoredPaste>, AppError> {
        (**self).get_with_metadata(id)
    }
}
