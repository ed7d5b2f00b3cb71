//! HTTP request handlers.

/// GET handler resolving static pages and paste reads.
pub mod read;
