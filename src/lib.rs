//! Root crate facade for the minipaste server.

pub use minipaste_server::{
    auth, config, create_app, db, error, handlers, models, pages, read, render,
    resolve_bind_address, serve_router, AppError, AppState, AuthVerifier, BasicAuth, Config,
    Database, PasteStore, DEFAULT_PORT,
};
