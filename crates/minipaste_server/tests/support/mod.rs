//! Shared integration-test server bootstrap helpers.

#![allow(dead_code)]

use axum_test::TestServer;
use minipaste_server::models::{PasteListing, StoredPaste};
use minipaste_server::render::{CmarkRenderer, HighlightRenderer};
use minipaste_server::{create_app, AppError, AppState, Config, Database, PasteStore};
use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::TempDir;

/// Deterministic in-memory store.
#[derive(Default)]
pub(crate) struct MemoryStore {
    rows: BTreeMap<String, StoredPaste>,
    fail: bool,
}

impl MemoryStore {
    pub(crate) fn with(rows: impl IntoIterator<Item = (&'static str, StoredPaste)>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|(id, paste)| (id.to_string(), paste))
                .collect(),
            fail: false,
        }
    }

    /// A store whose every call fails.
    pub(crate) fn failing() -> Self {
        Self {
            rows: BTreeMap::new(),
            fail: true,
        }
    }
}

impl PasteStore for MemoryStore {
    fn list(&self) -> Result<Vec<PasteListing>, AppError> {
        if self.fail {
            return Err(AppError::StorageMessage("store offline".to_string()));
        }
        Ok(self
            .rows
            .iter()
            .map(|(name, paste)| PasteListing {
                name: name.clone(),
                expiration: paste.expiration,
            })
            .collect())
    }

    fn get_with_metadata(&self, id: &str) -> Result<Option<StoredPaste>, AppError> {
        if self.fail {
            return Err(AppError::StorageMessage("store offline".to_string()));
        }
        Ok(self.rows.get(id).cloned())
    }
}

/// Highlighter that echoes its inputs so assertions stay independent of syntect.
pub(crate) struct TagHighlighter;

impl HighlightRenderer for TagHighlighter {
    fn highlight(&self, text: &str, lang: &str) -> String {
        format!("<pre data-lang=\"{}\">{}</pre>", lang, text)
    }
}

pub(crate) fn test_config() -> Config {
    Config {
        port: 0,
        base_url: "https://paste.example.org".to_string(),
        ..Config::default()
    }
}

pub(crate) fn server_with_store(config: Config, store: impl PasteStore + 'static) -> TestServer {
    let state = AppState::with_renderers(
        config,
        Arc::new(store),
        Arc::new(CmarkRenderer),
        Arc::new(TagHighlighter),
    );
    TestServer::new(create_app(state)).expect("server")
}

pub(crate) fn memory_server(rows: impl IntoIterator<Item = (&'static str, StoredPaste)>) -> TestServer {
    server_with_store(test_config(), MemoryStore::with(rows))
}

/// Server backed by a real redb file and the default renderers.
pub(crate) fn setup_db_server(config: Config) -> (TestServer, Arc<Database>, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let config = Config {
        db_path: db_path.to_str().expect("db path").to_string(),
        ..config
    };
    let db = Arc::new(Database::new(&config.db_path).expect("open db"));
    let state = AppState::new(config, db.clone());
    let server = TestServer::new(create_app(state)).expect("server");
    (server, db, temp_dir)
}

