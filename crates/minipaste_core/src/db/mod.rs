//! redb-backed paste storage.

/// Table definitions.
pub mod tables;

use crate::error::AppError;
use crate::models::{PasteListing, StoredPaste};
use crate::store::PasteStore;
use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable};
use std::path::Path;
use std::sync::Arc;
use tables::{PASTES, REDB_FILE_NAME};

/// Database handle over a single redb file.
pub struct Database {
    pub db: Arc<redb::Database>,
}

fn decode(id: &str, bytes: &[u8]) -> Result<StoredPaste, AppError> {
    bincode::deserialize(bytes).map_err(|err| {
        tracing::error!("Failed to decode paste '{}': {}", id, err);
        AppError::Serialization(err)
    })
}

impl Database {
    /// Open (or create) the database under the directory `path`.
    ///
    /// # Returns
    /// A handle with all tables initialized.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb fails to
    /// open the file.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let db = redb::Database::create(dir.join(REDB_FILE_NAME))?;
        let write_txn = db.begin_write()?;
        write_txn.open_table(PASTES)?;
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert or replace the paste stored under `id`.
    ///
    /// # Errors
    /// Returns an error when serialization or the write transaction fails.
    pub fn insert(&self, id: &str, paste: &StoredPaste) -> Result<(), AppError> {
        let encoded = bincode::serialize(paste)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            pastes.insert(id, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove the paste stored under `id`.
    ///
    /// # Returns
    /// `true` when a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool, AppError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut pastes = write_txn.open_table(PASTES)?;
            let removed = pastes.remove(id)?.is_some();
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Delete every paste whose expiry is at or before `now`.
    ///
    /// # Returns
    /// Number of rows removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let expired: Vec<String> = self
            .scan(|id, paste| paste.is_expired_at(now).then(|| id.to_string()))?;
        if expired.is_empty() {
            return Ok(0);
        }

        let write_txn = self.db.begin_write()?;
        {
            let mut pastes = write_txn.open_table(PASTES)?;
            for id in &expired {
                pastes.remove(id.as_str())?;
            }
        }
        write_txn.commit()?;
        tracing::info!("Purged {} expired pastes", expired.len());
        Ok(expired.len())
    }

    fn scan<T>(
        &self,
        mut visit: impl FnMut(&str, &StoredPaste) -> Option<T>,
    ) -> Result<Vec<T>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let mut out = Vec::new();
        for entry in pastes.iter()? {
            let (key, value) = entry?;
            let id = key.value();
            let paste = decode(id, value.value())?;
            if let Some(item) = visit(id, &paste) {
                out.push(item);
            }
        }
        Ok(out)
    }

    fn get_at(&self, id: &str, now: DateTime<Utc>) -> Result<Option<StoredPaste>, AppError> {
        let read_txn = self.db.begin_read()?;
        let pastes = read_txn.open_table(PASTES)?;
        let Some(value) = pastes.get(id)? else {
            return Ok(None);
        };
        let paste = decode(id, value.value())?;
        if paste.is_expired_at(now) {
            return Ok(None);
        }
        Ok(Some(paste))
    }
}

impl PasteStore for Database {
    fn list(&self) -> Result<Vec<PasteListing>, AppError> {
        let now = Utc::now();
        // redb iterates keys in order, so the listing comes out sorted by name.
        self.scan(|id, paste| {
            (!paste.is_expired_at(now)).then(|| PasteListing {
                name: id.to_string(),
                expiration: paste.expiration,
            })
        })
    }

    fn get_with_metadata(&self, id: &str) -> Result<Option<StoredPaste>, AppError> {
        self.get_at(id, Utc::now())
    }
}

#[cfg(test)]
mod tests;
