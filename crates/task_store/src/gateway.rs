//! Storage selection, schema readiness, and file-to-database migration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{Database, JsonTaskStore, SqliteTaskStore, TaskStore, TaskStoreResult};

/// Which backend served a request. Reported to clients in every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Database,
    Json,
}

impl StorageKind {
    /// Wire name of the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Database => "database",
            Self::Json => "json",
        }
    }
}

/// Chooses which task store serves each request.
///
/// The database variant wins whenever the liveness probe succeeds and the
/// schema plus migration pass; otherwise the JSON file store serves the
/// request. An unreachable database is a routing signal, never an error
/// surfaced to the caller.
pub struct StorageGateway {
    database: Option<(Arc<Database>, SqliteTaskStore)>,
    file: JsonTaskStore,
    ready: AtomicBool,
}

impl StorageGateway {
    /// Creates a gateway over an optional database handle and the file
    /// store. With `None` (startup connection failed) every request is
    /// served from the file.
    pub fn new(database: Option<Arc<Database>>, file: JsonTaskStore) -> Self {
        Self {
            database: database.map(|db| (db.clone(), SqliteTaskStore::new(db))),
            file,
            ready: AtomicBool::new(false),
        }
    }

    /// Selects the store serving the current request.
    pub async fn select_store(&self) -> (&dyn TaskStore, StorageKind) {
        if let Some((db, store)) = &self.database {
            if db.ping().await && self.ensure_ready(db).await {
                return (store, StorageKind::Database);
            }
            tracing::warn!("database unavailable, serving from the JSON file store");
        }
        (&self.file, StorageKind::Json)
    }

    /// Prepares the database for first use: creates the schema if absent,
    /// then copies file-store history in. A success is cached for the life
    /// of the process; migration itself stays idempotent either way.
    async fn ensure_ready(&self, db: &Database) -> bool {
        if self.ready.load(Ordering::Acquire) {
            return true;
        }
        match self.prepare(db).await {
            Ok(()) => {
                self.ready.store(true, Ordering::Release);
                true
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "database preparation failed, file store stays authoritative"
                );
                false
            }
        }
    }

    async fn prepare(&self, db: &Database) -> TaskStoreResult<()> {
        db.init_schema().await?;
        let migrated = self.migrate().await?;
        if migrated > 0 {
            tracing::info!(migrated, "copied tasks from the JSON document into the database");
        }
        Ok(())
    }

    /// Copies every file-store task into the database, inserting only ids
    /// that do not exist yet. Existing rows are never overwritten and never
    /// duplicated, so a second run is a no-op. Returns the number of rows
    /// written.
    pub async fn migrate(&self) -> TaskStoreResult<u64> {
        let Some((_, store)) = &self.database else {
            return Ok(0);
        };

        let tasks = self.file.list().await?;
        let mut migrated = 0;
        for task in &tasks {
            if store.insert_if_absent(task).await? {
                migrated += 1;
            }
        }
        Ok(migrated)
    }
}
