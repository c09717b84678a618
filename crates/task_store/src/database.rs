//! SQLite connection handling and schema setup.

use std::path::Path;

use sqlx::{sqlite::SqlitePoolOptions, Pool, Sqlite};

use crate::TaskStoreResult;

/// Shared database handle.
///
/// Owns the connection pool. The handle is constructed once at startup and
/// injected into the store; there is no hidden process-wide connection and
/// no reconnection logic. When the liveness probe fails, requests are
/// served from the file store instead.
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Opens (creating if needed) the database at `db_path`.
    pub async fn connect(db_path: &Path) -> TaskStoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        Ok(Self { pool })
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Liveness probe. Decides store selection only, it says nothing about
    /// schema readiness.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }

    /// Creates the task schema if it is not present yet. Idempotent.
    pub async fn init_schema(&self) -> TaskStoreResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

/// SQL schema definition
const SCHEMA_SQL: &str = r#"
-- Tasks table
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    due_date TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT
);

-- Indexes for the common lookups
CREATE INDEX IF NOT EXISTS idx_tasks_completed ON tasks(completed);
CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
CREATE INDEX IF NOT EXISTS idx_tasks_created_at ON tasks(created_at);
"#;
