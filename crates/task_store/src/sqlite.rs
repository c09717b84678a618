//! SQLite backed task store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use entities::{Task, TaskDraft, TaskPatch};
use sqlx::FromRow;

use crate::{Database, TaskStore, TaskStoreError, TaskStoreResult};

/// Database row for Task
#[derive(Debug, FromRow)]
struct TaskRow {
    id: String,
    title: String,
    description: String,
    due_date: Option<String>,
    completed: i64,
    created_at: String,
    updated_at: Option<String>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description,
            due_date: row
                .due_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            completed: row.completed != 0,
            created: parse_timestamp(&row.created_at),
            updated: row.updated_at.as_deref().map(parse_timestamp),
        }
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.map(|d| d.to_string()),
            completed: task.completed as i64,
            created_at: task.created.to_rfc3339(),
            updated_at: task.updated.map(|t| t.to_rfc3339()),
        }
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Relational task store over a shared [`Database`] handle.
///
/// One row per task. Mutations are targeted single statements and rely on
/// the engine's per-statement atomicity, there are no multi-operation
/// transactions.
pub struct SqliteTaskStore {
    db: Arc<Database>,
}

impl SqliteTaskStore {
    /// Creates a store over an established database handle.
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Inserts `task` only if no row with its id exists yet, preserving any
    /// existing row untouched. Returns whether a row was written. This is
    /// the primitive behind the file-to-database migration.
    pub async fn insert_if_absent(&self, task: &Task) -> TaskStoreResult<bool> {
        let row = TaskRow::from(task);
        let result = sqlx::query(
            "INSERT OR IGNORE INTO tasks (id, title, description, due_date, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(&row.due_date)
        .bind(row.completed)
        .bind(&row.created_at)
        .bind(&row.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn fetch(&self, id: &str) -> TaskStoreResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(
            "SELECT id, title, description, due_date, completed, created_at, updated_at
             FROM tasks
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(Task::from))
    }
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, title, description, due_date, completed, created_at, updated_at
             FROM tasks
             ORDER BY created_at DESC",
        )
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(Task::from).collect())
    }

    async fn create(&self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let task = Task::new(draft);
        let row = TaskRow::from(&task);

        sqlx::query(
            "INSERT INTO tasks (id, title, description, due_date, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.title)
        .bind(&row.description)
        .bind(&row.due_date)
        .bind(row.completed)
        .bind(&row.created_at)
        .bind(&row.updated_at)
        .execute(self.db.pool())
        .await?;

        Ok(task)
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> TaskStoreResult<Task> {
        // Column-level update naming only the supplied fields.
        let mut sets = Vec::new();
        if patch.title.is_some() {
            sets.push("title = ?");
        }
        if patch.description.is_some() {
            sets.push("description = ?");
        }
        if patch.due_date.is_some() {
            sets.push("due_date = ?");
        }
        if patch.completed.is_some() {
            sets.push("completed = ?");
        }
        sets.push("updated_at = ?");

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));

        let mut query = sqlx::query(&sql);
        if let Some(title) = &patch.title {
            query = query.bind(title);
        }
        if let Some(description) = &patch.description {
            query = query.bind(description);
        }
        if let Some(due_date) = patch.due_date {
            query = query.bind(due_date.map(|d| d.to_string()));
        }
        if let Some(completed) = patch.completed {
            query = query.bind(completed as i64);
        }
        query = query.bind(Utc::now().to_rfc3339()).bind(id);

        let result = query.execute(self.db.pool()).await?;
        if result.rows_affected() == 0 {
            return Err(TaskStoreError::not_found(id));
        }

        self.fetch(id)
            .await?
            .ok_or_else(|| TaskStoreError::not_found(id))
    }

    async fn delete(&self, id: &str) -> TaskStoreResult<Task> {
        let task = self
            .fetch(id)
            .await?
            .ok_or_else(|| TaskStoreError::not_found(id))?;

        sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn store_in(dir: &tempfile::TempDir) -> SqliteTaskStore {
        let db = Database::connect(&dir.path().join("tasks.db")).await.unwrap();
        db.init_schema().await.unwrap();
        SqliteTaskStore::new(Arc::new(db))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let task = store
            .create(TaskDraft::new("Buy milk", None, None).unwrap())
            .await
            .unwrap();
        assert!(!task.completed);
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert_eq!(task.updated, Some(task.created));

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, task.id);
        assert_eq!(tasks[0].title, "Buy milk");
    }

    #[tokio::test]
    async fn test_due_date_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let task = store
            .create(TaskDraft::new("dated", None, Some("2026-03-01")).unwrap())
            .await
            .unwrap();

        let fetched = store.fetch(&task.id).await.unwrap().unwrap();
        assert_eq!(
            fetched.due_date,
            Some(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let task = store
            .create(TaskDraft::new("title", Some("desc"), Some("2026-03-01")).unwrap())
            .await
            .unwrap();

        let patch = TaskPatch::new(None, None, None, Some(true)).unwrap();
        let updated = store.update(&task.id, patch).await.unwrap();

        assert!(updated.completed);
        assert_eq!(updated.title, task.title);
        assert_eq!(updated.description, task.description);
        assert_eq!(updated.due_date, task.due_date);
        assert!(updated.updated >= task.updated);
    }

    #[tokio::test]
    async fn test_patch_clears_due_date() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let task = store
            .create(TaskDraft::new("dated", None, Some("2026-03-01")).unwrap())
            .await
            .unwrap();

        let patch = TaskPatch::new(None, None, Some(None), None).unwrap();
        let updated = store.update(&task.id, patch).await.unwrap();

        assert_eq!(updated.due_date, None);
    }

    #[tokio::test]
    async fn test_delete_returns_prior_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let task = store.create(draft("doomed")).await.unwrap();
        let removed = store.delete(&task.id).await.unwrap();

        assert_eq!(removed.id, task.id);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_leaves_store_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;
        let task = store.create(draft("keep")).await.unwrap();

        let patch = TaskPatch::new(Some("new"), None, None, None).unwrap();
        assert!(matches!(
            store.update("missing", patch).await,
            Err(TaskStoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("missing").await,
            Err(TaskStoreError::NotFound { .. })
        ));

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "keep");
    }

    #[tokio::test]
    async fn test_insert_if_absent_never_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let task = store.create(draft("original")).await.unwrap();

        let mut conflicting = task.clone();
        conflicting.title = "overwritten".to_string();
        assert!(!store.insert_if_absent(&conflicting).await.unwrap());

        let fetched = store.fetch(&task.id).await.unwrap().unwrap();
        assert_eq!(fetched.title, "original");
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp).await;

        let older = store.create(draft("older")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let newer = store.create(draft("newer")).await.unwrap();

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks[0].id, newer.id);
        assert_eq!(tasks[1].id, older.id);
    }
}
