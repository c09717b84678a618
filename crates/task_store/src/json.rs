//! JSON file backed task store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use entities::{Task, TaskDraft, TaskPatch};
use tokio::sync::Mutex;

use crate::{TaskStore, TaskStoreError, TaskStoreResult};

/// File backed task store.
///
/// The whole task collection lives in one pretty-printed JSON array that is
/// rewritten wholesale on every mutation. Contract: every read-modify-write
/// cycle runs under an exclusive async lock, two in-flight writes must
/// never interleave. Document replacement is atomic (temp file, then
/// rename), so readers observe either the old or the new collection.
pub struct JsonTaskStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonTaskStore {
    /// Creates a store over the document at `path`. A missing document is
    /// created empty on first use, parent directories included.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> TaskStoreResult<Vec<Task>> {
        if !self.path.exists() {
            write_atomic(&self.path, b"[]")?;
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn persist(&self, tasks: &[Task]) -> TaskStoreResult<()> {
        let bytes = serde_json::to_vec_pretty(tasks)?;
        write_atomic(&self.path, &bytes)?;
        Ok(())
    }
}

#[async_trait]
impl TaskStore for JsonTaskStore {
    async fn list(&self) -> TaskStoreResult<Vec<Task>> {
        let _guard = self.lock.lock().await;
        self.load()
    }

    async fn create(&self, draft: TaskDraft) -> TaskStoreResult<Task> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load()?;
        let task = Task::new(draft);
        tasks.push(task.clone());
        self.persist(&tasks)?;
        Ok(task)
    }

    async fn update(&self, id: &str, patch: TaskPatch) -> TaskStoreResult<Task> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found(id))?;
        task.apply(&patch);
        let updated = task.clone();
        self.persist(&tasks)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> TaskStoreResult<Task> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load()?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskStoreError::not_found(id))?;
        let removed = tasks.remove(index);
        self.persist(&tasks)?;
        Ok(removed)
    }
}

/// Writes `bytes` to a temp file next to `path`, then renames it over the
/// destination.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tasks.json".to_string());
    let tmp_path = dir.join(format!("{file_name}.tmp"));
    {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
    }
    fs::rename(tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> JsonTaskStore {
        JsonTaskStore::new(dir.path().join("tasks.json"))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_missing_document_created_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

        assert!(store.list().await.unwrap().is_empty());
        assert!(tmp.path().join("tasks.json").exists());
    }

    #[tokio::test]
    async fn test_create_then_list_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

        let task = store
            .create(TaskDraft::new("Buy milk", None, None).unwrap())
            .await
            .unwrap();
        assert!(!task.completed);
        assert_eq!(task.description, "");
        assert_eq!(task.due_date, None);
        assert_eq!(task.updated, Some(task.created));

        let tasks = store.list().await.unwrap();
        assert_eq!(tasks, vec![task]);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

        let a = store.create(draft("a")).await.unwrap();
        let b = store.create(draft("b")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

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
        assert_eq!(updated.created, task.created);
        assert!(updated.updated >= task.updated);
    }

    #[tokio::test]
    async fn test_delete_returns_prior_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);

        let task = store.create(draft("doomed")).await.unwrap();
        let removed = store.delete(&task.id).await.unwrap();

        assert_eq!(removed, task);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_id_leaves_store_unchanged() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
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

        assert_eq!(store.list().await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn test_document_survives_reload() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("tasks.json");

        let task = {
            let store = JsonTaskStore::new(&path);
            store.create(draft("persisted")).await.unwrap()
        };

        let reopened = JsonTaskStore::new(&path);
        assert_eq!(reopened.list().await.unwrap(), vec![task]);
    }

    #[tokio::test]
    async fn test_document_is_pretty_printed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(&tmp);
        store.create(draft("pretty")).await.unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains('\n'));
        assert!(content.starts_with('['));
    }
}
