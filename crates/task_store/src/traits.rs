//! Task store trait definition.

use async_trait::async_trait;
use entities::{Task, TaskDraft, TaskPatch};

use crate::TaskStoreResult;

/// Trait for task storage operations.
///
/// Both backends expose the same four operations over the same denormalized
/// task record; callers obtain the variant serving the current request from
/// [`StorageGateway::select_store`](crate::StorageGateway::select_store)
/// instead of branching on a backend flag.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Lists all tasks. Internal order is unspecified, callers sort.
    async fn list(&self) -> TaskStoreResult<Vec<Task>>;

    /// Persists a new task built from a validated draft and returns the
    /// stored record.
    async fn create(&self, draft: TaskDraft) -> TaskStoreResult<Task>;

    /// Applies only the supplied fields to an existing task, refreshes its
    /// update timestamp, and returns the full updated record.
    async fn update(&self, id: &str, patch: TaskPatch) -> TaskStoreResult<Task>;

    /// Removes a task and returns the record as it was before removal.
    async fn delete(&self, id: &str) -> TaskStoreResult<Task>;
}
