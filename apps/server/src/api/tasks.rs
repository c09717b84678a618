//! Task API endpoints.

use axum::{Json, extract::State};
use chrono::Utc;
use entities::{Task, TaskDraft, TaskPatch, TaskStats};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ServerError, ServerResult};
use crate::state::SharedState;

/// Create request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

/// Update request body. An absent field is left unchanged; `dueDate: null`
/// clears the date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Delete request body.
#[derive(Debug, Deserialize)]
pub struct DeleteTaskRequest {
    #[serde(default)]
    pub id: Option<String>,
}

/// Keeps a present-but-null field distinguishable from an absent one.
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// List response.
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    pub success: bool,
    pub tasks: Vec<Task>,
    pub count: usize,
    pub storage: &'static str,
}

/// Single-task response.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub success: bool,
    pub message: String,
    pub task: Task,
    pub storage: &'static str,
}

/// Statistics response.
#[derive(Debug, Serialize)]
pub struct TaskStatsResponse {
    pub success: bool,
    pub stats: TaskStats,
    pub storage: &'static str,
}

/// Lists all tasks, newest first.
pub async fn list_tasks(State(state): State<SharedState>) -> ServerResult<Json<TaskListResponse>> {
    let (store, kind) = state.gateway.select_store().await;

    let mut tasks = store.list().await?;
    tasks.sort_by(|a, b| b.created.cmp(&a.created));

    Ok(Json(TaskListResponse {
        success: true,
        count: tasks.len(),
        tasks,
        storage: kind.as_str(),
    }))
}

/// Creates a task.
pub async fn create_task(
    State(state): State<SharedState>,
    Json(request): Json<CreateTaskRequest>,
) -> ServerResult<Json<TaskResponse>> {
    let title = request
        .title
        .as_deref()
        .ok_or_else(|| ServerError::InvalidRequest("Task title is required".to_string()))?;

    let draft = TaskDraft::new(
        title,
        request.description.as_deref(),
        request.due_date.as_deref(),
    )?;

    let (store, kind) = state.gateway.select_store().await;
    let task = store.create(draft).await?;

    tracing::info!(task_id = %task.id, storage = kind.as_str(), "task created");

    Ok(Json(TaskResponse {
        success: true,
        message: "Task created successfully".to_string(),
        task,
        storage: kind.as_str(),
    }))
}

/// Applies a partial update to a task.
pub async fn update_task(
    State(state): State<SharedState>,
    Json(request): Json<UpdateTaskRequest>,
) -> ServerResult<Json<TaskResponse>> {
    let id = request
        .id
        .as_deref()
        .ok_or_else(|| ServerError::InvalidRequest("Task ID is required".to_string()))?;

    let patch = TaskPatch::new(
        request.title.as_deref(),
        request.description.as_deref(),
        request.due_date.as_ref().map(|d| d.as_deref()),
        request.completed,
    )?;

    let (store, kind) = state.gateway.select_store().await;
    let task = store.update(id, patch).await?;

    tracing::info!(task_id = %task.id, storage = kind.as_str(), "task updated");

    Ok(Json(TaskResponse {
        success: true,
        message: "Task updated successfully".to_string(),
        task,
        storage: kind.as_str(),
    }))
}

/// Deletes a task and returns it as it was before removal.
pub async fn delete_task(
    State(state): State<SharedState>,
    Json(request): Json<DeleteTaskRequest>,
) -> ServerResult<Json<TaskResponse>> {
    let id = request
        .id
        .as_deref()
        .ok_or_else(|| ServerError::InvalidRequest("Task ID is required".to_string()))?;

    let (store, kind) = state.gateway.select_store().await;
    let task = store.delete(id).await?;

    tracing::info!(task_id = %task.id, storage = kind.as_str(), "task deleted");

    Ok(Json(TaskResponse {
        success: true,
        message: "Task deleted successfully".to_string(),
        task,
        storage: kind.as_str(),
    }))
}

/// Returns aggregate statistics over all tasks.
pub async fn task_stats(State(state): State<SharedState>) -> ServerResult<Json<TaskStatsResponse>> {
    let (store, kind) = state.gateway.select_store().await;

    let tasks = store.list().await?;
    let stats = TaskStats::compute(&tasks, Utc::now().date_naive());

    Ok(Json(TaskStatsResponse {
        success: true,
        stats,
        storage: kind.as_str(),
    }))
}
