use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use super::AppState;
use tasksync::{Task, TaskDraft, TaskSyncError};
use tasksync_replication::Change;

/// GET /tasks
pub async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<Task>> {
    Json(state.store.list())
}

/// POST /tasks
/// New tasks always start `pending` with a fresh id, whatever the body says.
pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<TaskDraft>,
) -> (StatusCode, Json<Task>) {
    let task = Task::from_draft(draft);
    state.store.create(task.clone());
    tracing::info!("Created task {}", task.id);

    state.replicate(Change::Upsert(task.clone()));
    (StatusCode::CREATED, Json(task))
}

/// GET /tasks/:id
pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, TaskSyncError> {
    Ok(Json(state.store.get(&id)?))
}

/// PUT /tasks/:id
/// Full replacement; the id comes from the path and `last_updated` from the clock.
pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, TaskSyncError> {
    let stored = state
        .store
        .update_with(&id, |existing| Task::replaced_by(existing, draft))?;
    tracing::info!("Updated task {}", stored.id);

    state.replicate(Change::Upsert(stored.clone()));
    Ok(Json(stored))
}

/// DELETE /tasks/:id
pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, TaskSyncError> {
    let tombstone = state.store.delete(&id)?;
    tracing::info!("Deleted task {}", tombstone.id);

    state.replicate(Change::Delete(tombstone));
    Ok(StatusCode::NO_CONTENT)
}
