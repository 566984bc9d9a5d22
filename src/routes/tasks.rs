// Tasks routes
// Endpoints: GET/POST /api/v1/tasks, GET/PUT/DELETE /api/v1/tasks/:id

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use super::extract::{AppJson, AppPath, AppQuery};
use crate::error::ServiceError;
use crate::models::{CreateTaskRequest, ListTasksQuery, Task, UpdateTaskRequest};
use crate::AppState;

/// POST /api/v1/tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ServiceError> {
    tracing::info!(
        "Creating task '{}' with category={:?}, user_id={:?}",
        request.title,
        request.category,
        request.user_id
    );

    let task = state.tasks.create(&request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/tasks - List tasks, newest first
async fn get_tasks(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListTasksQuery>,
) -> Result<Json<Vec<Task>>, ServiceError> {
    tracing::info!(
        "Getting tasks with user_id={:?}, search={:?}",
        query.user_id,
        query.search
    );

    let tasks = state
        .tasks
        .list(query.user_id.as_deref(), query.search.as_deref())
        .await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/:id - Get a task with its subtasks
async fn get_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<i64>,
) -> Result<Json<Task>, ServiceError> {
    tracing::info!("Getting task {}", task_id);
    Ok(Json(state.tasks.get(task_id).await?))
}

/// PUT /api/v1/tasks/:id - Update a task
async fn update_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<i64>,
    AppJson(request): AppJson<UpdateTaskRequest>,
) -> Result<Json<Task>, ServiceError> {
    tracing::info!("Updating task {}", task_id);
    Ok(Json(state.tasks.update(task_id, &request).await?))
}

/// DELETE /api/v1/tasks/:id - Delete a task and its subtasks
async fn delete_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<i64>,
) -> Result<StatusCode, ServiceError> {
    tracing::info!("Deleting task {}", task_id);
    state.tasks.delete(task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn tasks_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tasks", get(get_tasks).post(create_task))
        .route(
            "/api/v1/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
}
