// Subtasks routes
// Endpoints: POST /api/v1/subtasks, GET /api/v1/subtasks/task/:task_id,
// GET/PUT/DELETE /api/v1/subtasks/:id

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::extract::{AppJson, AppPath};
use crate::error::ServiceError;
use crate::models::{CreateSubtaskRequest, MessageResponse, Subtask, UpdateSubtaskRequest};
use crate::AppState;

/// POST /api/v1/subtasks - Create a subtask under an existing task
async fn create_subtask(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateSubtaskRequest>,
) -> Result<Json<Subtask>, ServiceError> {
    tracing::info!("Creating subtask '{}' for task {}", request.title, request.task_id);
    Ok(Json(state.subtasks.create(&request).await?))
}

/// GET /api/v1/subtasks/task/:task_id - Subtasks of a task, oldest first
async fn get_subtasks_by_task(
    State(state): State<AppState>,
    AppPath(task_id): AppPath<i64>,
) -> Result<Json<Vec<Subtask>>, ServiceError> {
    tracing::info!("Getting subtasks for task {}", task_id);
    Ok(Json(state.subtasks.list_by_task(task_id).await?))
}

/// GET /api/v1/subtasks/:id
async fn get_subtask(
    State(state): State<AppState>,
    AppPath(subtask_id): AppPath<i64>,
) -> Result<Json<Subtask>, ServiceError> {
    Ok(Json(state.subtasks.get(subtask_id).await?))
}

/// PUT /api/v1/subtasks/:id
async fn update_subtask(
    State(state): State<AppState>,
    AppPath(subtask_id): AppPath<i64>,
    AppJson(request): AppJson<UpdateSubtaskRequest>,
) -> Result<Json<Subtask>, ServiceError> {
    tracing::info!("Updating subtask {}", subtask_id);
    Ok(Json(state.subtasks.update(subtask_id, &request).await?))
}

/// DELETE /api/v1/subtasks/:id
async fn delete_subtask(
    State(state): State<AppState>,
    AppPath(subtask_id): AppPath<i64>,
) -> Result<Json<MessageResponse>, ServiceError> {
    tracing::info!("Deleting subtask {}", subtask_id);
    state.subtasks.delete(subtask_id).await?;
    Ok(Json(MessageResponse {
        message: "Subtask deleted successfully".to_string(),
    }))
}

pub fn subtasks_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/subtasks", post(create_subtask))
        .route("/api/v1/subtasks/task/:task_id", get(get_subtasks_by_task))
        .route(
            "/api/v1/subtasks/:id",
            get(get_subtask).put(update_subtask).delete(delete_subtask),
        )
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{send, test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_subtask_lifecycle() {
        let (_, app) = test_app();
        let (_, task) =
            send(&app, Method::POST, "/api/v1/tasks", Some(json!({"title": "Parent"}))).await;

        let (status, subtask) = send(
            &app,
            Method::POST,
            "/api/v1/subtasks",
            Some(json!({"task_id": task["id"], "title": "Step 1"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(subtask["time_spent"], 0);

        let (status, listed) =
            send(&app, Method::GET, &format!("/api/v1/subtasks/task/{}", task["id"]), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed.as_array().unwrap().len(), 1);

        let uri = format!("/api/v1/subtasks/{}", subtask["id"]);
        let (status, updated) =
            send(&app, Method::PUT, &uri, Some(json!({"completed": true}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["completed"], true);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Subtask deleted successfully");

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_for_missing_task_is_404() {
        let (_, app) = test_app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/subtasks",
            Some(json!({"task_id": 999, "title": "Orphan"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Task with ID 999 not found");
    }

    #[tokio::test]
    async fn test_negative_time_is_rejected() {
        let (_, app) = test_app();
        let (_, task) =
            send(&app, Method::POST, "/api/v1/tasks", Some(json!({"title": "Parent"}))).await;
        let (_, subtask) = send(
            &app,
            Method::POST,
            "/api/v1/subtasks",
            Some(json!({"task_id": task["id"], "title": "Step"})),
        )
        .await;

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/subtasks/{}", subtask["id"]),
            Some(json!({"time_spent": -1})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
