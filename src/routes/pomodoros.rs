// Pomodoros routes
// Endpoints: GET/POST /api/v1/pomodoros, GET /api/v1/pomodoros/count,
// POST /api/v1/pomodoros/complete, GET/PUT /api/v1/pomodoros/:id

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use super::extract::{AppJson, AppPath, AppQuery};
use crate::error::ServiceError;
use crate::models::{
    CompletePomodoroRequest, CreatePomodoroRequest, ListPomodorosQuery, Pomodoro,
    PomodoroCountQuery, PomodoroCountResponse, UpdatePomodoroRequest,
};
use crate::AppState;

/// POST /api/v1/pomodoros - Start a new pomodoro or break
async fn create_pomodoro(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreatePomodoroRequest>,
) -> Result<Json<Pomodoro>, ServiceError> {
    tracing::info!(
        "Creating pomodoro mode={} task_id={:?} subtasks={:?}",
        request.mode.as_str(),
        request.task_id,
        request.subtask_ids
    );
    Ok(Json(state.pomodoros.create(&request).await?))
}

/// GET /api/v1/pomodoros - List pomodoros, newest first
async fn get_pomodoros(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListPomodorosQuery>,
) -> Result<Json<Vec<Pomodoro>>, ServiceError> {
    tracing::info!(
        "Getting pomodoros with user_id={:?}, completed={:?}",
        query.user_id,
        query.completed
    );
    let pomodoros = state
        .pomodoros
        .list(query.user_id.as_deref(), query.completed)
        .await?;
    Ok(Json(pomodoros))
}

/// GET /api/v1/pomodoros/count - Completed work intervals
async fn get_pomodoro_count(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<PomodoroCountQuery>,
) -> Result<Json<PomodoroCountResponse>, ServiceError> {
    let count = state.pomodoros.count(query.user_id.as_deref()).await?;
    Ok(Json(PomodoroCountResponse { count }))
}

/// GET /api/v1/pomodoros/:id
async fn get_pomodoro(
    State(state): State<AppState>,
    AppPath(pomodoro_id): AppPath<i64>,
) -> Result<Json<Pomodoro>, ServiceError> {
    Ok(Json(state.pomodoros.get(pomodoro_id).await?))
}

/// PUT /api/v1/pomodoros/:id - Update a running pomodoro
async fn update_pomodoro(
    State(state): State<AppState>,
    AppPath(pomodoro_id): AppPath<i64>,
    AppJson(request): AppJson<UpdatePomodoroRequest>,
) -> Result<Json<Pomodoro>, ServiceError> {
    tracing::info!("Updating pomodoro {}", pomodoro_id);
    Ok(Json(state.pomodoros.update(pomodoro_id, &request).await?))
}

/// POST /api/v1/pomodoros/complete - Finish a pomodoro and credit its subtasks
async fn complete_pomodoro(
    State(state): State<AppState>,
    AppJson(request): AppJson<CompletePomodoroRequest>,
) -> Result<Json<Pomodoro>, ServiceError> {
    tracing::info!(
        "Completing pomodoro {} with actual_duration={:?}",
        request.pomodoro_id,
        request.actual_duration
    );
    Ok(Json(state.pomodoros.complete(&request).await?))
}

pub fn pomodoros_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/pomodoros", get(get_pomodoros).post(create_pomodoro))
        .route("/api/v1/pomodoros/count", get(get_pomodoro_count))
        .route("/api/v1/pomodoros/complete", post(complete_pomodoro))
        .route(
            "/api/v1/pomodoros/:id",
            get(get_pomodoro).put(update_pomodoro),
        )
}
