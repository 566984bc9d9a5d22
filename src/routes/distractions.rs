// Distractions routes
// Endpoints: GET/POST /api/v1/distractions, GET /api/v1/distractions/:id,
// GET /api/v1/distractions/pomodoro/:pomodoro_id

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use super::extract::{AppJson, AppPath, AppQuery};
use crate::error::ServiceError;
use crate::models::{CreateDistractionRequest, Distraction, ListDistractionsQuery};
use crate::AppState;

/// POST /api/v1/distractions - Record the post-pomodoro distraction survey
async fn create_distraction(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateDistractionRequest>,
) -> Result<Json<Distraction>, ServiceError> {
    tracing::info!(
        "Recording distractions for pomodoro {} (distracted={}, phone={})",
        request.pomodoro_id,
        request.had_distractions,
        request.used_phone
    );
    Ok(Json(state.distractions.create(&request).await?))
}

/// GET /api/v1/distractions - List distraction records, newest first
async fn get_distractions(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListDistractionsQuery>,
) -> Result<Json<Vec<Distraction>>, ServiceError> {
    Ok(Json(state.distractions.list(query.user_id.as_deref()).await?))
}

/// GET /api/v1/distractions/:id
async fn get_distraction(
    State(state): State<AppState>,
    AppPath(distraction_id): AppPath<i64>,
) -> Result<Json<Distraction>, ServiceError> {
    Ok(Json(state.distractions.get(distraction_id).await?))
}

/// GET /api/v1/distractions/pomodoro/:pomodoro_id
async fn get_distractions_by_pomodoro(
    State(state): State<AppState>,
    AppPath(pomodoro_id): AppPath<i64>,
) -> Result<Json<Vec<Distraction>>, ServiceError> {
    Ok(Json(state.distractions.list_by_pomodoro(pomodoro_id).await?))
}

pub fn distractions_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/distractions",
            get(get_distractions).post(create_distraction),
        )
        .route("/api/v1/distractions/:id", get(get_distraction))
        .route(
            "/api/v1/distractions/pomodoro/:pomodoro_id",
            get(get_distractions_by_pomodoro),
        )
}
