// Statistics routes
// Endpoint: GET /api/v1/statistics

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};

use super::extract::AppQuery;
use crate::error::ServiceError;
use crate::models::{StatisticsQuery, StatisticsResponse};
use crate::AppState;

/// GET /api/v1/statistics - Aggregate report over tasks, pomodoros and distractions
async fn get_statistics(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<StatisticsQuery>,
) -> Result<Json<StatisticsResponse>, ServiceError> {
    tracing::info!("Building statistics for user_id={:?}", query.user_id);
    Ok(Json(state.statistics.report(query.user_id.as_deref()).await?))
}

pub fn statistics_routes() -> Router<AppState> {
    Router::new().route("/api/v1/statistics", get(get_statistics))
}
