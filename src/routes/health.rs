// Health routes
// Endpoints: GET /, GET /health, GET /database-status

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;

use crate::services::store::{Query, TASKS_TABLE};
use crate::AppState;

/// GET / - Service banner
async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Pomodoro API",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/docs",
    }))
}

/// GET /health - Liveness only, never touches the store
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

/// GET /database-status - Probe the store with a one-row read
async fn database_status(State(state): State<AppState>) -> Response {
    let url = state.config.supabase_url.clone().unwrap_or_default();
    let probe = Query::new().columns("id").limit(1);

    match state.store.select(TASKS_TABLE, &probe).await {
        Ok(_) => Json(json!({
            "status": "connected",
            "database": "supabase",
            "url": url,
            "message": "Database connection successful",
        }))
        .into_response(),
        Err(e) => {
            tracing::error!("Database status check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "detail": {
                        "status": "error",
                        "error": e.to_string(),
                        "url": url,
                        "message": "Database connection failed",
                    }
                })),
            )
                .into_response()
        }
    }
}

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/database-status", get(database_status))
}
