// Routes module

pub mod distractions;
pub mod extract;
pub mod health;
pub mod pomodoros;
pub mod statistics;
pub mod subtasks;
pub mod tasks;

use axum::Router;

use crate::AppState;

pub use distractions::distractions_routes;
pub use health::health_routes;
pub use pomodoros::pomodoros_routes;
pub use statistics::statistics_routes;
pub use subtasks::subtasks_routes;
pub use tasks::tasks_routes;

/// Every endpoint, bound to the shared state. Layers are added by the caller.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(tasks_routes())
        .merge(subtasks_routes())
        .merge(pomodoros_routes())
        .merge(distractions_routes())
        .merge(statistics_routes())
        .with_state(state)
}
