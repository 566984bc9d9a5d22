// Models module

pub mod distraction;
pub mod pomodoro;
pub mod statistics;
pub mod task;

use serde::{Deserialize, Deserializer, Serialize};

pub use distraction::{CreateDistractionRequest, Distraction, ListDistractionsQuery};
pub use pomodoro::{
    CompletePomodoroRequest, CreatePomodoroRequest, ListPomodorosQuery, Pomodoro,
    PomodoroCountQuery, PomodoroCountResponse, PomodoroMode, UpdatePomodoroRequest,
    POMODORO_SECONDS,
};
pub use statistics::{CategoryStats, StatisticsQuery, StatisticsResponse, TaskStats};
pub use task::{
    CreateSubtaskRequest, CreateTaskRequest, ListTasksQuery, Subtask, Task, TaskCategory,
    UpdateSubtaskRequest, UpdateTaskRequest,
};

/// Plain `{"message": ...}` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Character-length bounds check for a text field
pub(crate) fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), String> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(format!(
            "{} must be between {} and {} characters (got {})",
            field, min, max, len
        ));
    }
    Ok(())
}

/// Tells an explicit `null` apart from an absent field: absent stays `None`
/// through `#[serde(default)]`, `null` becomes `Some(None)`
pub(crate) fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

pub(crate) fn check_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!(
            "{} must be between {} and {} (got {})",
            field, min, max, value
        ));
    }
    Ok(())
}

pub(crate) fn check_non_negative(field: &str, value: i64) -> Result<(), String> {
    if value < 0 {
        return Err(format!("{} must be >= 0 (got {})", field, value));
    }
    Ok(())
}
