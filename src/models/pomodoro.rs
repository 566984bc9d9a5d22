// Pomodoro models
// Table: pomodoros (subtask_ids is a bigint[] not enforced by foreign keys)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

use super::{check_length, check_range, nullable};

/// Default length of a work interval, in seconds
pub const POMODORO_SECONDS: i64 = 1500;
pub const SHORT_BREAK_SECONDS: i64 = 300;
pub const LONG_BREAK_SECONDS: i64 = 900;
/// Upper bound for any stored or credited duration: one day
pub const MAX_DURATION_SECONDS: i64 = 24 * 60 * 60;

/// Timer mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroMode {
    #[default]
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    /// Nominal duration in seconds when none is supplied
    pub fn default_duration(&self) -> i64 {
        match self {
            PomodoroMode::Pomodoro => POMODORO_SECONDS,
            PomodoroMode::ShortBreak => SHORT_BREAK_SECONDS,
            PomodoroMode::LongBreak => LONG_BREAK_SECONDS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PomodoroMode::Pomodoro => "pomodoro",
            PomodoroMode::ShortBreak => "shortBreak",
            PomodoroMode::LongBreak => "longBreak",
        }
    }
}

/// Postgres arrays come back as null when never set
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<i64>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Pomodoro as stored in the pomodoros table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pomodoro {
    pub id: i64,
    #[serde(default)]
    pub mode: PomodoroMode,
    pub objective: Option<String>,
    pub task_id: Option<i64>,
    /// Subtasks that accrue time when this pomodoro completes, in order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtask_ids: Vec<i64>,
    /// Seconds; the actual elapsed time once completed with one
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub completed: bool,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a pomodoro
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePomodoroRequest {
    #[serde(default)]
    pub mode: PomodoroMode,
    pub objective: Option<String>,
    pub task_id: Option<i64>,
    #[serde(default)]
    pub subtask_ids: Vec<i64>,
    /// Falls back to the mode's default when absent or zero
    pub duration: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
}

impl CreatePomodoroRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(objective) = &self.objective {
            check_length("objective", objective, 0, 1000)?;
        }
        if let Some(duration) = self.duration {
            check_range("duration", duration, 0, MAX_DURATION_SECONDS)?;
        }
        Ok(())
    }

    /// Duration to store: the explicit value, or the mode default
    pub fn effective_duration(&self) -> i64 {
        match self.duration {
            Some(duration) if duration > 0 => duration,
            _ => self.mode.default_duration(),
        }
    }

    pub fn to_row(&self) -> Value {
        json!({
            "mode": self.mode,
            "objective": self.objective,
            "task_id": self.task_id,
            "subtask_ids": self.subtask_ids,
            "duration": self.effective_duration(),
            "completed": false,
            "started_at": self.started_at,
            "user_id": self.user_id,
        })
    }
}

/// Request body for updating a running pomodoro.
///
/// `objective`, `task_id` and `started_at` distinguish absent (untouched)
/// from `null` (cleared).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePomodoroRequest {
    pub mode: Option<PomodoroMode>,
    #[serde(default, deserialize_with = "nullable")]
    pub objective: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_id: Option<Option<i64>>,
    pub subtask_ids: Option<Vec<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub started_at: Option<Option<DateTime<Utc>>>,
    pub duration: Option<i64>,
}

impl UpdatePomodoroRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(Some(objective)) = &self.objective {
            check_length("objective", objective, 0, 1000)?;
        }
        if let Some(duration) = self.duration {
            check_range("duration", duration, 0, MAX_DURATION_SECONDS)?;
        }
        Ok(())
    }

    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(mode) = self.mode {
            changes.insert("mode".into(), json!(mode));
        }
        if let Some(objective) = &self.objective {
            changes.insert("objective".into(), json!(objective));
        }
        if let Some(task_id) = self.task_id {
            changes.insert("task_id".into(), json!(task_id));
        }
        if let Some(subtask_ids) = &self.subtask_ids {
            changes.insert("subtask_ids".into(), json!(subtask_ids));
        }
        if let Some(started_at) = self.started_at {
            changes.insert("started_at".into(), json!(started_at));
        }
        if let Some(duration) = self.duration {
            changes.insert("duration".into(), json!(duration));
        }
        changes
    }
}

/// Request body for POST /api/v1/pomodoros/complete
#[derive(Debug, Clone, Deserialize)]
pub struct CompletePomodoroRequest {
    pub pomodoro_id: i64,
    /// Actual elapsed seconds, when the timer was stopped early or ran over
    pub actual_duration: Option<i64>,
}

impl CompletePomodoroRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(actual) = self.actual_duration {
            check_range("actual_duration", actual, 0, MAX_DURATION_SECONDS)?;
        }
        Ok(())
    }
}

/// Query params for GET /api/v1/pomodoros
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPomodorosQuery {
    pub user_id: Option<String>,
    pub completed: Option<bool>,
}

/// Query params for GET /api/v1/pomodoros/count
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PomodoroCountQuery {
    pub user_id: Option<String>,
}

/// Response for GET /api/v1/pomodoros/count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PomodoroCountResponse {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_wire_names() {
        assert_eq!(serde_json::to_value(PomodoroMode::ShortBreak).unwrap(), json!("shortBreak"));
        assert_eq!(serde_json::to_value(PomodoroMode::LongBreak).unwrap(), json!("longBreak"));
        let mode: PomodoroMode = serde_json::from_value(json!("pomodoro")).unwrap();
        assert_eq!(mode, PomodoroMode::Pomodoro);
        assert!(serde_json::from_value::<PomodoroMode>(json!("nap")).is_err());
    }

    #[test]
    fn test_effective_duration_falls_back_to_mode_default() {
        let mut request = CreatePomodoroRequest {
            mode: PomodoroMode::LongBreak,
            ..Default::default()
        };
        assert_eq!(request.effective_duration(), 900);

        request.duration = Some(0);
        assert_eq!(request.effective_duration(), 900);

        request.duration = Some(1234);
        assert_eq!(request.effective_duration(), 1234);
    }

    #[test]
    fn test_update_tells_null_from_absent() {
        let update: UpdatePomodoroRequest =
            serde_json::from_value(json!({"task_id": null, "objective": null})).unwrap();
        assert_eq!(update.task_id, Some(None));
        let changes = update.changes();
        assert_eq!(changes["task_id"], Value::Null);
        assert_eq!(changes["objective"], Value::Null);
        assert!(!changes.contains_key("started_at"));

        let update: UpdatePomodoroRequest = serde_json::from_value(json!({"task_id": 4})).unwrap();
        assert_eq!(update.task_id, Some(Some(4)));
        assert!(update.objective.is_none());
    }

    #[test]
    fn test_complete_request_bounds_actual_duration() {
        let request = |actual| CompletePomodoroRequest {
            pomodoro_id: 1,
            actual_duration: Some(actual),
        };
        assert!(request(1200).validate().is_ok());
        assert!(request(-1).validate().is_err());
        assert!(request(i64::MAX).validate().is_err());
        assert!(request(MAX_DURATION_SECONDS + 1).validate().is_err());
    }

    #[test]
    fn test_null_subtask_ids_decode_as_empty() {
        let pomodoro: Pomodoro = serde_json::from_value(json!({
            "id": 3,
            "mode": "pomodoro",
            "objective": null,
            "task_id": null,
            "subtask_ids": null,
            "duration": 1500,
            "completed": false,
            "started_at": null,
            "completed_at": null,
            "user_id": null,
            "created_at": "2024-01-01T10:00:00Z",
            "updated_at": "2024-01-01T10:00:00Z"
        }))
        .unwrap();
        assert!(pomodoro.subtask_ids.is_empty());
    }
}
