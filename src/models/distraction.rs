// Distraction log models
// Table: distractions (append-only, one row per finished pomodoro survey)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Distraction record as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Distraction {
    pub id: i64,
    pub pomodoro_id: i64,
    pub had_distractions: bool,
    pub used_phone: bool,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a distraction record
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDistractionRequest {
    pub pomodoro_id: i64,
    pub had_distractions: bool,
    pub used_phone: bool,
    pub user_id: Option<String>,
}

impl CreateDistractionRequest {
    pub fn to_row(&self) -> Value {
        json!({
            "pomodoro_id": self.pomodoro_id,
            "had_distractions": self.had_distractions,
            "used_phone": self.used_phone,
            "user_id": self.user_id,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListDistractionsQuery {
    pub user_id: Option<String>,
}
