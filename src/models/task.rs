// Task and subtask models
// Tables: tasks, subtasks (subtasks.task_id -> tasks.id ON DELETE CASCADE)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{check_length, check_non_negative, nullable};

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    #[default]
    Personal,
    #[serde(alias = "laboral")]
    Work,
    #[serde(alias = "otro")]
    Other,
}

impl TaskCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Personal => "personal",
            TaskCategory::Work => "work",
            TaskCategory::Other => "other",
        }
    }
}

/// Subtask as stored in the subtasks table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subtask {
    pub id: i64,
    pub task_id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    /// Seconds accrued by completed pomodoros
    #[serde(default)]
    pub time_spent: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task as stored in the tasks table, with its subtasks attached on read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: TaskCategory,
    /// Free-form label, only meaningful when category is `other`
    pub custom_category: Option<String>,
    #[serde(default)]
    pub time_spent: i64,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
}

impl Task {
    /// Grouping key for statistics: the custom label stands in for `other`
    pub fn effective_category(&self) -> String {
        match (&self.category, self.custom_category.as_deref()) {
            (TaskCategory::Other, Some(label)) if !label.is_empty() => label.to_string(),
            (category, _) => category.as_str().to_string(),
        }
    }
}

/// Request body for creating a task
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub category: TaskCategory,
    pub custom_category: Option<String>,
    #[serde(default)]
    pub time_spent: i64,
    pub user_id: Option<String>,
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_length("title", &self.title, 1, 500)?;
        if let Some(label) = &self.custom_category {
            check_length("custom_category", label, 0, 100)?;
        }
        check_non_negative("time_spent", self.time_spent)
    }

    pub fn to_row(&self) -> Value {
        json!({
            "title": self.title,
            "completed": self.completed,
            "category": self.category,
            "custom_category": self.custom_category,
            "time_spent": self.time_spent,
            "user_id": self.user_id,
        })
    }
}

/// Request body for updating a task; absent fields are left untouched,
/// an explicit `null` custom_category clears it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub category: Option<TaskCategory>,
    #[serde(default, deserialize_with = "nullable")]
    pub custom_category: Option<Option<String>>,
    pub time_spent: Option<i64>,
}

impl UpdateTaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            check_length("title", title, 1, 500)?;
        }
        if let Some(Some(label)) = &self.custom_category {
            check_length("custom_category", label, 0, 100)?;
        }
        if let Some(time_spent) = self.time_spent {
            check_non_negative("time_spent", time_spent)?;
        }
        Ok(())
    }

    /// Only the supplied fields
    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(title) = &self.title {
            changes.insert("title".into(), json!(title));
        }
        if let Some(completed) = self.completed {
            changes.insert("completed".into(), json!(completed));
        }
        if let Some(category) = self.category {
            changes.insert("category".into(), json!(category));
        }
        if let Some(label) = &self.custom_category {
            changes.insert("custom_category".into(), json!(label));
        }
        if let Some(time_spent) = self.time_spent {
            changes.insert("time_spent".into(), json!(time_spent));
        }
        changes
    }
}

/// Request body for creating a subtask
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubtaskRequest {
    pub task_id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub time_spent: i64,
}

impl CreateSubtaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        check_length("title", &self.title, 1, 500)?;
        check_non_negative("time_spent", self.time_spent)
    }

    pub fn to_row(&self) -> Value {
        json!({
            "task_id": self.task_id,
            "title": self.title,
            "completed": self.completed,
            "time_spent": self.time_spent,
        })
    }
}

/// Request body for updating a subtask
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubtaskRequest {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub time_spent: Option<i64>,
}

impl UpdateSubtaskRequest {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            check_length("title", title, 1, 500)?;
        }
        if let Some(time_spent) = self.time_spent {
            check_non_negative("time_spent", time_spent)?;
        }
        Ok(())
    }

    pub fn changes(&self) -> Map<String, Value> {
        let mut changes = Map::new();
        if let Some(title) = &self.title {
            changes.insert("title".into(), json!(title));
        }
        if let Some(completed) = self.completed {
            changes.insert("completed".into(), json!(completed));
        }
        if let Some(time_spent) = self.time_spent {
            changes.insert("time_spent".into(), json!(time_spent));
        }
        changes
    }
}

/// Query params for GET /api/v1/tasks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    pub user_id: Option<String>,
    /// Case-insensitive title substring
    pub search: Option<String>,
}
