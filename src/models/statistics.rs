// Statistics report models

use serde::{Deserialize, Serialize};

/// Per-task line of the report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub task_id: i64,
    pub task_title: String,
    pub total_time_spent: i64,
    pub pomodoros_completed: i64,
    /// Completed subtasks over total, 0-100 with two decimals
    pub completion_percentage: f64,
}

/// Totals for one effective category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub category: String,
    pub total_time_spent: i64,
    pub pomodoros_completed: i64,
    pub tasks_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsResponse {
    pub total_pomodoros: i64,
    /// Seconds, summed over the tasks in scope
    pub total_time_spent: i64,
    pub tasks_stats: Vec<TaskStats>,
    pub category_stats: Vec<CategoryStats>,
    pub distractions_count: i64,
    pub phone_usage_count: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatisticsQuery {
    pub user_id: Option<String>,
}
