// Statistics aggregator
// Read-only composition of the task, pomodoro and distraction services; recomputed per call

use super::distractions::DistractionService;
use super::pomodoros::PomodoroService;
use super::tasks::TaskService;
use crate::error::ServiceError;
use crate::models::{CategoryStats, StatisticsResponse, TaskStats};

#[derive(Clone)]
pub struct StatisticsService {
    tasks: TaskService,
    pomodoros: PomodoroService,
    distractions: DistractionService,
}

/// Completed over total as a percentage rounded to two decimals, ties to
/// even (1 of 32 is 3.12); 0 when total is 0
pub fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = completed as f64 / total as f64 * 100.0;
    (pct * 100.0).round_ties_even() / 100.0
}

impl StatisticsService {
    pub fn new(
        tasks: TaskService,
        pomodoros: PomodoroService,
        distractions: DistractionService,
    ) -> Self {
        Self {
            tasks,
            pomodoros,
            distractions,
        }
    }

    pub async fn report(&self, user_id: Option<&str>) -> Result<StatisticsResponse, ServiceError> {
        let tasks = self.tasks.list(user_id, None).await?;

        let mut tasks_stats = Vec::with_capacity(tasks.len());
        let mut category_stats: Vec<CategoryStats> = Vec::new();

        // One round trip per task
        for task in &tasks {
            let pomodoros_completed = self.pomodoros.count_completed_for_task(task.id).await?;
            let completed_subtasks = task.subtasks.iter().filter(|s| s.completed).count();

            tasks_stats.push(TaskStats {
                task_id: task.id,
                task_title: task.title.clone(),
                total_time_spent: task.time_spent,
                pomodoros_completed,
                completion_percentage: completion_percentage(completed_subtasks, task.subtasks.len()),
            });

            let category = task.effective_category();
            let position = match category_stats.iter().position(|c| c.category == category) {
                Some(position) => position,
                None => {
                    category_stats.push(CategoryStats {
                        category,
                        total_time_spent: 0,
                        pomodoros_completed: 0,
                        tasks_count: 0,
                    });
                    category_stats.len() - 1
                }
            };
            let entry = &mut category_stats[position];
            entry.total_time_spent += task.time_spent;
            entry.pomodoros_completed += pomodoros_completed;
            entry.tasks_count += 1;
        }

        let total_pomodoros = self.pomodoros.count(user_id).await?;
        let total_time_spent = tasks.iter().map(|t| t.time_spent).sum();

        let distractions = self.distractions.list(user_id).await?;
        let distractions_count = distractions.iter().filter(|d| d.had_distractions).count() as i64;
        let phone_usage_count = distractions.iter().filter(|d| d.used_phone).count() as i64;

        tracing::info!(
            "Statistics for user {:?}: {} tasks, {} categories, {} pomodoros",
            user_id,
            tasks_stats.len(),
            category_stats.len(),
            total_pomodoros
        );

        Ok(StatisticsResponse {
            total_pomodoros,
            total_time_spent,
            tasks_stats,
            category_stats,
            distractions_count,
            phone_usage_count,
        })
    }
}
