// Pomodoro service
// Includes the completion workflow that credits elapsed time to tracked subtasks

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Map, Value};

use super::store::{decode_first, decode_rows, DataStore, Filter, Query, POMODOROS_TABLE};
use super::subtasks::SubtaskService;
use super::tasks::TaskService;
use crate::error::{ServiceError, StoreResultExt};
use crate::models::{
    CompletePomodoroRequest, CreatePomodoroRequest, Pomodoro, PomodoroMode,
    UpdatePomodoroRequest, UpdateSubtaskRequest, POMODORO_SECONDS,
};

#[derive(Clone)]
pub struct PomodoroService {
    store: Arc<dyn DataStore>,
    tasks: TaskService,
    subtasks: SubtaskService,
}

impl PomodoroService {
    pub fn new(store: Arc<dyn DataStore>, tasks: TaskService, subtasks: SubtaskService) -> Self {
        Self {
            store,
            tasks,
            subtasks,
        }
    }

    /// Create a pomodoro; duration defaults from the mode when not given
    pub async fn create(&self, request: &CreatePomodoroRequest) -> Result<Pomodoro, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;
        if let Some(task_id) = request.task_id {
            self.tasks.get(task_id).await?;
        }

        let rows = self
            .store
            .insert(POMODOROS_TABLE, request.to_row())
            .await
            .with_context("create pomodoro")?;
        let pomodoro: Pomodoro = decode_first(rows)
            .with_context("create pomodoro")?
            .ok_or(ServiceError::WriteFailed("create pomodoro"))?;

        tracing::info!(
            "Created pomodoro {} mode={} duration={}s task_id={:?}",
            pomodoro.id,
            pomodoro.mode.as_str(),
            pomodoro.duration,
            pomodoro.task_id
        );
        Ok(pomodoro)
    }

    pub async fn get(&self, pomodoro_id: i64) -> Result<Pomodoro, ServiceError> {
        let rows = self
            .store
            .select(POMODOROS_TABLE, &Query::new().eq("id", pomodoro_id))
            .await
            .with_context("get pomodoro")?;
        decode_first(rows)
            .with_context("get pomodoro")?
            .ok_or_else(|| ServiceError::not_found("Pomodoro", pomodoro_id))
    }

    /// List pomodoros, newest first
    pub async fn list(
        &self,
        user_id: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Vec<Pomodoro>, ServiceError> {
        let mut query = Query::new().order_by("created_at", true);
        if let Some(uid) = user_id.filter(|s| !s.is_empty()) {
            query = query.eq("user_id", uid);
        }
        if let Some(completed) = completed {
            query = query.eq("completed", completed);
        }

        let rows = self
            .store
            .select(POMODOROS_TABLE, &query)
            .await
            .with_context("get pomodoros")?;
        decode_rows(rows).with_context("get pomodoros")
    }

    /// Merge the supplied fields into a pomodoro
    pub async fn update(
        &self,
        pomodoro_id: i64,
        request: &UpdatePomodoroRequest,
    ) -> Result<Pomodoro, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;
        let current = self.get(pomodoro_id).await?;

        let changes = request.changes();
        if changes.is_empty() {
            return Ok(current);
        }

        let pomodoro = self.write(pomodoro_id, changes, "update pomodoro").await?;
        tracing::info!("Updated pomodoro {}", pomodoro_id);
        Ok(pomodoro)
    }

    async fn write(
        &self,
        pomodoro_id: i64,
        changes: Map<String, Value>,
        operation: &'static str,
    ) -> Result<Pomodoro, ServiceError> {
        let rows = self
            .store
            .update(POMODOROS_TABLE, &[Filter::eq("id", pomodoro_id)], Value::Object(changes))
            .await
            .with_context(operation)?;
        decode_first(rows)
            .with_context(operation)?
            .ok_or(ServiceError::WriteFailed(operation))
    }

    /// Number of completed work intervals (breaks excluded)
    pub async fn count(&self, user_id: Option<&str>) -> Result<i64, ServiceError> {
        let mut filters = vec![
            Filter::eq("completed", true),
            Filter::eq("mode", PomodoroMode::Pomodoro.as_str()),
        ];
        if let Some(uid) = user_id.filter(|s| !s.is_empty()) {
            filters.push(Filter::eq("user_id", uid));
        }

        match self.store.count(POMODOROS_TABLE, &filters).await {
            Ok(Some(count)) => return Ok(count),
            Ok(None) => tracing::debug!("Store returned no exact count, counting in memory"),
            Err(e) => tracing::warn!("Pomodoro count query failed, counting in memory: {}", e),
        }

        let completed = self.list(user_id, Some(true)).await?;
        Ok(completed
            .iter()
            .filter(|p| p.mode == PomodoroMode::Pomodoro)
            .count() as i64)
    }

    /// Completed pomodoros of any mode linked to a task
    pub async fn count_completed_for_task(&self, task_id: i64) -> Result<i64, ServiceError> {
        let query = Query::new()
            .columns("id")
            .eq("task_id", task_id)
            .eq("completed", true);
        let rows = self
            .store
            .select(POMODOROS_TABLE, &query)
            .await
            .with_context("count task pomodoros")?;
        Ok(rows.len() as i64)
    }

    /// Complete a pomodoro and credit its time to the subtasks it tracked.
    ///
    /// New totals are computed for every subtask before the first write, so
    /// an unknown subtask or an overflowing total changes nothing. The writes
    /// themselves are sequential and independent: if one fails, the subtasks
    /// before it keep their new time and the pomodoro stays uncompleted.
    pub async fn complete(&self, request: &CompletePomodoroRequest) -> Result<Pomodoro, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;
        let pomodoro = self.get(request.pomodoro_id).await?;
        let actual = request.actual_duration.filter(|d| *d > 0);

        if pomodoro.mode == PomodoroMode::Pomodoro && !pomodoro.subtask_ids.is_empty() {
            let credit = actual
                .or(Some(pomodoro.duration).filter(|d| *d > 0))
                .unwrap_or(POMODORO_SECONDS);

            let mut totals = Vec::with_capacity(pomodoro.subtask_ids.len());
            for subtask_id in &pomodoro.subtask_ids {
                let subtask = self.subtasks.get(*subtask_id).await?;
                let total = subtask.time_spent.checked_add(credit).ok_or_else(|| {
                    ServiceError::Validation(format!(
                        "time_spent of subtask {} would overflow",
                        subtask_id
                    ))
                })?;
                totals.push((*subtask_id, total));
            }

            for (subtask_id, total) in totals {
                let update = UpdateSubtaskRequest {
                    time_spent: Some(total),
                    ..Default::default()
                };
                self.subtasks.update(subtask_id, &update).await?;
                tracing::info!(
                    "Credited {}s to subtask {} from pomodoro {}",
                    credit,
                    subtask_id,
                    pomodoro.id
                );
            }
        }

        let mut changes = Map::new();
        changes.insert("completed".into(), json!(true));
        changes.insert("completed_at".into(), json!(Utc::now()));
        if let Some(actual) = actual {
            changes.insert("duration".into(), json!(actual));
        }

        let completed = self.write(pomodoro.id, changes, "complete pomodoro").await?;
        tracing::info!("Completed pomodoro {} ({}s)", completed.id, completed.duration);
        Ok(completed)
    }
}
