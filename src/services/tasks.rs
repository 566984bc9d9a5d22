// Task service
// Tasks are always returned with their subtasks attached (oldest first)

use std::sync::Arc;

use serde_json::Value;

use super::store::{decode_first, decode_rows, DataStore, Filter, Query, SUBTASKS_TABLE, TASKS_TABLE};
use crate::error::{ServiceError, StoreResultExt};
use crate::models::{CreateTaskRequest, Subtask, Task, UpdateTaskRequest};

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn DataStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Subtasks of a task, ascending by creation time
    async fn fetch_subtasks(&self, task_id: i64) -> Result<Vec<Subtask>, ServiceError> {
        let query = Query::new()
            .eq("task_id", task_id)
            .order_by("created_at", false);
        let rows = self
            .store
            .select(SUBTASKS_TABLE, &query)
            .await
            .with_context("get subtasks")?;
        decode_rows(rows).with_context("get subtasks")
    }

    async fn attach_subtasks(&self, mut task: Task) -> Result<Task, ServiceError> {
        task.subtasks = self.fetch_subtasks(task.id).await?;
        Ok(task)
    }

    /// Create a task; the returned task has an empty subtask list
    pub async fn create(&self, request: &CreateTaskRequest) -> Result<Task, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;

        let rows = self
            .store
            .insert(TASKS_TABLE, request.to_row())
            .await
            .with_context("create task")?;
        let id = rows
            .first()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_i64)
            .ok_or(ServiceError::WriteFailed("create task"))?;

        tracing::info!("Created task {} '{}'", id, request.title);
        self.get(id).await
    }

    /// Get a task by ID with its subtasks
    pub async fn get(&self, task_id: i64) -> Result<Task, ServiceError> {
        let rows = self
            .store
            .select(TASKS_TABLE, &Query::new().eq("id", task_id))
            .await
            .with_context("get task")?;
        let task: Task = decode_first(rows)
            .with_context("get task")?
            .ok_or_else(|| ServiceError::not_found("Task", task_id))?;

        self.attach_subtasks(task).await
    }

    /// List tasks, newest first, optionally filtered by owner and title search
    pub async fn list(
        &self,
        user_id: Option<&str>,
        search: Option<&str>,
    ) -> Result<Vec<Task>, ServiceError> {
        let mut query = Query::new().order_by("created_at", true);
        if let Some(uid) = user_id.filter(|s| !s.is_empty()) {
            query = query.eq("user_id", uid);
        }
        if let Some(term) = search.filter(|s| !s.is_empty()) {
            query = query.filter(Filter::ilike("title", term));
        }

        let rows = self
            .store
            .select(TASKS_TABLE, &query)
            .await
            .with_context("get tasks")?;
        let tasks: Vec<Task> = decode_rows(rows).with_context("get tasks")?;

        let tasks = futures::future::try_join_all(
            tasks.into_iter().map(|task| self.attach_subtasks(task)),
        )
        .await?;

        tracing::info!("Retrieved {} tasks (user_id={:?}, search={:?})", tasks.len(), user_id, search);
        Ok(tasks)
    }

    /// Update the supplied fields and return the refreshed task
    pub async fn update(&self, task_id: i64, request: &UpdateTaskRequest) -> Result<Task, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;
        let current = self.get(task_id).await?;

        let changes = request.changes();
        if changes.is_empty() {
            return Ok(current);
        }

        let rows = self
            .store
            .update(TASKS_TABLE, &[Filter::eq("id", task_id)], Value::Object(changes))
            .await
            .with_context("update task")?;
        if rows.is_empty() {
            return Err(ServiceError::WriteFailed("update task"));
        }

        tracing::info!("Updated task {}", task_id);
        self.get(task_id).await
    }

    /// Delete a task; subtasks go with it through the store's cascade
    pub async fn delete(&self, task_id: i64) -> Result<(), ServiceError> {
        self.get(task_id).await?;

        self.store
            .delete(TASKS_TABLE, &[Filter::eq("id", task_id)])
            .await
            .with_context("delete task")?;

        tracing::info!("Deleted task {}", task_id);
        Ok(())
    }
}
