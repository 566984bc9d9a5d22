// Subtask service
// Parent task existence is checked through TaskService before dependent operations

use std::sync::Arc;

use serde_json::Value;

use super::store::{decode_first, decode_rows, DataStore, Filter, Query, SUBTASKS_TABLE};
use super::tasks::TaskService;
use crate::error::{ServiceError, StoreResultExt};
use crate::models::{CreateSubtaskRequest, Subtask, UpdateSubtaskRequest};

#[derive(Clone)]
pub struct SubtaskService {
    store: Arc<dyn DataStore>,
    tasks: TaskService,
}

impl SubtaskService {
    pub fn new(store: Arc<dyn DataStore>, tasks: TaskService) -> Self {
        Self { store, tasks }
    }

    pub async fn create(&self, request: &CreateSubtaskRequest) -> Result<Subtask, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;
        self.tasks.get(request.task_id).await?;

        let rows = self
            .store
            .insert(SUBTASKS_TABLE, request.to_row())
            .await
            .with_context("create subtask")?;
        let subtask: Subtask = decode_first(rows)
            .with_context("create subtask")?
            .ok_or(ServiceError::WriteFailed("create subtask"))?;

        tracing::info!("Created subtask {} under task {}", subtask.id, subtask.task_id);
        Ok(subtask)
    }

    pub async fn get(&self, subtask_id: i64) -> Result<Subtask, ServiceError> {
        let rows = self
            .store
            .select(SUBTASKS_TABLE, &Query::new().eq("id", subtask_id))
            .await
            .with_context("get subtask")?;
        decode_first(rows)
            .with_context("get subtask")?
            .ok_or_else(|| ServiceError::not_found("Subtask", subtask_id))
    }

    /// Subtasks of a task, oldest first
    pub async fn list_by_task(&self, task_id: i64) -> Result<Vec<Subtask>, ServiceError> {
        self.tasks.get(task_id).await?;

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

    pub async fn update(
        &self,
        subtask_id: i64,
        request: &UpdateSubtaskRequest,
    ) -> Result<Subtask, ServiceError> {
        request.validate().map_err(ServiceError::Validation)?;
        let current = self.get(subtask_id).await?;

        let changes = request.changes();
        if changes.is_empty() {
            return Ok(current);
        }

        let rows = self
            .store
            .update(SUBTASKS_TABLE, &[Filter::eq("id", subtask_id)], Value::Object(changes))
            .await
            .with_context("update subtask")?;
        let subtask = decode_first(rows)
            .with_context("update subtask")?
            .ok_or(ServiceError::WriteFailed("update subtask"))?;

        tracing::info!("Updated subtask {}", subtask_id);
        Ok(subtask)
    }

    pub async fn delete(&self, subtask_id: i64) -> Result<(), ServiceError> {
        self.get(subtask_id).await?;

        self.store
            .delete(SUBTASKS_TABLE, &[Filter::eq("id", subtask_id)])
            .await
            .with_context("delete subtask")?;

        tracing::info!("Deleted subtask {}", subtask_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateTaskRequest;
    use crate::services::memory::MemoryStore;
    use serde_json::json;

    fn setup() -> (Arc<MemoryStore>, TaskService, SubtaskService) {
        let store = Arc::new(MemoryStore::new());
        let tasks = TaskService::new(store.clone());
        let subtasks = SubtaskService::new(store.clone(), tasks.clone());
        (store, tasks, subtasks)
    }

    async fn parent(tasks: &TaskService) -> i64 {
        let request: CreateTaskRequest = serde_json::from_value(json!({"title": "Parent"})).unwrap();
        tasks.create(&request).await.unwrap().id
    }

    fn new_subtask(task_id: i64, title: &str) -> CreateSubtaskRequest {
        serde_json::from_value(json!({"task_id": task_id, "title": title})).unwrap()
    }

    #[tokio::test]
    async fn test_create_requires_existing_task() {
        let (store, _, subtasks) = setup();
        let err = subtasks.create(&new_subtask(42, "Orphan")).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Task", id: 42 }));
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_create_with_initial_time() {
        let (_, tasks, subtasks) = setup();
        let task_id = parent(&tasks).await;
        let mut request = new_subtask(task_id, "Outline");
        request.time_spent = 600;

        let subtask = subtasks.create(&request).await.unwrap();
        assert_eq!(subtask.task_id, task_id);
        assert_eq!(subtask.time_spent, 600);
        assert!(!subtask.completed);
    }

    #[tokio::test]
    async fn test_list_by_task_is_oldest_first() {
        let (_, tasks, subtasks) = setup();
        let task_id = parent(&tasks).await;
        for title in ["a", "b", "c"] {
            subtasks.create(&new_subtask(task_id, title)).await.unwrap();
        }

        let listed = subtasks.list_by_task(task_id).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);

        assert!(matches!(
            subtasks.list_by_task(task_id + 100).await,
            Err(ServiceError::NotFound { entity: "Task", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_and_noop_update() {
        let (store, tasks, subtasks) = setup();
        let task_id = parent(&tasks).await;
        let subtask = subtasks.create(&new_subtask(task_id, "Edit me")).await.unwrap();

        let done = UpdateSubtaskRequest {
            completed: Some(true),
            ..Default::default()
        };
        let updated = subtasks.update(subtask.id, &done).await.unwrap();
        assert!(updated.completed);
        assert_eq!(updated.title, "Edit me");

        let writes = store.writes();
        let same = subtasks.update(subtask.id, &UpdateSubtaskRequest::default()).await.unwrap();
        assert!(same.completed);
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_delete() {
        let (store, tasks, subtasks) = setup();
        let task_id = parent(&tasks).await;
        let subtask = subtasks.create(&new_subtask(task_id, "Gone")).await.unwrap();

        subtasks.delete(subtask.id).await.unwrap();
        assert!(store.row(SUBTASKS_TABLE, subtask.id).is_none());

        let writes = store.writes();
        assert!(matches!(
            subtasks.delete(subtask.id).await,
            Err(ServiceError::NotFound { entity: "Subtask", .. })
        ));
        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_deleting_task_cascades_to_subtasks() {
        let (_, tasks, subtasks) = setup();
        let task_id = parent(&tasks).await;
        let subtask = subtasks.create(&new_subtask(task_id, "Child")).await.unwrap();

        tasks.delete(task_id).await.unwrap();
        assert!(matches!(subtasks.get(subtask.id).await, Err(ServiceError::NotFound { .. })));
    }
}
