// Distraction service
// Append-only log: create and read, no update or delete

use std::sync::Arc;

use super::pomodoros::PomodoroService;
use super::store::{decode_first, decode_rows, DataStore, Query, DISTRACTIONS_TABLE};
use crate::error::{ServiceError, StoreResultExt};
use crate::models::{CreateDistractionRequest, Distraction};

#[derive(Clone)]
pub struct DistractionService {
    store: Arc<dyn DataStore>,
    pomodoros: PomodoroService,
}

impl DistractionService {
    pub fn new(store: Arc<dyn DataStore>, pomodoros: PomodoroService) -> Self {
        Self { store, pomodoros }
    }

    pub async fn create(&self, request: &CreateDistractionRequest) -> Result<Distraction, ServiceError> {
        self.pomodoros.get(request.pomodoro_id).await?;

        let rows = self
            .store
            .insert(DISTRACTIONS_TABLE, request.to_row())
            .await
            .with_context("create distraction")?;
        let distraction: Distraction = decode_first(rows)
            .with_context("create distraction")?
            .ok_or(ServiceError::WriteFailed("create distraction"))?;

        tracing::info!(
            "Logged distraction {} for pomodoro {} (distracted={}, phone={})",
            distraction.id,
            distraction.pomodoro_id,
            distraction.had_distractions,
            distraction.used_phone
        );
        Ok(distraction)
    }

    pub async fn get(&self, distraction_id: i64) -> Result<Distraction, ServiceError> {
        let rows = self
            .store
            .select(DISTRACTIONS_TABLE, &Query::new().eq("id", distraction_id))
            .await
            .with_context("get distraction")?;
        decode_first(rows)
            .with_context("get distraction")?
            .ok_or_else(|| ServiceError::not_found("Distraction", distraction_id))
    }

    /// Distractions logged for one pomodoro, newest first
    pub async fn list_by_pomodoro(&self, pomodoro_id: i64) -> Result<Vec<Distraction>, ServiceError> {
        self.pomodoros.get(pomodoro_id).await?;

        let query = Query::new()
            .eq("pomodoro_id", pomodoro_id)
            .order_by("created_at", true);
        let rows = self
            .store
            .select(DISTRACTIONS_TABLE, &query)
            .await
            .with_context("get distractions")?;
        decode_rows(rows).with_context("get distractions")
    }

    pub async fn list(&self, user_id: Option<&str>) -> Result<Vec<Distraction>, ServiceError> {
        let mut query = Query::new().order_by("created_at", true);
        if let Some(uid) = user_id.filter(|s| !s.is_empty()) {
            query = query.eq("user_id", uid);
        }

        let rows = self
            .store
            .select(DISTRACTIONS_TABLE, &query)
            .await
            .with_context("get distractions")?;
        decode_rows(rows).with_context("get distractions")
    }
}
