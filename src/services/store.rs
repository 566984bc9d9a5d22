// Data access facade
// Thin table-oriented interface over the hosted store, injected into every service

use async_trait::async_trait;
use serde_json::Value;

/// Table names in the hosted database
pub const TASKS_TABLE: &str = "tasks";
pub const SUBTASKS_TABLE: &str = "subtasks";
pub const POMODOROS_TABLE: &str = "pomodoros";
pub const DISTRACTIONS_TABLE: &str = "distractions";

/// Errors raised by a store call
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request to data store failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("data store returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected row shape: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single row filter
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// column = value
    Eq(String, Value),
    /// Case-insensitive substring match on a text column
    ILike(String, String),
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq(column.to_string(), value.into())
    }

    pub fn ilike(column: &str, needle: &str) -> Self {
        Filter::ILike(column.to_string(), needle.to_string())
    }
}

/// Sort order for a select
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Select query: filters are ANDed together
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub columns: Option<String>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns(mut self, columns: &str) -> Self {
        self.columns = Some(columns.to_string());
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn eq(self, column: &str, value: impl Into<Value>) -> Self {
        self.filter(Filter::eq(column, value))
    }

    pub fn order_by(mut self, column: &str, descending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Row-level operations against the hosted store.
///
/// Writes return the affected rows as the store represents them after the
/// write; an empty vector means the store accepted the call but wrote nothing.
#[async_trait]
pub trait DataStore: Send + Sync {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError>;

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError>;

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        changes: Value,
    ) -> Result<Vec<Value>, StoreError>;

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError>;

    /// Exact row count for the filters, or `None` when the store can't report one
    async fn count(&self, table: &str, filters: &[Filter]) -> Result<Option<i64>, StoreError>;
}

/// Deserialize store rows into a model type
pub fn decode_rows<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(StoreError::from))
        .collect()
}

/// Deserialize the first row, if any
pub fn decode_first<T: serde::de::DeserializeOwned>(rows: Vec<Value>) -> Result<Option<T>, StoreError> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(serde_json::from_value(row)?)),
        None => Ok(None),
    }
}
