// In-memory data store used by unit tests
// Mimics the PostgREST behaviour the services rely on: store-assigned ids,
// timestamps, filtering, ordering and the tasks -> subtasks cascade

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use super::store::{DataStore, Filter, Query, StoreError, SUBTASKS_TABLE, TASKS_TABLE};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, Vec<Value>>>,
    next_id: Mutex<i64>,
    writes: AtomicUsize,
    count_unsupported: bool,
    failing_rows: Mutex<Vec<(String, i64)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `count` can't report a total, forcing callers onto their fallback
    pub fn without_count() -> Self {
        Self {
            count_unsupported: true,
            ..Self::default()
        }
    }

    /// Number of insert/update/delete calls issued so far
    pub fn writes(&self) -> usize {
        self.writes.load(AtomicOrdering::SeqCst)
    }

    /// Make every update touching `table` row `id` fail
    pub fn fail_updates_for(&self, table: &str, id: i64) {
        self.failing_rows.lock().unwrap().push((table.to_string(), id));
    }

    /// Raw row lookup, bypassing the services
    pub fn row(&self, table: &str, id: i64) -> Option<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .and_then(|rows| rows.iter().find(|r| r["id"] == json!(id)).cloned())
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

fn matches(row: &Value, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| match filter {
        Filter::Eq(column, value) => row.get(column).unwrap_or(&Value::Null) == value,
        Filter::ILike(column, needle) => row
            .get(column)
            .and_then(|v| v.as_str())
            .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false),
    })
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .unwrap_or_default()
            .partial_cmp(&y.as_f64().unwrap_or_default())
            .unwrap_or(Ordering::Equal),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn project(row: &Value, columns: &Option<String>) -> Value {
    match columns.as_deref() {
        None | Some("*") => row.clone(),
        Some(list) => {
            let mut out = serde_json::Map::new();
            for column in list.split(',').map(str::trim) {
                if let Some(v) = row.get(column) {
                    out.insert(column.to_string(), v.clone());
                }
            }
            Value::Object(out)
        }
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Value> = tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| matches(r, &query.filters)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let primary = compare_values(&a[&order.column], &b[&order.column])
                    .then_with(|| compare_values(&a["id"], &b["id"]));
                if order.descending {
                    primary.reverse()
                } else {
                    primary
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows.iter().map(|r| project(r, &query.columns)).collect())
    }

    async fn insert(&self, table: &str, mut row: Value) -> Result<Vec<Value>, StoreError> {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            *next
        };
        let now = Self::now();
        if let Some(fields) = row.as_object_mut() {
            fields.insert("id".to_string(), json!(id));
            fields.entry("created_at").or_insert_with(|| json!(now));
            fields.entry("updated_at").or_insert_with(|| json!(now));
        }
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(vec![row])
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        changes: Value,
    ) -> Result<Vec<Value>, StoreError> {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        let failing = self.failing_rows.lock().unwrap().clone();
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();

        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|r| matches(r, filters)) {
            if failing
                .iter()
                .any(|(t, id)| t == table && row["id"] == json!(id))
            {
                return Err(StoreError::Api {
                    status: 500,
                    message: format!("simulated failure on {} {}", table, row["id"]),
                });
            }
            if let (Some(fields), Some(changes)) = (row.as_object_mut(), changes.as_object()) {
                for (key, value) in changes {
                    fields.insert(key.clone(), value.clone());
                }
                fields.insert("updated_at".to_string(), json!(Self::now()));
            }
            updated.push(row.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        self.writes.fetch_add(1, AtomicOrdering::SeqCst);
        let mut tables = self.tables.lock().unwrap();
        let mut removed_ids = Vec::new();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|r| {
                let hit = matches(r, filters);
                if hit {
                    removed_ids.push(r["id"].clone());
                }
                !hit
            });
        }
        // ON DELETE CASCADE
        if table == TASKS_TABLE {
            if let Some(subtasks) = tables.get_mut(SUBTASKS_TABLE) {
                subtasks.retain(|s| !removed_ids.contains(&s["task_id"]));
            }
        }
        Ok(())
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<Option<i64>, StoreError> {
        if self.count_unsupported {
            return Ok(None);
        }
        let tables = self.tables.lock().unwrap();
        let count = tables
            .get(table)
            .map(|rows| rows.iter().filter(|r| matches(r, filters)).count())
            .unwrap_or(0);
        Ok(Some(count as i64))
    }
}
