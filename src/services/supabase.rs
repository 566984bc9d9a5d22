// Supabase service - hosted Postgres accessed through its PostgREST API
// Uses the REST endpoint directly for simplicity and compatibility

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;

use super::store::{DataStore, Filter, Query, StoreError};

/// PostgREST client for a Supabase project
pub struct SupabaseService {
    client: Client,
    url: String,
    api_key: String,
}

impl SupabaseService {
    /// Create a new Supabase service
    pub fn new(url: &str, api_key: &str) -> Self {
        Self {
            client: Client::new(),
            url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Project URL this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Build PostgREST table URL
    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url, table)
    }

    /// Build request with auth headers
    fn build_request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Turn a non-2xx response into an error carrying the body text
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        tracing::error!("Supabase error {}: {}", status, message);
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Render a filter as a PostgREST query parameter
fn filter_param(filter: &Filter) -> (String, String) {
    match filter {
        Filter::Eq(column, Value::Null) => (column.clone(), "is.null".to_string()),
        Filter::Eq(column, value) => (column.clone(), format!("eq.{}", scalar(value))),
        Filter::ILike(column, needle) => (column.clone(), format!("ilike.*{}*", needle)),
    }
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(filter_param).collect()
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the total from a `Content-Range` header such as `0-24/137` or `*/0`
fn parse_content_range(headers: &HeaderMap) -> Option<i64> {
    headers
        .get("content-range")
        .and_then(|v| v.to_str().ok())
        .and_then(|range| range.rsplit('/').next())
        .and_then(|total| total.parse::<i64>().ok())
}

fn return_representation() -> HeaderValue {
    HeaderValue::from_static("return=representation")
}

#[async_trait]
impl DataStore for SupabaseService {
    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, StoreError> {
        let mut params = vec![(
            "select".to_string(),
            query.columns.clone().unwrap_or_else(|| "*".to_string()),
        )];
        params.extend(filter_params(&query.filters));
        if let Some(order) = &query.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = query.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        tracing::debug!("Supabase select {} {:?}", table, params);

        let response = self
            .build_request(Method::GET, table)
            .query(&params)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(rows)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Vec<Value>, StoreError> {
        tracing::debug!("Supabase insert into {}: {}", table, row);

        let response = self
            .build_request(Method::POST, table)
            .header("Prefer", return_representation())
            .json(&row)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(rows)
    }

    async fn update(
        &self,
        table: &str,
        filters: &[Filter],
        changes: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let params = filter_params(filters);
        tracing::debug!("Supabase update {} {:?}: {}", table, params, changes);

        let response = self
            .build_request(Method::PATCH, table)
            .header("Prefer", return_representation())
            .query(&params)
            .json(&changes)
            .send()
            .await?;
        let rows: Vec<Value> = Self::check(response).await?.json().await?;
        Ok(rows)
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> Result<(), StoreError> {
        let params = filter_params(filters);
        tracing::debug!("Supabase delete from {} {:?}", table, params);

        let response = self
            .build_request(Method::DELETE, table)
            .query(&params)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn count(&self, table: &str, filters: &[Filter]) -> Result<Option<i64>, StoreError> {
        let mut params = vec![("select".to_string(), "id".to_string())];
        params.extend(filter_params(filters));

        let response = self
            .build_request(Method::HEAD, table)
            .header("Prefer", "count=exact")
            .query(&params)
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(parse_content_range(response.headers()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_params_render_postgrest_operators() {
        assert_eq!(
            filter_param(&Filter::eq("completed", true)),
            ("completed".to_string(), "eq.true".to_string())
        );
        assert_eq!(
            filter_param(&Filter::eq("mode", "pomodoro")),
            ("mode".to_string(), "eq.pomodoro".to_string())
        );
        assert_eq!(
            filter_param(&Filter::eq("task_id", json!(42))),
            ("task_id".to_string(), "eq.42".to_string())
        );
        assert_eq!(
            filter_param(&Filter::Eq("user_id".to_string(), Value::Null)),
            ("user_id".to_string(), "is.null".to_string())
        );
        assert_eq!(
            filter_param(&Filter::ilike("title", "write")),
            ("title".to_string(), "ilike.*write*".to_string())
        );
    }

    #[test]
    fn test_parse_content_range() {
        let mut headers = HeaderMap::new();
        headers.insert("content-range", HeaderValue::from_static("0-24/137"));
        assert_eq!(parse_content_range(&headers), Some(137));

        headers.insert("content-range", HeaderValue::from_static("*/0"));
        assert_eq!(parse_content_range(&headers), Some(0));

        headers.insert("content-range", HeaderValue::from_static("0-24/*"));
        assert_eq!(parse_content_range(&headers), None);

        assert_eq!(parse_content_range(&HeaderMap::new()), None);
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let service = SupabaseService::new("https://example.supabase.co/", "key");
        assert_eq!(service.url(), "https://example.supabase.co");
        assert_eq!(
            service.table_url("tasks"),
            "https://example.supabase.co/rest/v1/tasks"
        );
    }
}
