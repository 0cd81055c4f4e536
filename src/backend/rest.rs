use async_trait::async_trait;
use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{Backend, Direction, Filter, Query};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

/// Client for the hosted service: row API, object storage and identity
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    /// Create a client for `base_url` authenticated with the public API key
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> AppResult<Self> {
        Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid backend URL: {}", e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            access_token: None,
        })
    }

    /// Build from configuration; `NotConfigured` when URL or key is missing
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let (url, key) = config
            .backend_credentials()
            .map_err(|_| AppError::NotConfigured)?;
        Self::new(url, key, Duration::from_secs(config.backend_timeout_secs))
    }

    fn url(&self, path: &str) -> AppResult<Url> {
        Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| AppError::Internal(format!("Invalid backend URL: {}", e)))
    }

    fn table_url(&self, table: &str) -> AppResult<Url> {
        self.url(&format!("/rest/v1/{}", table))
    }

    fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.bearer()))
    }

    /// Send and turn non-success statuses into backend errors
    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::warn!(status = status.as_u16(), "Backend request failed: {}", message);
        Err(AppError::Backend(message))
    }

    async fn send_rows(&self, request: RequestBuilder) -> AppResult<Vec<Value>> {
        let response = self.send(request).await?;
        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str(&body)? {
            Value::Array(rows) => Ok(rows),
            other => Ok(vec![other]),
        }
    }
}

/// `col=eq.value` as understood by the row API
fn filter_param(filter: &Filter) -> (String, String) {
    let value = match &filter.value {
        Value::Null => return (filter.column.clone(), "is.null".to_string()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    (filter.column.clone(), format!("eq.{}", value))
}

fn apply_query(url: &mut Url, query: &Query) {
    let mut pairs = url.query_pairs_mut();
    pairs.append_pair("select", query.columns.as_deref().unwrap_or("*"));
    for filter in &query.filters {
        let (column, value) = filter_param(filter);
        pairs.append_pair(&column, &value);
    }
    if !query.order.is_empty() {
        let order = query
            .order
            .iter()
            .map(|o| match o.direction {
                Direction::Ascending => format!("{}.asc", o.column),
                Direction::Descending => format!("{}.desc", o.column),
            })
            .collect::<Vec<_>>()
            .join(",");
        pairs.append_pair("order", &order);
    }
    if let Some(limit) = query.limit {
        pairs.append_pair("limit", &limit.to_string());
    }
}

/// First non-empty human-readable field of an error body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "msg", "error_description", "error"] {
            if let Some(Value::String(text)) = map.get(key) {
                if !text.trim().is_empty() {
                    return text.clone();
                }
            }
        }
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, table: &str, query: &Query) -> AppResult<Vec<Value>> {
        let mut url = self.table_url(table)?;
        apply_query(&mut url, query);
        self.send_rows(self.request(Method::GET, url)).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        let url = self.table_url(table)?;
        let request = self
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&rows);
        self.send_rows(request).await
    }

    async fn update(&self, table: &str, patch: Value, filter: &Filter) -> AppResult<Vec<Value>> {
        let mut url = self.table_url(table)?;
        let (column, value) = filter_param(filter);
        url.query_pairs_mut().append_pair(&column, &value);
        let request = self
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(&patch);
        self.send_rows(request).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        let mut url = self.table_url(table)?;
        let (column, value) = filter_param(filter);
        url.query_pairs_mut().append_pair(&column, &value);
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<String> {
        let url = self.url(&format!("/storage/v1/object/{}/{}", bucket, path))?;
        let request = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        let response = self.send(request).await?;

        let body: Value = response.json().await.unwrap_or(Value::Null);
        Ok(body
            .get("Key")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}/{}", bucket, path)))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, path
        )
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let mut url = self.url("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");

        let response = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNAUTHORIZED {
            return Err(AppError::InvalidCredentials);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Backend(error_message(status, &body)));
        }

        Ok(response.json::<Session>().await?)
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let url = self.url("/auth/v1/logout")?;
        let request = self
            .client
            .post(url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token));
        self.send(request).await?;
        Ok(())
    }

    async fn user(&self, access_token: &str) -> AppResult<User> {
        let url = self.url("/auth/v1/user")?;
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<User>().await?),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(AppError::InvalidToken),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Backend(error_message(status, &body)))
            }
        }
    }

    fn with_access_token(&self, access_token: &str) -> Arc<dyn Backend> {
        Arc::new(Self {
            access_token: Some(access_token.to_string()),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> RestBackend {
        RestBackend::new("https://demo.supabase.co/", "anon-key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_query_string_follows_row_api_dialect() {
        let mut url = backend().table_url("experience").unwrap();
        let query = Query::new()
            .eq("type", "work")
            .order_by("year", Direction::Descending)
            .order_by("id", Direction::Ascending)
            .limit(10);
        apply_query(&mut url, &query);

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("select".to_string(), "*".to_string()),
                ("type".to_string(), "eq.work".to_string()),
                ("order".to_string(), "year.desc,id.asc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
        assert_eq!(url.path(), "/rest/v1/experience");
    }

    #[test]
    fn test_numeric_and_null_filters() {
        assert_eq!(
            filter_param(&Filter::eq("id", 42)),
            ("id".to_string(), "eq.42".to_string())
        );
        assert_eq!(
            filter_param(&Filter::eq("image", Value::Null)),
            ("image".to_string(), "is.null".to_string())
        );
    }

    #[test]
    fn test_error_message_prefers_readable_fields() {
        let body = r#"{"code":"23505","message":"duplicate key value","details":null}"#;
        assert_eq!(
            error_message(StatusCode::CONFLICT, body),
            "duplicate key value"
        );
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn test_public_url_and_token_scoping() {
        let backend = backend();
        assert_eq!(
            backend.public_url("personal-assets", "image_1.png"),
            "https://demo.supabase.co/storage/v1/object/public/personal-assets/image_1.png"
        );
        assert_eq!(backend.bearer(), "anon-key");
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(RestBackend::new("not a url", "key", Duration::from_secs(1)).is_err());
    }
}
