use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::{tables, Backend, Direction, Filter, Query};
use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

/// Backend call kinds that can be made to fail on purpose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Upload,
}

/// In-memory backend for unit and integration testing
#[derive(Clone)]
pub struct InMemoryBackend {
    inner: Arc<Mutex<InMemoryBackendInner>>,
    access_token: Option<String>,
}

#[derive(Default)]
struct Table {
    next_id: i64,
    rows: Vec<Map<String, Value>>,
}

struct FailureRule {
    operation: Operation,
    table: String,
    successes_left: usize,
    message: String,
}

struct Account {
    password: String,
    user: User,
}

struct InMemoryBackendInner {
    tables: HashMap<String, Table>,
    unique: HashSet<(String, String)>,
    objects: HashMap<(String, String), Vec<u8>>,
    accounts: HashMap<String, Account>,
    sessions: HashMap<String, User>,
    failures: Vec<FailureRule>,
    require_session_for_writes: bool,
    last_timestamp: OffsetDateTime,
}

impl InMemoryBackend {
    pub const PUBLIC_BASE: &'static str = "http://localhost:54321/storage/v1/object/public";

    pub fn new() -> Self {
        let mut unique = HashSet::new();
        unique.insert((tables::SITE_CONTENT.to_string(), "section_key".to_string()));

        Self {
            inner: Arc::new(Mutex::new(InMemoryBackendInner {
                tables: HashMap::new(),
                unique,
                objects: HashMap::new(),
                accounts: HashMap::new(),
                sessions: HashMap::new(),
                failures: Vec::new(),
                require_session_for_writes: false,
                last_timestamp: OffsetDateTime::UNIX_EPOCH,
            })),
            access_token: None,
        }
    }

    /// Reject row and storage writes made without a valid session token,
    /// like a row-level security policy restricted to authenticated users
    pub async fn require_session_for_writes(&self) {
        self.inner.lock().await.require_session_for_writes = true;
    }

    /// Register an operator account
    pub async fn register_user(&self, email: &str, password: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            role: Some("authenticated".to_string()),
            last_sign_in_at: None,
        };
        let mut inner = self.inner.lock().await;
        inner.accounts.insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        user
    }

    /// Let `after_successes` matching calls through, then fail the next one once
    pub async fn fail_on(
        &self,
        operation: Operation,
        table: &str,
        after_successes: usize,
        message: &str,
    ) {
        let mut inner = self.inner.lock().await;
        inner.failures.push(FailureRule {
            operation,
            table: table.to_string(),
            successes_left: after_successes,
            message: message.to_string(),
        });
    }

    /// Raw rows of a table in insertion order
    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let inner = self.inner.lock().await;
        inner
            .tables
            .get(table)
            .map(|t| t.rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Seed rows directly, bypassing failure rules and session checks
    pub async fn seed(&self, table: &str, rows: Vec<Value>) -> Vec<Value> {
        let mut inner = self.inner.lock().await;
        rows.into_iter()
            .filter_map(|row| match row {
                Value::Object(map) => Some(inner.store_row(table, map)),
                _ => None,
            })
            .collect()
    }

    /// Stored object bytes, if any
    pub async fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        let inner = self.inner.lock().await;
        inner
            .objects
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    fn guard_write(&self, inner: &InMemoryBackendInner) -> AppResult<()> {
        if !inner.require_session_for_writes {
            return Ok(());
        }
        match &self.access_token {
            Some(token) if inner.sessions.contains_key(token) => Ok(()),
            _ => Err(AppError::Backend(
                "new row violates row-level security policy".to_string(),
            )),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackendInner {
    /// Consume a matching failure rule if it is due
    fn take_failure(&mut self, operation: Operation, table: &str) -> AppResult<()> {
        let Some(index) = self
            .failures
            .iter()
            .position(|rule| rule.operation == operation && rule.table == table)
        else {
            return Ok(());
        };

        if self.failures[index].successes_left > 0 {
            self.failures[index].successes_left -= 1;
            return Ok(());
        }

        let rule = self.failures.remove(index);
        Err(AppError::Backend(rule.message))
    }

    /// Strictly increasing, fixed-width timestamps so string order matches time order
    fn next_timestamp(&mut self) -> String {
        let now = OffsetDateTime::now_utc();
        let now = now.replace_nanosecond(now.microsecond() * 1_000).unwrap_or(now);
        let next = if now > self.last_timestamp {
            now
        } else {
            self.last_timestamp + Duration::microseconds(1)
        };
        self.last_timestamp = next;

        let format = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z"
        );
        next.format(&format).unwrap_or_default()
    }

    fn check_unique(&self, table: &str, row: &Map<String, Value>) -> AppResult<()> {
        let Some(existing) = self.tables.get(table) else {
            return Ok(());
        };
        for (unique_table, column) in &self.unique {
            if unique_table != table {
                continue;
            }
            let Some(value) = row.get(column) else {
                continue;
            };
            if existing.rows.iter().any(|r| r.get(column) == Some(value)) {
                return Err(AppError::Backend(format!(
                    "duplicate key value violates unique constraint \"{}_{}_key\"",
                    table, column
                )));
            }
        }
        Ok(())
    }

    fn store_row(&mut self, table: &str, mut row: Map<String, Value>) -> Value {
        let created_at = self.next_timestamp();
        let table = self.tables.entry(table.to_string()).or_default();
        match row.get("id") {
            Some(id) => {
                if let Some(id) = id.as_i64() {
                    table.next_id = table.next_id.max(id);
                }
            }
            None => {
                table.next_id += 1;
                row.insert("id".to_string(), Value::from(table.next_id));
            }
        }
        row.entry("created_at")
            .or_insert_with(|| Value::String(created_at));
        table.rows.push(row.clone());
        Value::Object(row)
    }
}

fn matches(row: &Map<String, Value>, filter: &Filter) -> bool {
    row.get(&filter.column).unwrap_or(&Value::Null) == &filter.value
}

/// Null first, numbers numerically, strings lexicographically
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => a.to_string().cmp(&b.to_string()),
    }
}

fn project(row: &Map<String, Value>, columns: Option<&str>) -> Value {
    match columns.map(str::trim) {
        None | Some("*") => Value::Object(row.clone()),
        Some(list) => {
            let wanted: Vec<&str> = list.split(',').map(str::trim).collect();
            Value::Object(
                row.iter()
                    .filter(|(key, _)| wanted.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            )
        }
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn select(&self, table: &str, query: &Query) -> AppResult<Vec<Value>> {
        let mut inner = self.inner.lock().await;
        inner.take_failure(Operation::Select, table)?;

        let Some(stored) = inner.tables.get(table) else {
            return Ok(Vec::new());
        };

        let mut rows: Vec<&Map<String, Value>> = stored
            .rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .collect();

        rows.sort_by(|a, b| {
            for order in &query.order {
                let left = a.get(&order.column).unwrap_or(&Value::Null);
                let right = b.get(&order.column).unwrap_or(&Value::Null);
                let ordering = match order.direction {
                    Direction::Ascending => compare_values(left, right),
                    Direction::Descending => compare_values(right, left),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });

        Ok(rows
            .into_iter()
            .take(query.limit.unwrap_or(usize::MAX))
            .map(|row| project(row, query.columns.as_deref()))
            .collect())
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> AppResult<Vec<Value>> {
        let mut inner = self.inner.lock().await;
        self.guard_write(&inner)?;
        inner.take_failure(Operation::Insert, table)?;

        let mut objects = Vec::with_capacity(rows.len());
        for row in rows {
            match row {
                Value::Object(map) => {
                    inner.check_unique(table, &map)?;
                    objects.push(map);
                }
                other => {
                    return Err(AppError::Backend(format!(
                        "cannot insert non-object row: {}",
                        other
                    )))
                }
            }
        }

        Ok(objects
            .into_iter()
            .map(|map| inner.store_row(table, map))
            .collect())
    }

    async fn update(&self, table: &str, patch: Value, filter: &Filter) -> AppResult<Vec<Value>> {
        let mut inner = self.inner.lock().await;
        self.guard_write(&inner)?;
        inner.take_failure(Operation::Update, table)?;

        let Value::Object(patch) = patch else {
            return Err(AppError::Backend("update patch must be an object".to_string()));
        };

        let Some(stored) = inner.tables.get_mut(table) else {
            return Ok(Vec::new());
        };

        let mut updated = Vec::new();
        for row in stored.rows.iter_mut().filter(|row| matches(row, filter)) {
            for (key, value) in &patch {
                row.insert(key.clone(), value.clone());
            }
            updated.push(Value::Object(row.clone()));
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        self.guard_write(&inner)?;
        inner.take_failure(Operation::Delete, table)?;

        if let Some(stored) = inner.tables.get_mut(table) {
            stored.rows.retain(|row| !matches(row, filter));
        }
        Ok(())
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> AppResult<String> {
        let mut inner = self.inner.lock().await;
        self.guard_write(&inner)?;
        inner.take_failure(Operation::Upload, bucket)?;

        let key = (bucket.to_string(), path.to_string());
        if inner.objects.contains_key(&key) {
            return Err(AppError::Backend("The resource already exists".to_string()));
        }
        inner.objects.insert(key, bytes);
        Ok(format!("{}/{}", bucket, path))
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", Self::PUBLIC_BASE, bucket, path)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<Session> {
        let mut inner = self.inner.lock().await;
        let mut user = match inner.accounts.get(email) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AppError::InvalidCredentials),
        };
        user.last_sign_in_at = Some(OffsetDateTime::now_utc());

        let access_token = Uuid::new_v4().to_string();
        inner.sessions.insert(access_token.clone(), user.clone());

        Ok(Session {
            access_token,
            refresh_token: Uuid::new_v4().to_string(),
            token_type: "bearer".to_string(),
            expires_in: 3600,
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .sessions
            .remove(access_token)
            .map(|_| ())
            .ok_or(AppError::InvalidToken)
    }

    async fn user(&self, access_token: &str) -> AppResult<User> {
        let inner = self.inner.lock().await;
        inner
            .sessions
            .get(access_token)
            .cloned()
            .ok_or(AppError::InvalidToken)
    }

    fn with_access_token(&self, access_token: &str) -> Arc<dyn Backend> {
        Arc::new(Self {
            inner: Arc::clone(&self.inner),
            access_token: Some(access_token.to_string()),
        })
    }
}
