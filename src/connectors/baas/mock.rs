//! In-memory BaaS used by tests and local runs without a backend.
//!
//! Rows are plain JSON objects kept per table; [`Query`] filters are evaluated
//! the way the row API evaluates them (timestamps and numbers compare by
//! value, text compares lexically).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{AuthSession, AuthUser, BaasConnector, Filter, Query};
use crate::connectors::errors::ConnectorError;

struct Identity {
    id: Uuid,
    email: String,
    password: String,
}

#[derive(Default)]
pub struct InMemoryBaas {
    tables: Mutex<HashMap<String, Vec<Map<String, Value>>>>,
    identities: Mutex<Vec<Identity>>,
    tokens: Mutex<HashMap<String, Uuid>>,
    failing_tables: Mutex<Vec<String>>,
}

impl InMemoryBaas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an identity and return a valid access token for it
    pub fn add_identity(&self, email: &str, password: &str) -> (Uuid, String) {
        let id = Uuid::new_v4();
        self.identities.lock().unwrap().push(Identity {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        (id, self.issue_token(id))
    }

    pub fn issue_token(&self, id: Uuid) -> String {
        let token = format!("token-{}", Uuid::new_v4());
        self.tokens.lock().unwrap().insert(token.clone(), id);
        token
    }

    /// Insert a row without going through the connector interface
    pub fn seed(&self, table: &str, row: Value) -> Value {
        let stored = Self::complete_row(row);
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Value::Object(stored)
    }

    /// Snapshot of a table
    pub fn rows(&self, table: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    /// Make every write to `table` fail
    pub fn fail_writes_to(&self, table: &str) {
        self.failing_tables.lock().unwrap().push(table.to_string());
    }

    fn check_writable(&self, table: &str) -> Result<(), ConnectorError> {
        if self.failing_tables.lock().unwrap().iter().any(|t| t == table) {
            return Err(ConnectorError::Rejected(format!("writes to {} disabled", table)));
        }
        Ok(())
    }

    fn complete_row(row: Value) -> Map<String, Value> {
        let mut row = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        row.entry("id")
            .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
        row.entry("created_at")
            .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        row
    }

    fn select_rows(&self, table: &str, query: &Query) -> Vec<Map<String, Value>> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Map<String, Value>> = tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = match (a.get(&order.column), b.get(&order.column)) {
                    (Some(x), Some(y)) if !x.is_null() && !y.is_null() => compare(x, y),
                    (Some(x), _) if !x.is_null() => return Ordering::Less,
                    (_, Some(y)) if !y.is_null() => return Ordering::Greater,
                    _ => Ordering::Equal,
                };
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        rows
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

fn compare_text(a: &str, b: &str) -> Ordering {
    if let (Some(x), Some(y)) = (timestamp(a), timestamp(b)) {
        return x.cmp(&y);
    }
    if let (Ok(x), Ok(y)) = (a.parse::<f64>(), b.parse::<f64>()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    a.cmp(b)
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (text(a), text(b)) {
        (Some(x), Some(y)) => compare_text(&x, &y),
        _ => Ordering::Equal,
    }
}

fn matches(row: &Map<String, Value>, filters: &[Filter]) -> bool {
    let column = |name: &str| row.get(name).and_then(text);

    filters.iter().all(|filter| match filter {
        Filter::Eq(col, expected) => column(col).map_or(false, |v| &v == expected),
        Filter::In(col, values) => column(col).map_or(false, |v| values.contains(&v)),
        Filter::Gte(col, bound) => {
            column(col).map_or(false, |v| compare_text(&v, bound) != Ordering::Less)
        }
        Filter::Lte(col, bound) => {
            column(col).map_or(false, |v| compare_text(&v, bound) != Ordering::Greater)
        }
        Filter::Search(cols, term) => {
            let term = term.to_lowercase();
            cols.iter()
                .any(|c| column(c).map_or(false, |v| v.to_lowercase().contains(&term)))
        }
    })
}

#[async_trait]
impl BaasConnector for InMemoryBaas {
    async fn create_auth_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ConnectorError> {
        let mut identities = self.identities.lock().unwrap();
        if identities.iter().any(|i| i.email == email) {
            return Err(ConnectorError::Rejected(
                "A user with this email address has already been registered".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        identities.push(Identity {
            id,
            email: email.to_string(),
            password: password.to_string(),
        });
        Ok(AuthUser {
            id,
            email: Some(email.to_string()),
        })
    }

    async fn delete_auth_user(&self, id: &Uuid) -> Result<(), ConnectorError> {
        self.identities.lock().unwrap().retain(|i| &i.id != id);
        self.tokens.lock().unwrap().retain(|_, owner| owner != id);
        Ok(())
    }

    async fn update_auth_password(&self, id: &Uuid, password: &str) -> Result<(), ConnectorError> {
        let mut identities = self.identities.lock().unwrap();
        let identity = identities
            .iter_mut()
            .find(|i| &i.id == id)
            .ok_or_else(|| ConnectorError::NotFound(format!("user {}", id)))?;
        identity.password = password.to_string();
        Ok(())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ConnectorError> {
        let id = self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.email == email && i.password == password)
            .map(|i| i.id)
            .ok_or_else(|| ConnectorError::Unauthorized("Invalid login credentials".to_string()))?;

        Ok(AuthSession {
            access_token: self.issue_token(id),
            user: AuthUser {
                id,
                email: Some(email.to_string()),
            },
        })
    }

    async fn get_auth_user(&self, access_token: &str) -> Result<AuthUser, ConnectorError> {
        let id = self
            .tokens
            .lock()
            .unwrap()
            .get(access_token)
            .copied()
            .ok_or_else(|| ConnectorError::Unauthorized("invalid JWT".to_string()))?;

        let email = self
            .identities
            .lock()
            .unwrap()
            .iter()
            .find(|i| i.id == id)
            .map(|i| i.email.clone());

        Ok(AuthUser { id, email })
    }

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, ConnectorError> {
        Ok(self
            .select_rows(table, query)
            .into_iter()
            .map(Value::Object)
            .collect())
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, ConnectorError> {
        self.check_writable(table)?;
        Ok(self.seed(table, row))
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, ConnectorError> {
        self.check_writable(table)?;
        let patch = match patch {
            Value::Object(map) => map,
            _ => return Err(ConnectorError::Rejected("patch must be an object".to_string())),
        };

        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let mut updated = Vec::new();
        for row in rows.iter_mut().filter(|row| matches(row, &query.filters)) {
            for (key, value) in &patch {
                row.insert(key.clone(), value.clone());
            }
            updated.push(Value::Object(row.clone()));
        }
        Ok(updated)
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, ConnectorError> {
        let unbounded = Query {
            limit: None,
            ..query.clone()
        };
        Ok(self.select_rows(table, &unbounded).len() as u64)
    }

    async fn ping(&self) -> Result<(), ConnectorError> {
        Ok(())
    }
}
