//! Backend-as-a-service connector module
//!
//! The BaaS owns identity (sign-up, sign-in, token introspection) and the
//! relational tables. Everything in `crate::db` goes through [`BaasConnector`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::connectors::errors::ConnectorError;

pub mod client;
pub mod init;
pub mod mock;
pub mod query;

pub use client::BaasClient;
pub use mock::InMemoryBaas;
pub use query::{Filter, OrderBy, Query};

/// Identity record of the auth service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of a password sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub user: AuthUser,
}

#[async_trait]
pub trait BaasConnector: Send + Sync {
    /// Create a confirmed identity with the service key
    async fn create_auth_user(&self, email: &str, password: &str)
        -> Result<AuthUser, ConnectorError>;

    async fn delete_auth_user(&self, id: &Uuid) -> Result<(), ConnectorError>;

    async fn update_auth_password(&self, id: &Uuid, password: &str)
        -> Result<(), ConnectorError>;

    /// Password grant. Wrong credentials surface as `ConnectorError::Unauthorized`
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ConnectorError>;

    /// Resolve the identity behind a user access token
    async fn get_auth_user(&self, access_token: &str) -> Result<AuthUser, ConnectorError>;

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, ConnectorError>;

    /// Insert one row and return it as stored
    async fn insert(&self, table: &str, row: Value) -> Result<Value, ConnectorError>;

    /// Patch every row matching `query`, returning the updated rows
    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, ConnectorError>;

    async fn count(&self, table: &str, query: &Query) -> Result<u64, ConnectorError>;

    /// Reachability check used by the health report
    async fn ping(&self) -> Result<(), ConnectorError>;
}
