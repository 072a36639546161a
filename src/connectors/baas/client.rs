use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_RANGE};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::Instrument;
use uuid::Uuid;

use super::{AuthSession, AuthUser, BaasConnector, Query};
use crate::connectors::config::BaasConfig;
use crate::connectors::errors::ConnectorError;

/// HTTP client for a Supabase-compatible backend (GoTrue auth + PostgREST)
pub struct BaasClient {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
    pub(crate) service_key: String,
}

impl BaasClient {
    pub fn new(config: BaasConfig) -> Result<Self, ConnectorError> {
        let service_key = config.service_key.ok_or_else(|| {
            ConnectorError::Internal("SUPABASE_SERVICE_ROLE_KEY is not configured".to_string())
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConnectorError::Internal(format!("HTTP client: {}", err)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            service_key,
        })
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Request signed with the service key
    fn service_request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ConnectorError> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "BaaS request failed");
        Err(ConnectorError::from_status(status, body))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ConnectorError> {
        let text = self.send(req).await?.text().await?;
        serde_json::from_str::<T>(&text).map_err(|_| ConnectorError::InvalidResponse(text))
    }
}

/// `Content-Range: 0-24/3573` or `*/0`
fn parse_total(header: Option<&HeaderValue>) -> Result<u64, ConnectorError> {
    header
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.rsplit('/').next())
        .and_then(|total| total.parse::<u64>().ok())
        .ok_or_else(|| ConnectorError::InvalidResponse("missing Content-Range total".to_string()))
}

#[async_trait]
impl BaasConnector for BaasClient {
    async fn create_auth_user(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, ConnectorError> {
        let span = tracing::info_span!("baas_create_auth_user", email = %email);
        let req = self
            .service_request(reqwest::Method::POST, &self.auth_url("admin/users"))
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
            }));

        self.send_json::<AuthUser>(req).instrument(span).await
    }

    async fn delete_auth_user(&self, id: &Uuid) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("baas_delete_auth_user", user_id = %id);
        let url = self.auth_url(&format!("admin/users/{}", id));
        let req = self.service_request(reqwest::Method::DELETE, &url);

        self.send(req).instrument(span).await.map(|_| ())
    }

    async fn update_auth_password(&self, id: &Uuid, password: &str) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("baas_update_auth_password", user_id = %id);
        let url = self.auth_url(&format!("admin/users/{}", id));
        let req = self
            .service_request(reqwest::Method::PUT, &url)
            .json(&json!({ "password": password }));

        self.send(req).instrument(span).await.map(|_| ())
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, ConnectorError> {
        let span = tracing::info_span!("baas_sign_in", email = %email);
        let req = self
            .http_client
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.service_key)
            .json(&json!({ "email": email, "password": password }));

        // GoTrue answers 400 invalid_grant for wrong credentials
        match self.send_json::<AuthSession>(req).instrument(span).await {
            Err(ConnectorError::Rejected(body)) => Err(ConnectorError::Unauthorized(body)),
            other => other,
        }
    }

    async fn get_auth_user(&self, access_token: &str) -> Result<AuthUser, ConnectorError> {
        let span = tracing::info_span!("baas_get_auth_user");
        let req = self
            .http_client
            .get(self.auth_url("user"))
            .header("apikey", &self.service_key)
            .bearer_auth(access_token);

        self.send_json::<AuthUser>(req).instrument(span).await
    }

    async fn select(&self, table: &str, query: &Query) -> Result<Vec<Value>, ConnectorError> {
        let span = tracing::info_span!("baas_select", table = %table);
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query.to_params());

        let req = self
            .service_request(reqwest::Method::GET, &self.rest_url(table))
            .query(&params);

        self.send_json::<Vec<Value>>(req).instrument(span).await
    }

    async fn insert(&self, table: &str, row: Value) -> Result<Value, ConnectorError> {
        let span = tracing::info_span!("baas_insert", table = %table);
        let req = self
            .service_request(reqwest::Method::POST, &self.rest_url(table))
            .header("Prefer", "return=representation")
            .json(&row);

        let mut rows = self.send_json::<Vec<Value>>(req).instrument(span).await?;
        if rows.is_empty() {
            return Err(ConnectorError::InvalidResponse(format!(
                "insert into {} returned no row",
                table
            )));
        }
        Ok(rows.swap_remove(0))
    }

    async fn update(
        &self,
        table: &str,
        query: &Query,
        patch: Value,
    ) -> Result<Vec<Value>, ConnectorError> {
        let span = tracing::info_span!("baas_update", table = %table);
        let req = self
            .service_request(reqwest::Method::PATCH, &self.rest_url(table))
            .header("Prefer", "return=representation")
            .query(&query.to_params())
            .json(&patch);

        self.send_json::<Vec<Value>>(req).instrument(span).await
    }

    async fn count(&self, table: &str, query: &Query) -> Result<u64, ConnectorError> {
        let span = tracing::info_span!("baas_count", table = %table);
        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(query.to_params());

        let req = self
            .service_request(reqwest::Method::HEAD, &self.rest_url(table))
            .header("Prefer", "count=exact")
            .query(&params);

        let resp = self.send(req).instrument(span).await?;
        parse_total(resp.headers().get(CONTENT_RANGE))
    }

    async fn ping(&self) -> Result<(), ConnectorError> {
        let req = self
            .http_client
            .get(self.auth_url("health"))
            .header("apikey", &self.service_key);

        self.send(req).await.map(|_| ())
    }
}
