use async_trait::async_trait;
use serde_json::json;
use tracing::Instrument;

use super::{EmailRelay, OutgoingEmail};
use crate::connectors::config::EmailRelayConfig;
use crate::connectors::errors::ConnectorError;

/// Relay speaking the common `{from, to, subject, html}` JSON send API
pub struct HttpEmailRelay {
    pub(crate) endpoint: String,
    pub(crate) http_client: reqwest::Client,
    pub(crate) api_key: Option<String>,
    pub(crate) from: String,
}

impl HttpEmailRelay {
    pub fn new(config: EmailRelayConfig) -> Result<Self, ConnectorError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConnectorError::Internal(format!("HTTP client: {}", err)))?;

        Ok(Self {
            endpoint: config.base_url,
            http_client,
            api_key: config.api_key,
            from: format!("{} <{}>", config.from_name, config.from_address),
        })
    }
}

#[async_trait]
impl EmailRelay for HttpEmailRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ConnectorError> {
        let span = tracing::info_span!("email_send", to = %email.to, subject = %email.subject);

        let mut req = self.http_client.post(&self.endpoint).json(&json!({
            "from": self.from,
            "to": [email.to],
            "subject": email.subject,
            "html": email.html,
        }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().instrument(span).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        Err(ConnectorError::from_status(status, body))
    }
}
