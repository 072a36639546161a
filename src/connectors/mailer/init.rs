use std::sync::Arc;

use async_trait::async_trait;

use crate::connectors::config::ConnectorConfig;
use crate::connectors::errors::ConnectorError;
use crate::connectors::mailer::{EmailRelay, HttpEmailRelay, OutgoingEmail};

/// Stands in for the relay when delivery is off
struct LogOnlyRelay;

#[async_trait]
impl EmailRelay for LogOnlyRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ConnectorError> {
        tracing::info!(to = %email.to, subject = %email.subject, "email not delivered (relay disabled)");
        Ok(())
    }
}

/// Build the email relay from Settings
pub fn init(connector_config: &ConnectorConfig) -> Arc<dyn EmailRelay> {
    let config = connector_config.email.clone();
    if !config.enabled {
        tracing::warn!("Email relay disabled - emails are only logged");
        return Arc::new(LogOnlyRelay);
    }

    tracing::info!("Initializing email relay: {}", config.base_url);
    match HttpEmailRelay::new(config) {
        Ok(relay) => Arc::new(relay),
        Err(err) => {
            tracing::error!("Email relay unavailable, emails are only logged: {}", err);
            Arc::new(LogOnlyRelay)
        }
    }
}
