use std::sync::Arc;

use crate::connectors::baas::{BaasClient, BaasConnector, InMemoryBaas};
use crate::connectors::config::ConnectorConfig;
use crate::connectors::errors::ConnectorError;

/// Build the BaaS connector from Settings
///
/// Without a service key the in-memory backend is used, which keeps nothing
/// across restarts.
pub fn init(connector_config: &ConnectorConfig) -> Result<Arc<dyn BaasConnector>, ConnectorError> {
    let config = connector_config.baas.clone();
    if config.service_key.is_none() {
        tracing::warn!("SUPABASE_SERVICE_ROLE_KEY not set - using in-memory BaaS");
        return Ok(Arc::new(InMemoryBaas::new()));
    }

    tracing::info!("Initializing BaaS connector: {}", config.base_url);
    Ok(Arc::new(BaasClient::new(config)?))
}
