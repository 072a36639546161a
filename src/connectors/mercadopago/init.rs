use std::sync::Arc;

use crate::connectors::config::ConnectorConfig;
use crate::connectors::mercadopago::{MercadoPagoClient, MockPaymentGateway, PaymentGatewayConnector};

/// Build the payment gateway connector from Settings
///
/// Without an access token the mock gateway is used; its checkout links lead
/// nowhere.
pub fn init(connector_config: &ConnectorConfig) -> Arc<dyn PaymentGatewayConnector> {
    let config = connector_config.mercadopago.clone();
    if config.access_token.is_none() {
        tracing::warn!("MP_ACCESS_TOKEN not set - using mock payment gateway");
        return Arc::new(MockPaymentGateway::new());
    }

    tracing::info!("Initializing Mercado Pago connector: {}", config.base_url);
    match MercadoPagoClient::new(config) {
        Ok(client) => Arc::new(client),
        Err(err) => {
            tracing::error!("Mercado Pago connector unavailable, using mock: {}", err);
            Arc::new(MockPaymentGateway::new())
        }
    }
}
