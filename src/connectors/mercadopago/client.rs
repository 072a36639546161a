use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use super::types::PixPaymentResponse;
use super::{PaymentGatewayConnector, PaymentInfo, PixCharge, PixPaymentRequest, Preference, PreferenceRequest};
use crate::connectors::config::MercadoPagoConfig;
use crate::connectors::errors::ConnectorError;

/// HTTP client for the Mercado Pago REST API
pub struct MercadoPagoClient {
    pub(crate) base_url: String,
    pub(crate) http_client: reqwest::Client,
    pub(crate) access_token: String,
}

impl MercadoPagoClient {
    pub fn new(config: MercadoPagoConfig) -> Result<Self, ConnectorError> {
        let access_token = config.access_token.ok_or_else(|| {
            ConnectorError::Internal("MP_ACCESS_TOKEN is not configured".to_string())
        })?;

        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| ConnectorError::Internal(format!("HTTP client: {}", err)))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http_client,
            access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ConnectorError> {
        let resp = req.bearer_auth(&self.access_token).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(status = %status, body = %text, "Mercado Pago request failed");
            return Err(ConnectorError::from_status(status, text));
        }

        serde_json::from_str::<T>(&text).map_err(|_| ConnectorError::InvalidResponse(text))
    }
}

#[async_trait]
impl PaymentGatewayConnector for MercadoPagoClient {
    async fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Result<Preference, ConnectorError> {
        let span = tracing::info_span!(
            "mp_create_preference",
            external_reference = %request.external_reference
        );
        let req = self
            .http_client
            .post(self.url("checkout/preferences"))
            .json(request);

        self.send_json::<Preference>(req).instrument(span).await
    }

    async fn create_pix_payment(
        &self,
        request: &PixPaymentRequest,
        idempotency_key: &str,
    ) -> Result<PixCharge, ConnectorError> {
        let span = tracing::info_span!(
            "mp_create_pix_payment",
            external_reference = %request.external_reference
        );
        let req = self
            .http_client
            .post(self.url("v1/payments"))
            .header("X-Idempotency-Key", idempotency_key)
            .json(request);

        self.send_json::<PixPaymentResponse>(req)
            .instrument(span)
            .await
            .map(PixCharge::from)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentInfo, ConnectorError> {
        let span = tracing::info_span!("mp_get_payment", payment_id = %payment_id);
        let url = self.url(&format!("v1/payments/{}", urlencoding::encode(payment_id)));
        let req = self.http_client.get(url);

        self.send_json::<PaymentInfo>(req).instrument(span).await
    }

    async fn ping(&self) -> Result<(), ConnectorError> {
        let req = self.http_client.get(self.url("v1/payment_methods"));
        self.send_json::<serde_json::Value>(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_access_token() {
        assert!(MercadoPagoClient::new(MercadoPagoConfig::default()).is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let config = MercadoPagoConfig {
            base_url: "https://api.mercadopago.com/".to_string(),
            access_token: Some("TEST-token".to_string()),
            ..MercadoPagoConfig::default()
        };
        let client = MercadoPagoClient::new(config).unwrap();
        assert_eq!(client.url("v1/payments"), "https://api.mercadopago.com/v1/payments");
    }
}
