//! Mercado Pago payment gateway connector
//!
//! Checkout preferences and PIX charges are created here; the webhook flow
//! only ever trusts [`PaymentGatewayConnector::get_payment`] for the status.

use async_trait::async_trait;

use crate::connectors::errors::ConnectorError;

pub mod client;
pub mod init;
pub mod mock;
pub mod signature;
pub mod types;

pub use client::MercadoPagoClient;
pub use init::init;
pub use mock::MockPaymentGateway;
pub use types::{PaymentInfo, PixCharge, PixPaymentRequest, Preference, PreferenceRequest};

#[async_trait]
pub trait PaymentGatewayConnector: Send + Sync {
    async fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Result<Preference, ConnectorError>;

    /// Create a PIX charge. Replaying the same `idempotency_key` returns the
    /// charge created the first time.
    async fn create_pix_payment(
        &self,
        request: &PixPaymentRequest,
        idempotency_key: &str,
    ) -> Result<PixCharge, ConnectorError>;

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentInfo, ConnectorError>;

    async fn ping(&self) -> Result<(), ConnectorError>;
}
