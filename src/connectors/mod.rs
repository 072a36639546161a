//! External Service Connectors
//!
//! Every call leaving this service goes through a connector trait: the BaaS
//! (auth and tables), the Mercado Pago gateway and the email relay.
//!
//! ## Architecture Pattern
//!
//! 1. Trait in `{service}/mod.rs` → allows mocking in tests
//! 2. HTTP client in `{service}/client.rs`, in-memory double in `{service}/mock.rs`
//! 3. Configuration in `config.rs`, secrets from the environment
//! 4. Routes receive `web::Data<Arc<dyn Trait>>` and never see HTTP details
//!
//! ```ignore
//! pub async fn handler(baas: web::Data<Arc<dyn BaasConnector>>) -> Result<impl Responder, ApiError> {
//!     let rows = baas.select("planos", &Query::new().eq("ativo", true)).await?;
//! }
//! ```

pub mod baas;
pub mod config;
pub mod errors;
pub mod mailer;
pub mod mercadopago;

pub use baas::{BaasClient, BaasConnector, InMemoryBaas, Query};
pub use config::{BaasConfig, ConnectorConfig, EmailRelayConfig, MercadoPagoConfig};
pub use errors::ConnectorError;
pub use mailer::{EmailRelay, MockEmailRelay, OutgoingEmail};
pub use mercadopago::{MockPaymentGateway, PaymentGatewayConnector};

pub use baas::init::init as init_baas;
pub use mailer::init as init_mailer;
pub use mercadopago::init as init_mercadopago;
