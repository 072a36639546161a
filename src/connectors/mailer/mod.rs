//! Transactional email relay connector

use async_trait::async_trait;
use serde::Serialize;

use crate::connectors::errors::ConnectorError;

pub mod client;
pub mod init;
pub mod mock;

pub use client::HttpEmailRelay;
pub use init::init;
pub use mock::MockEmailRelay;

/// A rendered message ready for delivery
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailRelay: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ConnectorError>;
}
