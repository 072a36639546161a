use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{EmailRelay, OutgoingEmail};
use crate::connectors::errors::ConnectorError;

/// Keeps every message instead of delivering it
#[derive(Default)]
pub struct MockEmailRelay {
    sent: Mutex<Vec<OutgoingEmail>>,
    failing: AtomicBool,
}

impl MockEmailRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl EmailRelay for MockEmailRelay {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), ConnectorError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ConnectorError::ServiceUnavailable("mock relay down".to_string()));
        }
        tracing::debug!(to = %email.to, subject = %email.subject, "email captured");
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
