use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{PaymentGatewayConnector, PaymentInfo, PixCharge, PixPaymentRequest, Preference, PreferenceRequest};
use crate::connectors::errors::ConnectorError;

/// Gateway double: payments are whatever the test registered
#[derive(Default)]
pub struct MockPaymentGateway {
    payments: Mutex<HashMap<String, PaymentInfo>>,
    preferences: Mutex<Vec<PreferenceRequest>>,
    pix_charges: Mutex<HashMap<String, PixCharge>>,
    unavailable: AtomicBool,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the state `get_payment` returns for `info.id`
    pub fn set_payment(&self, info: PaymentInfo) {
        self.payments.lock().unwrap().insert(info.id.clone(), info);
    }

    /// Preference requests received so far
    pub fn preferences(&self) -> Vec<PreferenceRequest> {
        self.preferences.lock().unwrap().clone()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), ConnectorError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ConnectorError::ServiceUnavailable("mock gateway down".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGatewayConnector for MockPaymentGateway {
    async fn create_preference(
        &self,
        request: &PreferenceRequest,
    ) -> Result<Preference, ConnectorError> {
        self.check_available()?;
        let mut preferences = self.preferences.lock().unwrap();
        preferences.push(request.clone());

        let id = format!("pref-{}-{}", preferences.len(), request.external_reference);
        Ok(Preference {
            init_point: format!("https://mock.mercadopago.local/checkout?pref_id={}", id),
            sandbox_init_point: Some(format!(
                "https://sandbox.mock.mercadopago.local/checkout?pref_id={}",
                id
            )),
            id,
        })
    }

    async fn create_pix_payment(
        &self,
        request: &PixPaymentRequest,
        idempotency_key: &str,
    ) -> Result<PixCharge, ConnectorError> {
        self.check_available()?;
        let mut charges = self.pix_charges.lock().unwrap();
        let next_id = (charges.len() + 1000).to_string();
        let charge = charges
            .entry(idempotency_key.to_string())
            .or_insert_with(|| PixCharge {
                payment_id: next_id.clone(),
                qr_code: Some(format!("00020126pix{}", next_id)),
                qr_code_base64: Some("aVZCT1J3MEs=".to_string()),
                ticket_url: Some(format!("https://mock.mercadopago.local/payments/{}", next_id)),
            })
            .clone();

        self.payments
            .lock()
            .unwrap()
            .entry(charge.payment_id.clone())
            .or_insert_with(|| PaymentInfo {
                id: charge.payment_id.clone(),
                status: "pending".to_string(),
                status_detail: Some("pending_waiting_transfer".to_string()),
                transaction_amount: Some(request.transaction_amount),
                date_approved: None,
                external_reference: Some(request.external_reference.clone()),
            });

        Ok(charge)
    }

    async fn get_payment(&self, payment_id: &str) -> Result<PaymentInfo, ConnectorError> {
        self.check_available()?;
        self.payments
            .lock()
            .unwrap()
            .get(payment_id)
            .cloned()
            .ok_or_else(|| ConnectorError::NotFound(format!("payment {}", payment_id)))
    }

    async fn ping(&self) -> Result<(), ConnectorError> {
        self.check_available()
    }
}
