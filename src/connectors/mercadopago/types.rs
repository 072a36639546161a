use serde::{Deserialize, Deserializer, Serialize};

/// Mercado Pago ids are numeric for payments and text for preferences
fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("unexpected id: {}", other))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceItem {
    pub title: String,
    pub description: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub currency_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayerPhone {
    pub number: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferencePayer {
    pub name: String,
    pub email: String,
    pub phone: PayerPhone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackUrls {
    pub success: String,
    pub failure: String,
    pub pending: String,
}

/// Body of `POST /checkout/preferences`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceRequest {
    pub items: Vec<PreferenceItem>,
    pub payer: PreferencePayer,
    pub back_urls: BackUrls,
    pub auto_return: String,
    pub external_reference: String,
    pub notification_url: String,
    pub statement_descriptor: String,
    pub expires: bool,
    pub expiration_date_from: String,
    pub expiration_date_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(rename(serialize = "preference_id"), deserialize_with = "id_as_string")]
    pub id: String,
    pub init_point: String,
    #[serde(default)]
    pub sandbox_init_point: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixPayer {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Body of `POST /v1/payments` for an instant PIX charge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixPaymentRequest {
    pub transaction_amount: f64,
    pub description: String,
    pub payment_method_id: String,
    pub external_reference: String,
    pub payer: PixPayer,
    pub notification_url: String,
}

/// QR code data handed back to the customer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixCharge {
    pub payment_id: String,
    pub qr_code: Option<String>,
    pub qr_code_base64: Option<String>,
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct TransactionData {
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub qr_code_base64: Option<String>,
    #[serde(default)]
    pub ticket_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PointOfInteraction {
    #[serde(default)]
    pub transaction_data: TransactionData,
}

/// Raw answer to a PIX payment creation
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PixPaymentResponse {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub point_of_interaction: PointOfInteraction,
}

impl From<PixPaymentResponse> for PixCharge {
    fn from(resp: PixPaymentResponse) -> Self {
        let data = resp.point_of_interaction.transaction_data;
        Self {
            payment_id: resp.id,
            qr_code: data.qr_code,
            qr_code_base64: data.qr_code_base64,
            ticket_url: data.ticket_url,
        }
    }
}

/// Authoritative payment state from `GET /v1/payments/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub status_detail: Option<String>,
    #[serde(default)]
    pub transaction_amount: Option<f64>,
    #[serde(default)]
    pub date_approved: Option<String>,
    #[serde(default)]
    pub external_reference: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_id_may_be_numeric() {
        let info: PaymentInfo = serde_json::from_value(json!({
            "id": 1319283761,
            "status": "approved",
            "status_detail": "accredited",
            "transaction_amount": 29.9,
            "date_approved": "2024-03-01T12:00:00.000-04:00",
            "external_reference": "b3c1f7f0-8d4a-4a44-9a55-0d2c1e2f3a4b",
            "payer": {"email": "ana@example.com"}
        }))
        .unwrap();

        assert_eq!(info.id, "1319283761");
        assert_eq!(info.status, "approved");
    }

    #[test]
    fn pix_response_flattens_transaction_data() {
        let resp: PixPaymentResponse = serde_json::from_value(json!({
            "id": 42,
            "status": "pending",
            "point_of_interaction": {
                "transaction_data": {
                    "qr_code": "00020126...",
                    "qr_code_base64": "iVBORw0K...",
                    "ticket_url": "https://www.mercadopago.com.br/payments/42/ticket"
                }
            }
        }))
        .unwrap();

        let charge = PixCharge::from(resp);
        assert_eq!(charge.payment_id, "42");
        assert_eq!(charge.qr_code.as_deref(), Some("00020126..."));
    }

    #[test]
    fn preference_is_exposed_as_preference_id() {
        let preference: Preference = serde_json::from_value(json!({
            "id": "123-abc",
            "init_point": "https://mp/checkout?pref_id=123-abc",
            "sandbox_init_point": "https://sandbox.mp/checkout?pref_id=123-abc"
        }))
        .unwrap();

        let body = serde_json::to_value(&preference).unwrap();
        assert_eq!(body["preference_id"], "123-abc");
        assert!(body.get("id").is_none());
    }
}
