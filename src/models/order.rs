use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment side of an order, driven by gateway notifications
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "aguardando_pagamento")]
    AwaitingPayment,
    #[serde(rename = "pago")]
    Paid,
    #[serde(rename = "cancelado")]
    Cancelled,
    #[serde(rename = "reembolsado")]
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::AwaitingPayment => "aguardando_pagamento",
            PaymentStatus::Paid => "pago",
            PaymentStatus::Cancelled => "cancelado",
            PaymentStatus::Refunded => "reembolsado",
        }
    }

    /// Map Mercado Pago's payment status vocabulary onto ours
    pub fn from_gateway(status: &str) -> Self {
        match status {
            "approved" => PaymentStatus::Paid,
            "rejected" | "cancelled" => PaymentStatus::Cancelled,
            "refunded" => PaymentStatus::Refunded,
            _ => PaymentStatus::AwaitingPayment,
        }
    }

    /// Allowed moves: awaiting -> any settled state, paid -> refunded and
    /// cancelled -> paid (a retry approved after a rejected attempt).
    /// Re-applying the current status is always accepted.
    pub fn can_transition_to(&self, next: PaymentStatus) -> bool {
        use PaymentStatus::*;

        *self == next
            || matches!(
                (self, next),
                (AwaitingPayment, Paid)
                    | (AwaitingPayment, Cancelled)
                    | (AwaitingPayment, Refunded)
                    | (Paid, Refunded)
                    | (Cancelled, Paid)
            )
    }
}

/// Whether IPTV credentials were provisioned; only changed by admins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessStatus {
    #[default]
    #[serde(rename = "inativo")]
    Inactive,
    #[serde(rename = "ativo")]
    Active,
    #[serde(rename = "expirado")]
    Expired,
}

impl AccessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::Inactive => "inativo",
            AccessStatus::Active => "ativo",
            AccessStatus::Expired => "expirado",
        }
    }
}

/// Row of the `pedidos` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub plano_id: Uuid,
    pub valor: f64,
    pub status_pagamento: PaymentStatus,
    pub status_acesso: AccessStatus,
    #[serde(default)]
    pub mp_preference_id: Option<String>,
    #[serde(default)]
    pub mp_payment_id: Option<String>,
    #[serde(default)]
    pub mp_status: Option<String>,
    #[serde(default)]
    pub data_pagamento: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data_expiracao: Option<DateTime<Utc>>,
    #[serde(default)]
    pub observacoes_admin: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// True when this exact gateway state was already recorded on the order
    pub fn has_recorded(&self, payment_id: &str, gateway_status: &str) -> bool {
        self.mp_payment_id.as_deref() == Some(payment_id)
            && self.mp_status.as_deref() == Some(gateway_status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_status_mapping() {
        assert_eq!(PaymentStatus::from_gateway("approved"), PaymentStatus::Paid);
        assert_eq!(PaymentStatus::from_gateway("rejected"), PaymentStatus::Cancelled);
        assert_eq!(PaymentStatus::from_gateway("cancelled"), PaymentStatus::Cancelled);
        assert_eq!(PaymentStatus::from_gateway("refunded"), PaymentStatus::Refunded);
        for other in ["pending", "in_process", "authorized", "charged_back", ""] {
            assert_eq!(
                PaymentStatus::from_gateway(other),
                PaymentStatus::AwaitingPayment,
                "{other}"
            );
        }
    }

    #[test]
    fn paid_orders_do_not_reopen() {
        use PaymentStatus::*;

        assert!(AwaitingPayment.can_transition_to(Paid));
        assert!(AwaitingPayment.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Refunded));
        assert!(Paid.can_transition_to(Paid));
        assert!(Cancelled.can_transition_to(Paid));

        assert!(!Paid.can_transition_to(AwaitingPayment));
        assert!(!Paid.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(AwaitingPayment));
        assert!(!Refunded.can_transition_to(Paid));
    }

    #[test]
    fn statuses_use_wire_names() {
        assert_eq!(
            serde_json::to_value(PaymentStatus::AwaitingPayment).unwrap(),
            "aguardando_pagamento"
        );
        assert_eq!(serde_json::to_value(AccessStatus::Active).unwrap(), "ativo");
        let parsed: PaymentStatus = serde_json::from_str("\"reembolsado\"").unwrap();
        assert_eq!(parsed, PaymentStatus::Refunded);
    }
}
