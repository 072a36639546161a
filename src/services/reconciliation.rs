//! Payment-status reconciliation.
//!
//! A gateway notification only names a payment; the authoritative state is
//! fetched from the gateway and applied to the order referenced by
//! `external_reference`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Map};
use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError, PaymentGatewayConnector};
use crate::db;
use crate::models::PaymentStatus;
use crate::services::Notifier;

#[derive(Debug, Clone, PartialEq)]
pub enum ReconcileOutcome {
    Updated {
        order_id: Uuid,
        status: PaymentStatus,
    },
    /// The order already records this payment id and gateway status
    Duplicate { order_id: Uuid },
    /// The move would reopen or rewrite a settled order
    TransitionRejected {
        order_id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    },
    OrderNotFound,
    MissingReference,
}

#[derive(Clone)]
pub struct Reconciler {
    baas: Arc<dyn BaasConnector>,
    gateway: Arc<dyn PaymentGatewayConnector>,
    notifier: Notifier,
}

impl Reconciler {
    pub fn new(
        baas: Arc<dyn BaasConnector>,
        gateway: Arc<dyn PaymentGatewayConnector>,
        notifier: Notifier,
    ) -> Self {
        Self {
            baas,
            gateway,
            notifier,
        }
    }

    #[tracing::instrument(name = "Reconcile payment.", skip(self))]
    pub async fn reconcile(&self, payment_id: &str) -> Result<ReconcileOutcome, ConnectorError> {
        let baas = self.baas.as_ref();
        let payment = self.gateway.get_payment(payment_id).await?;

        let order_id = match payment
            .external_reference
            .as_deref()
            .and_then(|r| Uuid::parse_str(r.trim()).ok())
        {
            Some(id) => id,
            None => {
                tracing::warn!("Payment {} has no usable external_reference", payment.id);
                return Ok(ReconcileOutcome::MissingReference);
            }
        };

        let order = match db::order::fetch(baas, &order_id).await? {
            Some(order) => order,
            None => {
                tracing::warn!("Payment {} references unknown order {}", payment.id, order_id);
                return Ok(ReconcileOutcome::OrderNotFound);
            }
        };

        if order.has_recorded(&payment.id, &payment.status) {
            tracing::info!("Payment {} already applied to order {}", payment.id, order.id);
            return Ok(ReconcileOutcome::Duplicate { order_id: order.id });
        }

        let next = PaymentStatus::from_gateway(&payment.status);
        if !order.status_pagamento.can_transition_to(next) {
            tracing::warn!(
                "Ignoring transition {} -> {} for order {}",
                order.status_pagamento.as_str(),
                next.as_str(),
                order.id
            );
            return Ok(ReconcileOutcome::TransitionRejected {
                order_id: order.id,
                from: order.status_pagamento,
                to: next,
            });
        }

        let mut patch = Map::new();
        patch.insert("status_pagamento".to_string(), json!(next));
        patch.insert("mp_payment_id".to_string(), json!(payment.id));
        patch.insert("mp_status".to_string(), json!(payment.status));
        if next == PaymentStatus::Paid {
            let paid_at = payment
                .date_approved
                .as_deref()
                .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
                .map(|d| d.with_timezone(&Utc))
                .unwrap_or_else(Utc::now);
            patch.insert("data_pagamento".to_string(), json!(paid_at));
        }

        let updated = match db::order::update(baas, &order.id, patch).await? {
            Some(updated) => updated,
            None => return Ok(ReconcileOutcome::OrderNotFound),
        };
        tracing::info!(
            "Order {} is now {} (gateway status {})",
            updated.id,
            next.as_str(),
            payment.status
        );

        if next == PaymentStatus::Paid && order.status_pagamento != PaymentStatus::Paid {
            let (plan, customer) = tokio::try_join!(
                db::plan::fetch(baas, &updated.plano_id, false),
                db::user::fetch(baas, &updated.usuario_id),
            )?;
            self.notifier
                .payment_confirmed(&updated, plan.as_ref(), customer.as_ref())
                .await;
        }

        Ok(ReconcileOutcome::Updated {
            order_id: updated.id,
            status: next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::mercadopago::PaymentInfo;
    use crate::connectors::{InMemoryBaas, MockEmailRelay, MockPaymentGateway};
    use crate::services::EmailTemplates;

    struct Fixture {
        baas: Arc<InMemoryBaas>,
        gateway: Arc<MockPaymentGateway>,
        mailer: Arc<MockEmailRelay>,
        reconciler: Reconciler,
        order_id: Uuid,
    }

    fn fixture() -> Fixture {
        let baas = Arc::new(InMemoryBaas::new());
        let gateway = Arc::new(MockPaymentGateway::new());
        let mailer = Arc::new(MockEmailRelay::new());

        let customer = Uuid::new_v4();
        let admin = Uuid::new_v4();
        baas.seed(
            "usuarios",
            json!({"id": customer, "email": "ana@example.com", "nome_completo": "Ana Souza", "status": "ativa"}),
        );
        baas.seed("user_roles", json!({"user_id": admin, "role": "admin"}));
        baas.seed(
            "configuracoes",
            json!({"chave": "notificacao_email_admin", "valor": "admin@example.com"}),
        );
        let plan = baas.seed(
            "planos",
            json!({"nome": "Mensal", "preco": 29.9, "duracao_dias": 30, "ativo": true}),
        );
        let order = baas.seed(
            "pedidos",
            json!({
                "usuario_id": customer,
                "plano_id": plan["id"].clone(),
                "valor": 29.9,
                "status_pagamento": "aguardando_pagamento",
                "status_acesso": "inativo"
            }),
        );
        let order_id = Uuid::parse_str(order["id"].as_str().unwrap()).unwrap();

        let notifier = Notifier::new(
            baas.clone(),
            mailer.clone(),
            Arc::new(EmailTemplates::new().unwrap()),
            "https://app.example.com",
            None,
        );
        let reconciler = Reconciler::new(baas.clone(), gateway.clone(), notifier);

        Fixture {
            baas,
            gateway,
            mailer,
            reconciler,
            order_id,
        }
    }

    fn payment(id: &str, status: &str, order_id: Uuid) -> PaymentInfo {
        PaymentInfo {
            id: id.to_string(),
            status: status.to_string(),
            status_detail: None,
            transaction_amount: Some(29.9),
            date_approved: None,
            external_reference: Some(order_id.to_string()),
        }
    }

    #[tokio::test]
    async fn approved_payment_marks_order_paid_once() {
        let f = fixture();
        f.gateway.set_payment(payment("555", "approved", f.order_id));

        let first = f.reconciler.reconcile("555").await.unwrap();
        assert_eq!(
            first,
            ReconcileOutcome::Updated {
                order_id: f.order_id,
                status: PaymentStatus::Paid
            }
        );
        let second = f.reconciler.reconcile("555").await.unwrap();
        assert_eq!(second, ReconcileOutcome::Duplicate { order_id: f.order_id });

        let order = &f.baas.rows("pedidos")[0];
        assert_eq!(order["status_pagamento"], "pago");
        assert_eq!(order["mp_payment_id"], "555");
        assert!(!order["data_pagamento"].is_null());

        // one for the admin, one for the customer
        assert_eq!(f.baas.rows("notificacoes").len(), 2);
        let recipients: Vec<_> = f.mailer.sent().into_iter().map(|e| e.to).collect();
        assert_eq!(recipients, vec!["ana@example.com", "admin@example.com"]);
    }

    #[tokio::test]
    async fn settled_order_is_not_reopened() {
        let f = fixture();
        f.gateway.set_payment(payment("555", "approved", f.order_id));
        f.reconciler.reconcile("555").await.unwrap();

        f.gateway.set_payment(payment("556", "rejected", f.order_id));
        let outcome = f.reconciler.reconcile("556").await.unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::TransitionRejected {
                order_id: f.order_id,
                from: PaymentStatus::Paid,
                to: PaymentStatus::Cancelled
            }
        );
        assert_eq!(f.baas.rows("pedidos")[0]["status_pagamento"], "pago");
    }

    #[tokio::test]
    async fn approved_retry_settles_rejected_order() {
        let f = fixture();
        f.gateway.set_payment(payment("700", "rejected", f.order_id));
        f.reconciler.reconcile("700").await.unwrap();
        assert_eq!(f.baas.rows("pedidos")[0]["status_pagamento"], "cancelado");
        assert!(f.baas.rows("notificacoes").is_empty());

        f.gateway.set_payment(payment("701", "approved", f.order_id));
        let outcome = f.reconciler.reconcile("701").await.unwrap();
        assert_eq!(
            outcome,
            ReconcileOutcome::Updated {
                order_id: f.order_id,
                status: PaymentStatus::Paid
            }
        );

        let order = &f.baas.rows("pedidos")[0];
        assert_eq!(order["status_pagamento"], "pago");
        assert_eq!(order["mp_payment_id"], "701");
        assert_eq!(order["mp_status"], "approved");
        assert!(!order["data_pagamento"].is_null());
        assert_eq!(f.baas.rows("notificacoes").len(), 2);
    }

    #[tokio::test]
    async fn pending_payment_records_gateway_state_without_notifying() {
        let f = fixture();
        f.gateway.set_payment(payment("557", "in_process", f.order_id));

        f.reconciler.reconcile("557").await.unwrap();

        let order = &f.baas.rows("pedidos")[0];
        assert_eq!(order["status_pagamento"], "aguardando_pagamento");
        assert_eq!(order["mp_status"], "in_process");
        assert!(f.baas.rows("notificacoes").is_empty());
        assert!(f.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn unknown_reference_is_acknowledged() {
        let f = fixture();
        f.gateway.set_payment(payment("558", "approved", Uuid::new_v4()));
        assert_eq!(
            f.reconciler.reconcile("558").await.unwrap(),
            ReconcileOutcome::OrderNotFound
        );

        let mut orphan = payment("559", "approved", f.order_id);
        orphan.external_reference = None;
        f.gateway.set_payment(orphan);
        assert_eq!(
            f.reconciler.reconcile("559").await.unwrap(),
            ReconcileOutcome::MissingReference
        );
    }

    #[tokio::test]
    async fn gateway_failure_propagates() {
        let f = fixture();
        f.gateway.set_unavailable(true);
        assert!(f.reconciler.reconcile("555").await.is_err());
    }

    #[tokio::test]
    async fn email_failure_does_not_fail_reconciliation() {
        let f = fixture();
        f.mailer.set_failing(true);
        f.gateway.set_payment(payment("560", "approved", f.order_id));

        let outcome = f.reconciler.reconcile("560").await.unwrap();
        assert!(matches!(outcome, ReconcileOutcome::Updated { .. }));
        assert_eq!(f.baas.rows("notificacoes").len(), 2);
    }
}
