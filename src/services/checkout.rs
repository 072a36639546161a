use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::{json, Map};

use crate::configuration::Settings;
use crate::connectors::mercadopago::types::{
    BackUrls, PayerPhone, PixPayer, PreferenceItem, PreferencePayer,
};
use crate::connectors::mercadopago::{PixCharge, PixPaymentRequest, Preference, PreferenceRequest};
use crate::connectors::{BaasConnector, ConnectorError, PaymentGatewayConnector};
use crate::db;
use crate::models::{Order, Plan, User};

/// Turns orders into gateway checkouts and records the gateway ids on them
#[derive(Clone)]
pub struct Checkout {
    baas: Arc<dyn BaasConnector>,
    gateway: Arc<dyn PaymentGatewayConnector>,
    frontend_url: String,
    notification_url: String,
    statement_descriptor: String,
    preference_ttl: Duration,
}

impl Checkout {
    pub fn new(
        baas: Arc<dyn BaasConnector>,
        gateway: Arc<dyn PaymentGatewayConnector>,
        settings: &Settings,
    ) -> Self {
        let mp = &settings.connectors.mercadopago;
        Self {
            baas,
            gateway,
            frontend_url: settings.frontend_url.trim_end_matches('/').to_string(),
            notification_url: settings.webhook_url(),
            statement_descriptor: mp.statement_descriptor.clone(),
            preference_ttl: Duration::hours(mp.preference_ttl_hours),
        }
    }

    pub fn gateway(&self) -> &dyn PaymentGatewayConnector {
        self.gateway.as_ref()
    }

    pub fn preference_request(
        &self,
        order: &Order,
        plan: &Plan,
        user: &User,
        now: DateTime<Utc>,
    ) -> PreferenceRequest {
        PreferenceRequest {
            items: vec![PreferenceItem {
                title: plan.nome.clone(),
                description: format!("Acesso IPTV por {} dias", plan.duracao_dias),
                unit_price: order.valor,
                quantity: 1,
                currency_id: "BRL".to_string(),
            }],
            payer: PreferencePayer {
                name: user.nome_completo.clone(),
                email: user.email.clone(),
                phone: PayerPhone {
                    number: user.telefone.clone().unwrap_or_default(),
                },
            },
            back_urls: BackUrls {
                success: format!("{}/pagamento/sucesso", self.frontend_url),
                failure: format!("{}/pagamento/falha", self.frontend_url),
                pending: format!("{}/pagamento/pendente", self.frontend_url),
            },
            auto_return: "approved".to_string(),
            external_reference: order.id.to_string(),
            notification_url: self.notification_url.clone(),
            statement_descriptor: self.statement_descriptor.clone(),
            expires: true,
            expiration_date_from: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            expiration_date_to: (now + self.preference_ttl)
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    pub fn pix_request(&self, order: &Order, plan: &Plan, user: &User) -> PixPaymentRequest {
        PixPaymentRequest {
            transaction_amount: order.valor,
            description: format!("{} - {} dias", plan.nome, plan.duracao_dias),
            payment_method_id: "pix".to_string(),
            external_reference: order.id.to_string(),
            payer: PixPayer {
                email: user.email.clone(),
                first_name: user.first_name().to_string(),
                last_name: user.last_name(),
            },
            notification_url: self.notification_url.clone(),
        }
    }

    /// Create a checkout preference and store its id on the order
    #[tracing::instrument(name = "Create checkout preference.", skip_all, fields(order_id = %order.id))]
    pub async fn create_preference(
        &self,
        order: &Order,
        plan: &Plan,
        user: &User,
    ) -> Result<Preference, ConnectorError> {
        let request = self.preference_request(order, plan, user, Utc::now());
        let preference = self.gateway.create_preference(&request).await?;

        let mut patch = Map::new();
        patch.insert("mp_preference_id".to_string(), json!(preference.id));
        db::order::update(self.baas.as_ref(), &order.id, patch).await?;

        Ok(preference)
    }

    /// Create a PIX charge and store its payment id on the order
    #[tracing::instrument(name = "Create PIX charge.", skip_all, fields(order_id = %order.id))]
    pub async fn create_pix(
        &self,
        order: &Order,
        plan: &Plan,
        user: &User,
    ) -> Result<PixCharge, ConnectorError> {
        let request = self.pix_request(order, plan, user);
        let idempotency_key = format!("pix-{}", order.id);
        let charge = self
            .gateway
            .create_pix_payment(&request, &idempotency_key)
            .await?;

        let mut patch = Map::new();
        patch.insert("mp_payment_id".to_string(), json!(charge.payment_id));
        db::order::update(self.baas.as_ref(), &order.id, patch).await?;

        Ok(charge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{ExpirationSettings, Settings};
    use crate::connectors::{ConnectorConfig, InMemoryBaas, MockPaymentGateway};
    use serde_json::json;
    use uuid::Uuid;

    fn checkout() -> Checkout {
        let settings = Settings {
            app_port: 0,
            app_host: "127.0.0.1".to_string(),
            frontend_url: "https://app.example.com/".to_string(),
            backend_url: "https://api.example.com".to_string(),
            allowed_origins: vec![],
            connectors: ConnectorConfig::default(),
            expiration: ExpirationSettings::default(),
        };
        Checkout::new(
            Arc::new(InMemoryBaas::new()),
            Arc::new(MockPaymentGateway::new()),
            &settings,
        )
    }

    fn fixtures() -> (Order, Plan, User) {
        let user: User = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "email": "ana@example.com",
            "nome_completo": "Ana Maria Souza",
        }))
        .unwrap();
        let plan: Plan = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "nome": "Mensal",
            "preco": 35.0,
            "duracao_dias": 30,
            "ativo": true,
        }))
        .unwrap();
        let order: Order = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "usuario_id": user.id,
            "plano_id": plan.id,
            "valor": 29.9,
            "status_pagamento": "aguardando_pagamento",
            "status_acesso": "inativo",
        }))
        .unwrap();
        (order, plan, user)
    }

    #[test]
    fn preference_charges_the_order_value() {
        let (order, plan, user) = fixtures();
        let now = Utc::now();
        let request = checkout().preference_request(&order, &plan, &user, now);

        assert_eq!(request.items[0].unit_price, 29.9);
        assert_eq!(request.items[0].currency_id, "BRL");
        assert_eq!(request.external_reference, order.id.to_string());
        assert_eq!(
            request.notification_url,
            "https://api.example.com/api/webhooks/mercadopago"
        );
        assert_eq!(
            request.back_urls.pending,
            "https://app.example.com/pagamento/pendente"
        );
        assert_eq!(request.payer.phone.number, "");
        assert!(request.expiration_date_to > request.expiration_date_from);
    }

    #[test]
    fn pix_payer_names_come_from_the_profile() {
        let (order, plan, user) = fixtures();
        let request = checkout().pix_request(&order, &plan, &user);

        assert_eq!(request.payment_method_id, "pix");
        assert_eq!(request.payer.first_name, "Ana");
        assert_eq!(request.payer.last_name, "Maria Souza");
        assert_eq!(request.description, "Mensal - 30 dias");
    }
}
