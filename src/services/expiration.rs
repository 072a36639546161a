use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::configuration::ExpirationSettings;
use crate::connectors::{BaasConnector, ConnectorError};
use crate::db;
use crate::services::Notifier;

/// Whole days until `expires_at`, rounded up
pub fn days_left(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> i64 {
    let seconds = (expires_at - now).num_seconds().max(0);
    (seconds + 86_399) / 86_400
}

/// Periodic warning for customers whose access is about to end
pub struct ExpirationSweeper {
    baas: Arc<dyn BaasConnector>,
    notifier: Notifier,
    default_warning_days: i64,
    interval: std::time::Duration,
}

impl ExpirationSweeper {
    pub fn new(
        baas: Arc<dyn BaasConnector>,
        notifier: Notifier,
        settings: &ExpirationSettings,
    ) -> Self {
        Self {
            baas,
            notifier,
            default_warning_days: settings.default_warning_days,
            interval: std::time::Duration::from_secs(settings.interval_secs.max(1)),
        }
    }

    async fn warning_days(&self) -> i64 {
        match db::setting::fetch(self.baas.as_ref(), db::setting::WARNING_DAYS).await {
            Ok(Some(value)) => value.parse::<i64>().unwrap_or_else(|_| {
                tracing::warn!("Invalid {} value {:?}", db::setting::WARNING_DAYS, value);
                self.default_warning_days
            }),
            Ok(None) => self.default_warning_days,
            Err(err) => {
                tracing::warn!("Failed to read {}: {}", db::setting::WARNING_DAYS, err);
                self.default_warning_days
            }
        }
    }

    /// One pass over active orders expiring within the warning window.
    /// Returns the number of warnings handed to the mailer.
    #[tracing::instrument(name = "Expiration sweep.", skip(self))]
    pub async fn sweep_once(&self, now: DateTime<Utc>) -> Result<usize, ConnectorError> {
        let baas = self.baas.as_ref();
        let window = self.warning_days().await;
        let orders = db::order::list_expiring(baas, now, now + Duration::days(window)).await?;
        if orders.is_empty() {
            tracing::info!("No access expiring in the next {} days", window);
            return Ok(0);
        }

        let user_ids: Vec<Uuid> = orders.iter().map(|o| o.usuario_id).collect();
        let plan_ids: Vec<Uuid> = orders.iter().map(|o| o.plano_id).collect();
        let (users, plans) = tokio::try_join!(
            db::user::fetch_many(baas, &user_ids),
            db::plan::fetch_many(baas, &plan_ids),
        )?;
        let users: HashMap<Uuid, _> = users.into_iter().map(|u| (u.id, u)).collect();
        let plans: HashMap<Uuid, _> = plans.into_iter().map(|p| (p.id, p)).collect();

        let mut sent = 0;
        for order in &orders {
            let (Some(user), Some(plan), Some(expires_at)) = (
                users.get(&order.usuario_id),
                plans.get(&order.plano_id),
                order.data_expiracao,
            ) else {
                tracing::warn!("Order {} lacks user, plan or expiration date", order.id);
                continue;
            };

            self.notifier
                .expiration_warning(user, order, plan, days_left(now, expires_at))
                .await;
            sent += 1;
        }

        tracing::info!("{} expiration warnings sent", sent);
        Ok(sent)
    }

    /// Run `sweep_once` on a fixed interval until the runtime shuts down
    pub fn spawn(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if let Err(err) = self.sweep_once(Utc::now()).await {
                    tracing::error!("Expiration sweep failed: {}", err);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::{InMemoryBaas, MockEmailRelay};
    use crate::services::EmailTemplates;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn days_left_rounds_up() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        assert_eq!(days_left(now, now + Duration::hours(1)), 1);
        assert_eq!(days_left(now, now + Duration::days(3)), 3);
        assert_eq!(days_left(now, now + Duration::days(3) + Duration::seconds(1)), 4);
        assert_eq!(days_left(now, now), 0);
    }

    #[tokio::test]
    async fn warns_only_active_orders_inside_the_window() {
        let baas = Arc::new(InMemoryBaas::new());
        let mailer = Arc::new(MockEmailRelay::new());
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();

        let user = Uuid::new_v4();
        baas.seed(
            "usuarios",
            json!({"id": user, "email": "ana@example.com", "nome_completo": "Ana", "status": "ativa"}),
        );
        baas.seed("configuracoes", json!({"chave": "dias_aviso_expiracao", "valor": "5"}));
        let plan = baas.seed(
            "planos",
            json!({"nome": "Mensal", "preco": 29.9, "duracao_dias": 30, "ativo": true}),
        );

        let order = |acesso: &str, expires: DateTime<Utc>| {
            json!({
                "usuario_id": user,
                "plano_id": plan["id"].clone(),
                "valor": 29.9,
                "status_pagamento": "pago",
                "status_acesso": acesso,
                "data_expiracao": expires,
            })
        };
        baas.seed("pedidos", order("ativo", now + Duration::days(2)));
        baas.seed("pedidos", order("ativo", now + Duration::days(6)));
        baas.seed("pedidos", order("expirado", now + Duration::days(1)));
        baas.seed("pedidos", order("ativo", now - Duration::days(1)));

        let notifier = Notifier::new(
            baas.clone(),
            mailer.clone(),
            Arc::new(EmailTemplates::new().unwrap()),
            "https://app.example.com",
            None,
        );
        let sweeper = ExpirationSweeper::new(baas.clone(), notifier, &ExpirationSettings::default());

        assert_eq!(sweeper.sweep_once(now).await.unwrap(), 1);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Seu acesso IPTV expira em 2 dias");
    }
}
