use std::sync::Arc;

use crate::connectors::{BaasConnector, EmailRelay, OutgoingEmail};
use crate::db;
use crate::models::{NewNotification, NotificationKind, Order, Plan, TrialRequest, TrialStatus, User};
use crate::services::email_templates::{format_brl, EmailTemplates};

/// In-app notifications and transactional email.
///
/// Nothing here fails the caller: delivery problems are logged and dropped.
#[derive(Clone)]
pub struct Notifier {
    baas: Arc<dyn BaasConnector>,
    mailer: Arc<dyn EmailRelay>,
    templates: Arc<EmailTemplates>,
    frontend_url: String,
    fallback_admin_address: Option<String>,
}

impl Notifier {
    pub fn new(
        baas: Arc<dyn BaasConnector>,
        mailer: Arc<dyn EmailRelay>,
        templates: Arc<EmailTemplates>,
        frontend_url: &str,
        fallback_admin_address: Option<String>,
    ) -> Self {
        Self {
            baas,
            mailer,
            templates,
            frontend_url: frontend_url.trim_end_matches('/').to_string(),
            fallback_admin_address,
        }
    }

    fn link(&self, path: &str) -> String {
        format!("{}/{}", self.frontend_url, path)
    }

    async fn deliver(&self, email: anyhow::Result<OutgoingEmail>) {
        let email = match email {
            Ok(email) => email,
            Err(err) => {
                tracing::error!("Failed to render email: {:?}", err);
                return;
            }
        };

        match self.mailer.send(&email).await {
            Ok(()) => tracing::info!(to = %email.to, subject = %email.subject, "Email sent"),
            Err(err) => tracing::error!(to = %email.to, "Failed to send email: {}", err),
        }
    }

    async fn notify(&self, notification: NewNotification) {
        if let Err(err) = db::notification::insert(self.baas.as_ref(), &notification).await {
            tracing::error!(
                user_id = %notification.usuario_id,
                "Failed to insert notification: {}",
                err
            );
        }
    }

    async fn admin_address(&self) -> Option<String> {
        match db::setting::fetch(self.baas.as_ref(), db::setting::ADMIN_EMAIL).await {
            Ok(Some(address)) => Some(address),
            Ok(None) => self.fallback_admin_address.clone(),
            Err(err) => {
                tracing::warn!("Failed to read admin email setting: {}", err);
                self.fallback_admin_address.clone()
            }
        }
    }

    #[tracing::instrument(name = "Notify registration.", skip_all, fields(user_id = %user.id))]
    pub async fn welcome(&self, user: &User) {
        let email = self.templates.welcome(user, &self.link("login"));
        self.deliver(email).await;
    }

    /// Fan-out after an order moved into `pago`
    #[tracing::instrument(name = "Notify payment confirmation.", skip_all, fields(order_id = %order.id))]
    pub async fn payment_confirmed(&self, order: &Order, plan: Option<&Plan>, customer: Option<&User>) {
        let plan_name = plan.map(|p| p.nome.as_str()).unwrap_or("Plano");

        match db::user::first_admin_id(self.baas.as_ref()).await {
            Ok(Some(admin_id)) => {
                self.notify(
                    NewNotification::new(
                        admin_id,
                        NotificationKind::PagamentoConfirmado,
                        "Novo Pagamento Confirmado",
                        format!(
                            "Pedido #{} - {} - R$ {}",
                            order.id,
                            plan_name,
                            format_brl(order.valor)
                        ),
                    )
                    .for_order(order.id),
                )
                .await
            }
            Ok(None) => tracing::warn!("No admin user to notify about order {}", order.id),
            Err(err) => tracing::error!("Failed to look up admin user: {}", err),
        }

        self.notify(
            NewNotification::new(
                order.usuario_id,
                NotificationKind::PagamentoAprovado,
                "Pagamento Aprovado",
                "Seu pagamento foi confirmado! Aguarde o envio das credenciais.",
            )
            .for_order(order.id),
        )
        .await;

        let (Some(plan), Some(customer)) = (plan, customer) else {
            tracing::warn!("Order {} is missing plan or customer, emails skipped", order.id);
            return;
        };

        self.deliver(self.templates.payment_confirmed(customer, order, plan))
            .await;

        match self.admin_address().await {
            Some(address) => {
                let email = self
                    .templates
                    .admin_payment_alert(&address, customer, order, plan);
                self.deliver(email).await;
            }
            None => tracing::warn!("No admin email configured, payment alert skipped"),
        }
    }

    #[tracing::instrument(name = "Notify credentials.", skip_all, fields(order_id = %order.id))]
    pub async fn credentials_delivered(
        &self,
        customer: &User,
        order: &Order,
        plan: &Plan,
        credentials: &str,
    ) {
        self.deliver(self.templates.credentials(customer, order, plan, credentials))
            .await;
    }

    #[tracing::instrument(name = "Notify trial decision.", skip_all, fields(trial_id = %trial.id))]
    pub async fn trial_decided(&self, trial: &TrialRequest) {
        let notification = match trial.status {
            TrialStatus::Approved => NewNotification::new(
                trial.usuario_id,
                NotificationKind::Sucesso,
                "Teste Grátis Aprovado!",
                "Sua solicitação de teste grátis foi aprovada. Aproveite!",
            ),
            TrialStatus::Rejected => NewNotification::new(
                trial.usuario_id,
                NotificationKind::Info,
                "Solicitação de Teste Rejeitada",
                format!(
                    "Sua solicitação foi rejeitada. {}",
                    trial.observacoes_admin.as_deref().unwrap_or("")
                )
                .trim_end()
                .to_string(),
            ),
            TrialStatus::Pending => return,
        };

        self.notify(notification).await;
    }

    pub async fn expiration_warning(&self, customer: &User, order: &Order, plan: &Plan, days_left: i64) {
        let email = self.templates.expiration_warning(
            customer,
            order,
            plan,
            days_left,
            &self.link("planos"),
        );
        self.deliver(email).await;
    }
}
