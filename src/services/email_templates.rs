//! Transactional email rendering.
//!
//! Templates are embedded and registered with `.html` names, so Tera
//! autoescapes every interpolated value (names, notes, credentials).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tera::{Context as TeraContext, Tera};

use crate::connectors::OutgoingEmail;
use crate::models::{Order, Plan, User};

const BRAND: &str = "IPTV Revenda";

pub struct EmailTemplates {
    tera: Tera,
}

/// `29,90` style amount
pub fn format_brl(value: f64) -> String {
    format!("{:.2}", value).replace('.', ",")
}

/// `31/12/2024`
pub fn format_date(value: &DateTime<Utc>) -> String {
    value.format("%d/%m/%Y").to_string()
}

impl EmailTemplates {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("welcome.html", WELCOME_TEMPLATE),
            ("payment_confirmed.html", PAYMENT_CONFIRMED_TEMPLATE),
            ("credentials.html", CREDENTIALS_TEMPLATE),
            ("expiration_warning.html", EXPIRATION_WARNING_TEMPLATE),
            ("admin_payment_alert.html", ADMIN_PAYMENT_ALERT_TEMPLATE),
        ])
        .context("Failed to register email templates")?;

        Ok(Self { tera })
    }

    fn render(&self, name: &str, mut context: TeraContext) -> Result<String> {
        context.insert("brand", BRAND);
        self.tera
            .render(name, &context)
            .with_context(|| format!("Failed to render {}", name))
    }

    fn order_context(user: &User, order: &Order, plan: &Plan) -> TeraContext {
        let mut context = TeraContext::new();
        context.insert("nome", &user.nome_completo);
        context.insert("plano_nome", &plan.nome);
        context.insert("duracao_dias", &plan.duracao_dias);
        context.insert("valor", &format_brl(order.valor));
        context.insert("pedido_id", &order.id.to_string());
        context
    }

    pub fn welcome(&self, user: &User, login_url: &str) -> Result<OutgoingEmail> {
        let mut context = TeraContext::new();
        context.insert("nome", &user.nome_completo);
        context.insert("login_url", login_url);

        Ok(OutgoingEmail {
            to: user.email.clone(),
            subject: format!("Bem-vindo à {}!", BRAND),
            html: self.render("welcome.html", context)?,
        })
    }

    pub fn payment_confirmed(&self, user: &User, order: &Order, plan: &Plan) -> Result<OutgoingEmail> {
        let context = Self::order_context(user, order, plan);

        Ok(OutgoingEmail {
            to: user.email.clone(),
            subject: format!("Pagamento Confirmado - {}", BRAND),
            html: self.render("payment_confirmed.html", context)?,
        })
    }

    pub fn credentials(
        &self,
        user: &User,
        order: &Order,
        plan: &Plan,
        credentials: &str,
    ) -> Result<OutgoingEmail> {
        let mut context = Self::order_context(user, order, plan);
        context.insert("credenciais", credentials);
        context.insert(
            "data_expiracao",
            &order.data_expiracao.as_ref().map(format_date),
        );

        Ok(OutgoingEmail {
            to: user.email.clone(),
            subject: "Suas Credenciais IPTV - Acesso Liberado".to_string(),
            html: self.render("credentials.html", context)?,
        })
    }

    pub fn expiration_warning(
        &self,
        user: &User,
        order: &Order,
        plan: &Plan,
        days_left: i64,
        renew_url: &str,
    ) -> Result<OutgoingEmail> {
        let mut context = Self::order_context(user, order, plan);
        context.insert("dias_restantes", &days_left);
        context.insert("renovar_url", renew_url);
        context.insert(
            "data_expiracao",
            &order.data_expiracao.as_ref().map(format_date),
        );

        Ok(OutgoingEmail {
            to: user.email.clone(),
            subject: format!("Seu acesso IPTV expira em {} dias", days_left),
            html: self.render("expiration_warning.html", context)?,
        })
    }

    pub fn admin_payment_alert(
        &self,
        admin_address: &str,
        customer: &User,
        order: &Order,
        plan: &Plan,
    ) -> Result<OutgoingEmail> {
        let mut context = Self::order_context(customer, order, plan);
        context.insert("email", &customer.email);
        context.insert(
            "telefone",
            customer.telefone.as_deref().unwrap_or("Não informado"),
        );

        Ok(OutgoingEmail {
            to: admin_address.to_string(),
            subject: "Novo Pagamento Confirmado".to_string(),
            html: self.render("admin_payment_alert.html", context)?,
        })
    }
}

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <style>
    body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }
    .container { max-width: 600px; margin: 0 auto; padding: 20px; }
    .header { background: {% block accent %}linear-gradient(135deg, #667eea 0%, #764ba2 100%){% endblock accent %}; color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }
    .content { background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px; }
    .info-box { background: white; padding: 20px; border-radius: 5px; margin: 20px 0; border-left: 4px solid #667eea; }
    .warning { background: #fef3c7; padding: 15px; border-radius: 5px; margin: 20px 0; border-left: 4px solid #f59e0b; }
    .button { display: inline-block; padding: 12px 30px; background: #667eea; color: white; text-decoration: none; border-radius: 5px; margin: 20px 0; }
    .credentials { padding: 10px; background: #f0fdf4; border-radius: 5px; font-family: monospace; white-space: pre-wrap; }
    .footer { text-align: center; margin-top: 20px; color: #666; font-size: 12px; }
  </style>
</head>
<body>
  <div class="container">
    <div class="header"><h1>{% block title %}{% endblock title %}</h1></div>
    <div class="content">
{% block content %}{% endblock content %}
    </div>
    <div class="footer"><p>{{ brand }} - Todos os direitos reservados</p></div>
  </div>
</body>
</html>
"#;

const WELCOME_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Bem-vindo(a)!{% endblock title %}
{% block content %}
      <h2>Olá, {{ nome }}!</h2>
      <p>Sua conta foi criada com sucesso na {{ brand }}.</p>
      <p>Agora você pode escolher seu plano e começar a aproveitar nossos serviços.</p>
      <a href="{{ login_url }}" class="button">Acessar Minha Conta</a>
      <p>Se você tiver alguma dúvida, entre em contato conosco.</p>
{% endblock content %}
"#;

const PAYMENT_CONFIRMED_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Pagamento Confirmado!{% endblock title %}
{% block content %}
      <h2>Olá, {{ nome }}!</h2>
      <p>Seu pagamento foi confirmado com sucesso!</p>
      <div class="info-box">
        <h3>Detalhes do Pedido:</h3>
        <p><strong>Plano:</strong> {{ plano_nome }}</p>
        <p><strong>Duração:</strong> {{ duracao_dias }} dias</p>
        <p><strong>Valor:</strong> R$ {{ valor }}</p>
        <p><strong>Pedido:</strong> #{{ pedido_id }}</p>
      </div>
      <p>Suas credenciais de acesso serão enviadas em breve por nossa equipe.</p>
      <p>Você pode acompanhar o status do seu pedido na área do cliente.</p>
{% endblock content %}
"#;

const CREDENTIALS_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block accent %}linear-gradient(135deg, #10b981 0%, #059669 100%){% endblock accent %}
{% block title %}Acesso Liberado!{% endblock title %}
{% block content %}
      <h2>Olá, {{ nome }}!</h2>
      <p>Suas credenciais de acesso IPTV estão prontas!</p>
      <div class="info-box">
        <h3>Suas Credenciais:</h3>
        <pre class="credentials">{{ credenciais }}</pre>
      </div>
      <div class="warning">
        <strong>Importante:</strong>
        <ul>
          <li>Não compartilhe suas credenciais com terceiros</li>
          <li>Seu acesso é válido por {{ duracao_dias }} dias</li>
{% if data_expiracao %}
          <li>Data de expiração: {{ data_expiracao }}</li>
{% endif %}
        </ul>
      </div>
      <p>Em caso de dúvidas, entre em contato conosco.</p>
{% endblock content %}
"#;

const EXPIRATION_WARNING_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block accent %}linear-gradient(135deg, #f59e0b 0%, #d97706 100%){% endblock accent %}
{% block title %}Seu acesso está expirando{% endblock title %}
{% block content %}
      <h2>Olá, {{ nome }}!</h2>
      <p>Seu plano <strong>{{ plano_nome }}</strong> expira em <strong>{{ dias_restantes }} dias</strong>.</p>
{% if data_expiracao %}
      <p>Data de expiração: {{ data_expiracao }}</p>
{% endif %}
      <p>Renove agora para não perder o acesso aos seus conteúdos favoritos!</p>
      <a href="{{ renovar_url }}" class="button">Renovar Agora</a>
{% endblock content %}
"#;

const ADMIN_PAYMENT_ALERT_TEMPLATE: &str = r#"{% extends "base.html" %}
{% block title %}Novo Pagamento{% endblock title %}
{% block content %}
      <h2>Pagamento Confirmado</h2>
      <div class="info-box">
        <p><strong>Cliente:</strong> {{ nome }}</p>
        <p><strong>E-mail:</strong> {{ email }}</p>
        <p><strong>Telefone:</strong> {{ telefone }}</p>
      </div>
      <div class="info-box">
        <p><strong>Plano:</strong> {{ plano_nome }}</p>
        <p><strong>Duração:</strong> {{ duracao_dias }} dias</p>
        <p><strong>Valor:</strong> R$ {{ valor }}</p>
        <p><strong>Pedido:</strong> #{{ pedido_id }}</p>
      </div>
      <div class="warning">
        <strong>Ação Necessária:</strong>
        <p>Entre em contato com o fornecedor IPTV e envie as credenciais para o cliente.</p>
      </div>
{% endblock content %}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessStatus, PaymentStatus, Role, UserStatus};
    use chrono::TimeZone;
    use uuid::Uuid;

    fn fixtures() -> (User, Order, Plan) {
        let user = User {
            id: Uuid::new_v4(),
            email: "ana@example.com".to_string(),
            nome_completo: "Ana <script>alert(1)</script>".to_string(),
            telefone: None,
            status: UserStatus::Active,
            role: Role::Customer,
            created_at: None,
            updated_at: None,
        };
        let plan = Plan {
            id: Uuid::new_v4(),
            nome: "Mensal".to_string(),
            descricao: None,
            preco: 29.9,
            duracao_dias: 30,
            recursos: None,
            ativo: true,
            created_at: None,
        };
        let order = Order {
            id: Uuid::new_v4(),
            usuario_id: user.id,
            plano_id: plan.id,
            valor: 29.9,
            status_pagamento: PaymentStatus::Paid,
            status_acesso: AccessStatus::Active,
            mp_preference_id: None,
            mp_payment_id: None,
            mp_status: None,
            data_pagamento: None,
            data_expiracao: Some(Utc.with_ymd_and_hms(2030, 5, 31, 12, 0, 0).unwrap()),
            observacoes_admin: None,
            created_at: None,
            updated_at: None,
        };
        (user, order, plan)
    }

    #[test]
    fn user_values_are_escaped() {
        let templates = EmailTemplates::new().unwrap();
        let (user, order, plan) = fixtures();

        let email = templates.payment_confirmed(&user, &order, &plan).unwrap();
        assert!(!email.html.contains("<script>"));
        assert!(email.html.contains("&lt;script&gt;"));
        assert!(email.html.contains("R$ 29,90"));
    }

    #[test]
    fn credentials_are_kept_verbatim_but_escaped() {
        let templates = EmailTemplates::new().unwrap();
        let (user, order, plan) = fixtures();

        let email = templates
            .credentials(&user, &order, &plan, "user: ana\npass: <b>x</b>")
            .unwrap();
        assert!(email.html.contains("user: ana\npass: &lt;b&gt;x&lt;&#x2F;b&gt;"));
        assert!(email.html.contains("31/05/2030"));
    }

    #[test]
    fn expiration_subject_names_days_left() {
        let templates = EmailTemplates::new().unwrap();
        let (user, order, plan) = fixtures();

        let email = templates
            .expiration_warning(&user, &order, &plan, 3, "https://app.example.com/planos")
            .unwrap();
        assert_eq!(email.subject, "Seu acesso IPTV expira em 3 dias");
        assert!(email.html.contains("https:&#x2F;&#x2F;app.example.com&#x2F;planos"));
    }
}
