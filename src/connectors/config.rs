use serde::{Deserialize, Serialize};

/// Configuration for external service connectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorConfig {
    #[serde(default)]
    pub baas: BaasConfig,
    #[serde(default)]
    pub mercadopago: MercadoPagoConfig,
    #[serde(default)]
    pub email: EmailRelayConfig,
}

impl ConnectorConfig {
    /// Pull secrets from the process environment. Values already set are kept.
    pub fn load_secrets_from_env(&mut self) {
        if self.baas.service_key.is_none() {
            self.baas.service_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY").ok();
        }
        if self.mercadopago.access_token.is_none() {
            self.mercadopago.access_token = std::env::var("MP_ACCESS_TOKEN").ok();
        }
        if self.mercadopago.webhook_secret.is_none() {
            self.mercadopago.webhook_secret = std::env::var("MP_WEBHOOK_SECRET").ok();
        }
        if self.email.api_key.is_none() {
            self.email.api_key = std::env::var("EMAIL_API_KEY").ok();
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            baas: BaasConfig::default(),
            mercadopago: MercadoPagoConfig::default(),
            email: EmailRelayConfig::default(),
        }
    }
}

/// Backend-as-a-service connector configuration (auth + row API)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaasConfig {
    /// Project URL, e.g. https://xyz.supabase.co
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Service role key (from env: SUPABASE_SERVICE_ROLE_KEY)
    #[serde(skip)]
    pub service_key: Option<String>,
}

impl Default for BaasConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            timeout_secs: 10,
            service_key: None,
        }
    }
}

/// Mercado Pago connector configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MercadoPagoConfig {
    /// API base URL
    pub base_url: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
    /// Text shown on the payer's card statement
    #[serde(default = "MercadoPagoConfig::default_statement_descriptor")]
    pub statement_descriptor: String,
    /// Lifetime of a checkout preference in hours
    #[serde(default = "MercadoPagoConfig::default_preference_ttl_hours")]
    pub preference_ttl_hours: i64,
    /// Refuse to start without a webhook secret
    #[serde(default)]
    pub require_signature: bool,
    /// Access token (from env: MP_ACCESS_TOKEN)
    #[serde(skip)]
    pub access_token: Option<String>,
    /// Webhook signing secret (from env: MP_WEBHOOK_SECRET)
    #[serde(skip)]
    pub webhook_secret: Option<String>,
}

impl MercadoPagoConfig {
    fn default_statement_descriptor() -> String {
        "IPTV REVENDA".to_string()
    }

    const fn default_preference_ttl_hours() -> i64 {
        24
    }
}

impl Default for MercadoPagoConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.mercadopago.com".to_string(),
            timeout_secs: 15,
            statement_descriptor: Self::default_statement_descriptor(),
            preference_ttl_hours: Self::default_preference_ttl_hours(),
            require_signature: false,
            access_token: None,
            webhook_secret: None,
        }
    }
}

/// Transactional email relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRelayConfig {
    /// Enable/disable email delivery; disabled relays only log
    pub enabled: bool,
    /// Relay endpoint accepting `{from, to, subject, html}`
    pub base_url: String,
    pub timeout_secs: u64,
    /// Sender address
    pub from_address: String,
    /// Sender display name
    #[serde(default = "EmailRelayConfig::default_from_name")]
    pub from_name: String,
    /// Admin address used when `configuracoes.notificacao_email_admin` is empty
    #[serde(default)]
    pub admin_address: Option<String>,
    /// API key (from env: EMAIL_API_KEY)
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl EmailRelayConfig {
    fn default_from_name() -> String {
        "IPTV Revenda".to_string()
    }
}

impl Default for EmailRelayConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:8025/api/send".to_string(),
            timeout_secs: 10,
            from_address: "no-reply@localhost".to_string(),
            from_name: Self::default_from_name(),
            admin_address: None,
            api_key: None,
        }
    }
}
