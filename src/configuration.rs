use crate::connectors::ConnectorConfig;
use serde;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub app_port: u16,
    pub app_host: String,
    /// Public URL of the customer-facing frontend, used for gateway back URLs and email links
    pub frontend_url: String,
    /// Public URL of this service, used as the gateway notification URL
    pub backend_url: String,
    #[serde(default = "Settings::default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default)]
    pub connectors: ConnectorConfig,
    #[serde(default)]
    pub expiration: ExpirationSettings,
}

impl Settings {
    fn default_allowed_origins() -> Vec<String> {
        vec![
            "http://localhost:5173".to_string(),
            "http://localhost:8080".to_string(),
        ]
    }

    pub fn webhook_url(&self) -> String {
        format!(
            "{}/api/webhooks/mercadopago",
            self.backend_url.trim_end_matches('/')
        )
    }

    pub fn frontend_link(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.frontend_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Settings of the periodic expiration-warning sweep
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ExpirationSettings {
    pub enabled: bool,
    /// Seconds between two sweeps
    pub interval_secs: u64,
    /// Warning window used when `configuracoes.dias_aviso_expiracao` is absent
    pub default_warning_days: i64,
}

impl Default for ExpirationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 86_400,
            default_warning_days: 7,
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let settings = config::Config::builder()
        // configuration.yaml in the working directory, if present
        .add_source(config::File::with_name("configuration").required(false))
        // APP__CONNECTORS__BAAS__BASE_URL=... style overrides
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    let mut config: Settings = settings.try_deserialize()?;

    // Secrets never live in the yaml file
    config.connectors.load_secrets_from_env();

    Ok(config)
}
