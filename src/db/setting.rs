use serde_json::Value;

use crate::connectors::{BaasConnector, ConnectorError, Query};

const TABLE: &str = "configuracoes";

pub const ADMIN_EMAIL: &str = "notificacao_email_admin";
pub const WARNING_DAYS: &str = "dias_aviso_expiracao";

/// Raw `valor` of a setting; blank values count as absent
pub async fn fetch(baas: &dyn BaasConnector, key: &str) -> Result<Option<String>, ConnectorError> {
    let rows = baas
        .select(TABLE, &Query::new().eq("chave", key).limit(1))
        .await?;

    Ok(rows
        .into_iter()
        .next()
        .and_then(|mut row| row.get_mut("valor").map(Value::take))
        .and_then(|value| match value {
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}
