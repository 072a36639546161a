use serde_json::json;
use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError, Query};
use crate::db::{decode, decode_all, decode_first};
use crate::models::{NewNotification, Notification};

const TABLE: &str = "notificacoes";
const PAGE: usize = 50;

pub async fn insert(
    baas: &dyn BaasConnector,
    notification: &NewNotification,
) -> Result<Notification, ConnectorError> {
    let row = serde_json::to_value(notification)
        .map_err(|err| ConnectorError::Internal(err.to_string()))?;
    let row = baas.insert(TABLE, row).await?;
    decode(TABLE, row)
}

/// Latest notifications of a user
pub async fn list_for_user(
    baas: &dyn BaasConnector,
    user_id: &Uuid,
) -> Result<Vec<Notification>, ConnectorError> {
    let query = Query::new()
        .eq("usuario_id", user_id)
        .order_by("created_at", false)
        .limit(PAGE);
    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

pub async fn mark_read(
    baas: &dyn BaasConnector,
    id: &Uuid,
    user_id: &Uuid,
) -> Result<Option<Notification>, ConnectorError> {
    let query = Query::new().eq("id", id).eq("usuario_id", user_id);
    let rows = baas.update(TABLE, &query, json!({ "lida": true })).await?;
    decode_first(TABLE, rows)
}
