use serde_json::Value;
use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError, Query};
use crate::db::{decode, decode_all, decode_first};
use crate::models::Plan;

const TABLE: &str = "planos";

/// Catalog shown to customers: active plans, cheapest first
pub async fn list_active(baas: &dyn BaasConnector) -> Result<Vec<Plan>, ConnectorError> {
    let query = Query::new().eq("ativo", true).order_by("preco", true);
    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

pub async fn list_all(baas: &dyn BaasConnector) -> Result<Vec<Plan>, ConnectorError> {
    let rows = baas
        .select(TABLE, &Query::new().order_by("created_at", false))
        .await?;
    decode_all(TABLE, rows)
}

pub async fn fetch(
    baas: &dyn BaasConnector,
    id: &Uuid,
    active_only: bool,
) -> Result<Option<Plan>, ConnectorError> {
    let mut query = Query::new().eq("id", id);
    if active_only {
        query = query.eq("ativo", true);
    }
    let rows = baas.select(TABLE, &query.limit(1)).await?;
    decode_first(TABLE, rows)
}

pub async fn fetch_many(
    baas: &dyn BaasConnector,
    ids: &[Uuid],
) -> Result<Vec<Plan>, ConnectorError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = baas.select(TABLE, &Query::new().is_in("id", ids)).await?;
    decode_all(TABLE, rows)
}

pub async fn insert(baas: &dyn BaasConnector, row: Value) -> Result<Plan, ConnectorError> {
    let row = baas.insert(TABLE, row).await?;
    decode(TABLE, row)
}

pub async fn update(
    baas: &dyn BaasConnector,
    id: &Uuid,
    patch: Value,
) -> Result<Option<Plan>, ConnectorError> {
    let rows = baas.update(TABLE, &Query::new().eq("id", id), patch).await?;
    decode_first(TABLE, rows)
}
