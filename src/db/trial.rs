use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError, Query};
use crate::db::{decode, decode_all, decode_first};
use crate::models::{TrialRequest, TrialStatus};

const TABLE: &str = "solicitacoes_teste";

/// A pending or approved request of the user, if any
pub async fn find_open(
    baas: &dyn BaasConnector,
    user_id: &Uuid,
) -> Result<Option<TrialRequest>, ConnectorError> {
    let query = Query::new()
        .eq("usuario_id", user_id)
        .is_in("status", TrialStatus::BLOCKING.iter().map(|s| s.as_str()))
        .order_by("created_at", false)
        .limit(1);

    let rows = baas.select(TABLE, &query).await?;
    decode_first(TABLE, rows)
}

pub async fn insert(
    baas: &dyn BaasConnector,
    user_id: &Uuid,
    observacoes: Option<&str>,
) -> Result<TrialRequest, ConnectorError> {
    let row = baas
        .insert(
            TABLE,
            json!({
                "usuario_id": user_id,
                "observacoes": observacoes,
                "status": TrialStatus::Pending,
            }),
        )
        .await?;
    decode(TABLE, row)
}

pub async fn fetch(
    baas: &dyn BaasConnector,
    id: &Uuid,
) -> Result<Option<TrialRequest>, ConnectorError> {
    let rows = baas
        .select(TABLE, &Query::new().eq("id", id).limit(1))
        .await?;
    decode_first(TABLE, rows)
}

pub async fn list_for_user(
    baas: &dyn BaasConnector,
    user_id: &Uuid,
) -> Result<Vec<TrialRequest>, ConnectorError> {
    let query = Query::new()
        .eq("usuario_id", user_id)
        .order_by("created_at", false);
    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

pub async fn list(
    baas: &dyn BaasConnector,
    status: Option<TrialStatus>,
) -> Result<Vec<TrialRequest>, ConnectorError> {
    let mut query = Query::new().order_by("created_at", false);
    if let Some(status) = status {
        query = query.eq("status", status.as_str());
    }
    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

/// Record an admin decision, but only while the request is still pending
pub async fn decide(
    baas: &dyn BaasConnector,
    id: &Uuid,
    status: TrialStatus,
    observacoes_admin: Option<&str>,
    admin_id: &Uuid,
) -> Result<Option<TrialRequest>, ConnectorError> {
    let now = Utc::now();
    let patch = json!({
        "status": status,
        "observacoes_admin": observacoes_admin,
        "aprovado_por": admin_id,
        "aprovado_em": now,
        "updated_at": now,
    });

    let query = Query::new()
        .eq("id", id)
        .eq("status", TrialStatus::Pending.as_str());
    let rows: Vec<Value> = baas.update(TABLE, &query, patch).await?;
    decode_first(TABLE, rows)
}

pub async fn count(
    baas: &dyn BaasConnector,
    status: Option<TrialStatus>,
) -> Result<u64, ConnectorError> {
    let mut query = Query::new();
    if let Some(status) = status {
        query = query.eq("status", status.as_str());
    }
    baas.count(TABLE, &query).await
}
