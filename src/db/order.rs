use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError, Query};
use crate::db::{decode, decode_all, decode_first};
use crate::models::{AccessStatus, Order, PaymentStatus, Plan};

const TABLE: &str = "pedidos";

/// New order for `plan`, priced at the plan's current price
pub async fn insert(
    baas: &dyn BaasConnector,
    user_id: &Uuid,
    plan: &Plan,
) -> Result<Order, ConnectorError> {
    let row = baas
        .insert(
            TABLE,
            json!({
                "usuario_id": user_id,
                "plano_id": plan.id,
                "valor": plan.preco,
                "status_pagamento": PaymentStatus::AwaitingPayment,
                "status_acesso": AccessStatus::Inactive,
            }),
        )
        .await?;

    let order: Order = decode(TABLE, row)?;
    tracing::info!("Order {} has been saved for user {}", order.id, user_id);
    Ok(order)
}

pub async fn fetch(baas: &dyn BaasConnector, id: &Uuid) -> Result<Option<Order>, ConnectorError> {
    let rows = baas
        .select(TABLE, &Query::new().eq("id", id).limit(1))
        .await?;
    decode_first(TABLE, rows)
}

/// Order `id` only if it belongs to `user_id`
pub async fn fetch_owned(
    baas: &dyn BaasConnector,
    id: &Uuid,
    user_id: &Uuid,
) -> Result<Option<Order>, ConnectorError> {
    let query = Query::new().eq("id", id).eq("usuario_id", user_id).limit(1);
    let rows = baas.select(TABLE, &query).await?;
    decode_first(TABLE, rows)
}

/// Order of `user_id` carrying the gateway payment `payment_id`
pub async fn fetch_by_payment(
    baas: &dyn BaasConnector,
    payment_id: &str,
    user_id: &Uuid,
) -> Result<Option<Order>, ConnectorError> {
    let query = Query::new()
        .eq("mp_payment_id", payment_id)
        .eq("usuario_id", user_id)
        .limit(1);
    let rows = baas.select(TABLE, &query).await?;
    decode_first(TABLE, rows)
}

pub async fn list_for_user(
    baas: &dyn BaasConnector,
    user_id: &Uuid,
) -> Result<Vec<Order>, ConnectorError> {
    let query = Query::new()
        .eq("usuario_id", user_id)
        .order_by("created_at", false);
    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

/// All orders, newest first
pub async fn list(
    baas: &dyn BaasConnector,
    payment_status: Option<PaymentStatus>,
    access_status: Option<AccessStatus>,
) -> Result<Vec<Order>, ConnectorError> {
    let mut query = Query::new().order_by("created_at", false);
    if let Some(status) = payment_status {
        query = query.eq("status_pagamento", status.as_str());
    }
    if let Some(status) = access_status {
        query = query.eq("status_acesso", status.as_str());
    }

    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

/// Active orders whose access ends within `[from, to]`
pub async fn list_expiring(
    baas: &dyn BaasConnector,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<Order>, ConnectorError> {
    let query = Query::new()
        .eq("status_acesso", AccessStatus::Active.as_str())
        .gte("data_expiracao", from.to_rfc3339())
        .lte("data_expiracao", to.to_rfc3339())
        .order_by("data_expiracao", true);

    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

/// Patch an order; `updated_at` is always refreshed
pub async fn update(
    baas: &dyn BaasConnector,
    id: &Uuid,
    mut patch: serde_json::Map<String, Value>,
) -> Result<Option<Order>, ConnectorError> {
    patch.insert("updated_at".to_string(), json!(Utc::now()));
    let rows = baas
        .update(TABLE, &Query::new().eq("id", id), Value::Object(patch))
        .await?;
    decode_first(TABLE, rows)
}

pub async fn count(
    baas: &dyn BaasConnector,
    payment_status: Option<PaymentStatus>,
) -> Result<u64, ConnectorError> {
    let mut query = Query::new();
    if let Some(status) = payment_status {
        query = query.eq("status_pagamento", status.as_str());
    }
    baas.count(TABLE, &query).await
}

/// Sum of `valor` over paid orders
pub async fn paid_revenue(baas: &dyn BaasConnector) -> Result<f64, ConnectorError> {
    let query = Query::new().eq("status_pagamento", PaymentStatus::Paid.as_str());
    let rows = baas.select(TABLE, &query).await?;

    Ok(rows
        .iter()
        .filter_map(|row| row.get("valor").and_then(Value::as_f64))
        .sum())
}
