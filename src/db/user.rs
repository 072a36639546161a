use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError, Query};
use crate::db::{decode, decode_all, decode_first};
use crate::models::{Role, User, UserStatus};

const TABLE: &str = "usuarios";
const ROLES: &str = "user_roles";

pub async fn fetch(baas: &dyn BaasConnector, id: &Uuid) -> Result<Option<User>, ConnectorError> {
    let rows = baas
        .select(TABLE, &Query::new().eq("id", id).limit(1))
        .await?;
    decode_first(TABLE, rows)
}

/// Role of a user; a missing `user_roles` row means customer
pub async fn fetch_role(baas: &dyn BaasConnector, id: &Uuid) -> Result<Role, ConnectorError> {
    let rows = baas
        .select(ROLES, &Query::new().eq("user_id", id).limit(1))
        .await?;

    Ok(rows
        .first()
        .and_then(|row| row.get("role"))
        .and_then(Value::as_str)
        .map(Role::parse)
        .unwrap_or_default())
}

/// Profile row together with its role
pub async fn fetch_account(
    baas: &dyn BaasConnector,
    id: &Uuid,
) -> Result<Option<User>, ConnectorError> {
    let (user, role) = tokio::try_join!(fetch(baas, id), fetch_role(baas, id))?;
    Ok(user.map(|user| User { role, ..user }))
}

pub async fn fetch_many(
    baas: &dyn BaasConnector,
    ids: &[Uuid],
) -> Result<Vec<User>, ConnectorError> {
    if ids.is_empty() {
        return Ok(vec![]);
    }
    let rows = baas.select(TABLE, &Query::new().is_in("id", ids)).await?;
    decode_all(TABLE, rows)
}

pub async fn insert(
    baas: &dyn BaasConnector,
    id: &Uuid,
    email: &str,
    nome_completo: &str,
    telefone: Option<&str>,
) -> Result<User, ConnectorError> {
    let row = baas
        .insert(
            TABLE,
            json!({
                "id": id,
                "email": email,
                "nome_completo": nome_completo,
                "telefone": telefone,
                "status": UserStatus::Active,
            }),
        )
        .await?;

    tracing::info!("User {} has been saved", id);
    decode(TABLE, row)
}

pub async fn insert_role(
    baas: &dyn BaasConnector,
    id: &Uuid,
    role: Role,
) -> Result<(), ConnectorError> {
    baas.insert(ROLES, json!({ "user_id": id, "role": role.as_str() }))
        .await
        .map(|_| ())
}

/// Patch a profile; `updated_at` is always refreshed
pub async fn update(
    baas: &dyn BaasConnector,
    id: &Uuid,
    mut patch: serde_json::Map<String, Value>,
) -> Result<Option<User>, ConnectorError> {
    patch.insert("updated_at".to_string(), json!(Utc::now()));
    let rows = baas
        .update(TABLE, &Query::new().eq("id", id), Value::Object(patch))
        .await?;
    decode_first(TABLE, rows)
}

/// Newest first, optionally filtered by status and a name/email search
pub async fn list(
    baas: &dyn BaasConnector,
    status: Option<UserStatus>,
    search: Option<&str>,
) -> Result<Vec<User>, ConnectorError> {
    let mut query = Query::new().order_by("created_at", false);
    if let Some(status) = status {
        query = query.eq("status", status.as_str());
    }
    if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
        query = query.search(&["nome_completo", "email"], term);
    }

    let rows = baas.select(TABLE, &query).await?;
    decode_all(TABLE, rows)
}

/// Any user holding the admin role
pub async fn first_admin_id(baas: &dyn BaasConnector) -> Result<Option<Uuid>, ConnectorError> {
    let rows = baas
        .select(
            ROLES,
            &Query::new().is_in("role", ["admin", "administrador"]).limit(1),
        )
        .await?;

    Ok(rows
        .first()
        .and_then(|row| row.get("user_id"))
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id).ok()))
}

pub async fn count(
    baas: &dyn BaasConnector,
    status: Option<UserStatus>,
) -> Result<u64, ConnectorError> {
    let mut query = Query::new();
    if let Some(status) = status {
        query = query.eq("status", status.as_str());
    }
    baas.count(TABLE, &query).await
}
