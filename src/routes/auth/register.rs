use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Result};
use serde_json::json;

use crate::connectors::{BaasConnector, ConnectorError};
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::Role;
use crate::services::Notifier;
use crate::views;

#[tracing::instrument(name = "Register user.", skip_all)]
#[post("/register")]
pub async fn register_handler(
    form: web::Json<forms::auth::Register>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, ApiError> {
    form.check_required()?;
    forms::validate(&*form)?;

    let baas = baas.get_ref().as_ref();
    let email = form.email.trim();

    let identity = baas
        .create_auth_user(email, &form.senha)
        .await
        .map_err(|err| match err {
            // e.g. the address is already registered
            ConnectorError::Rejected(msg) => {
                tracing::info!("Sign-up rejected for {}: {}", email, msg);
                ApiError::bad_request(msg)
            }
            err => ApiError::from(err),
        })?;

    let telefone = form.telefone();
    let mut user = match db::user::insert(
        baas,
        &identity.id,
        email,
        form.nome_completo.trim(),
        telefone.as_deref(),
    )
    .await
    {
        Ok(user) => user,
        Err(err) => {
            tracing::error!("Failed to create profile for {}: {}", identity.id, err);
            if let Err(err) = baas.delete_auth_user(&identity.id).await {
                tracing::error!("Failed to remove orphan identity {}: {}", identity.id, err);
            }
            return Err(ApiError::bad_request("Erro ao criar usuário"));
        }
    };

    if let Err(err) = db::user::insert_role(baas, &user.id, Role::Customer).await {
        tracing::error!("Failed to store role of {}: {}", user.id, err);
    }
    user.role = Role::Customer;

    notifier.welcome(&user).await;

    Ok(HttpResponse::Created().json(json!({
        "message": "Usuário criado com sucesso",
        "user": views::user::Account::new(&user),
    })))
}
