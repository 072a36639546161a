use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Result};
use serde_json::json;

use crate::connectors::{BaasConnector, ConnectorError};
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::Role;
use crate::views;

#[tracing::instrument(name = "Sign in.", skip_all)]
#[post("/login")]
pub async fn login_handler(
    form: web::Json<forms::auth::Login>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    form.check_required()?;
    forms::validate(&*form)?;

    let baas = baas.get_ref().as_ref();
    let email = form.email.trim();

    let session = baas
        .sign_in(email, &form.senha)
        .await
        .map_err(|err| match err {
            ConnectorError::Unauthorized(_) => ApiError::unauthorized("Credenciais inválidas"),
            err => ApiError::from(err),
        })?;

    let user = match db::user::fetch_account(baas, &session.user.id).await? {
        Some(user) => user,
        None => {
            // identity created outside the API: give it a profile
            tracing::info!("Creating missing profile for {}", session.user.id);
            let mut user =
                db::user::insert(baas, &session.user.id, email, &form.default_name(), None)
                    .await
                    .map_err(ApiError::log_internal("Erro ao buscar dados do usuário"))?;
            user.role = Role::Customer;
            user
        }
    };

    tracing::info!(user_id = %user.id, "signed in");
    Ok(HttpResponse::Ok().json(json!({
        "token": session.access_token,
        "user": views::user::Account::for_session(&user),
    })))
}
