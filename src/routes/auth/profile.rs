use std::sync::Arc;

use actix_web::{put, web, HttpResponse, Result};
use serde_json::json;

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::User;
use crate::views;

#[tracing::instrument(name = "Update own profile.", skip_all, fields(user_id = %user.id))]
#[put("/profile")]
pub async fn profile_handler(
    user: web::ReqData<Arc<User>>,
    form: web::Json<forms::auth::ProfileUpdate>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    forms::validate(&*form)?;
    let patch = form.into_inner().into_patch()?;

    let mut updated = db::user::update(baas.get_ref().as_ref(), &user.id, patch)
        .await
        .map_err(ApiError::log_internal("Erro ao atualizar perfil"))?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;
    updated.role = user.role;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Perfil atualizado com sucesso",
        "user": views::user::Account::new(&updated),
    })))
}
