use std::sync::Arc;

use actix_web::{put, web, HttpResponse, Result};
use serde_json::json;

use crate::connectors::{BaasConnector, ConnectorError};
use crate::forms;
use crate::helpers::ApiError;
use crate::models::User;

#[tracing::instrument(name = "Change password.", skip_all, fields(user_id = %user.id))]
#[put("/change-password")]
pub async fn change_password_handler(
    user: web::ReqData<Arc<User>>,
    form: web::Json<forms::auth::ChangePassword>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    form.check_required()?;
    forms::validate(&*form)?;

    // the current password is proven by signing in with it
    match baas.sign_in(&user.email, &form.senha_atual).await {
        Ok(_) => {}
        Err(ConnectorError::Unauthorized(_)) => {
            return Err(ApiError::bad_request("Senha atual incorreta"));
        }
        Err(err) => return Err(err.into()),
    }

    baas.update_auth_password(&user.id, &form.nova_senha)
        .await
        .map_err(ApiError::log_internal("Erro ao alterar senha"))?;

    tracing::info!("password changed");
    Ok(HttpResponse::Ok().json(json!({ "message": "Senha alterada com sucesso" })))
}
