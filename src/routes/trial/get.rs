use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Result};

use crate::connectors::BaasConnector;
use crate::db;
use crate::helpers::ApiError;
use crate::models::User;

#[tracing::instrument(name = "List own trial requests.", skip_all, fields(user_id = %user.id))]
#[get("")]
pub async fn list_handler(
    user: web::ReqData<Arc<User>>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let trials = db::trial::list_for_user(baas.get_ref().as_ref(), &user.id)
        .await
        .map_err(ApiError::log_internal("Erro ao buscar solicitações"))?;

    Ok(HttpResponse::Ok().json(trials))
}
