use std::sync::Arc;

use actix_web::{get, put, web, HttpResponse, Result};
use uuid::Uuid;

use crate::connectors::BaasConnector;
use crate::db;
use crate::helpers::ApiError;
use crate::models::User;

#[tracing::instrument(name = "List own notifications.", skip_all, fields(user_id = %user.id))]
#[get("")]
pub async fn list_handler(
    user: web::ReqData<Arc<User>>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let notifications = db::notification::list_for_user(baas.get_ref().as_ref(), &user.id)
        .await
        .map_err(ApiError::log_internal("Erro ao buscar notificações"))?;

    Ok(HttpResponse::Ok().json(notifications))
}

#[tracing::instrument(name = "Mark notification as read.", skip_all, fields(user_id = %user.id))]
#[put("/{id}/lida")]
pub async fn mark_read_handler(
    user: web::ReqData<Arc<User>>,
    path: web::Path<(Uuid,)>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner().0;
    let notification = db::notification::mark_read(baas.get_ref().as_ref(), &id, &user.id)
        .await
        .map_err(ApiError::log_internal("Erro ao marcar notificação como lida"))?
        .ok_or_else(|| ApiError::not_found("Notificação não encontrada"))?;

    Ok(HttpResponse::Ok().json(notification))
}
