use std::sync::Arc;

use actix_web::{get, put, web, HttpResponse, Result};
use uuid::Uuid;

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::views;

#[tracing::instrument(name = "Admin list users.", skip(baas))]
#[get("")]
pub async fn user_list_handler(
    filter: web::Query<forms::admin::UserFilter>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let users = db::user::list(baas.get_ref().as_ref(), filter.status, filter.search.as_deref())
        .await
        .map_err(ApiError::log_internal("Erro ao buscar usuários"))?;

    Ok(HttpResponse::Ok().json(users))
}

#[tracing::instrument(name = "Admin get user.", skip(baas))]
#[get("/{id}")]
pub async fn user_item_handler(
    path: web::Path<(Uuid,)>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();
    let id = path.into_inner().0;

    let user = db::user::fetch(baas, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    let (pedidos, solicitacoes_teste) = tokio::try_join!(
        db::order::list_for_user(baas, &id),
        db::trial::list_for_user(baas, &id),
    )?;

    Ok(HttpResponse::Ok().json(views::user::AdminDetail {
        user,
        pedidos,
        solicitacoes_teste,
    }))
}

#[tracing::instrument(name = "Admin update user.", skip(baas))]
#[put("/{id}")]
pub async fn user_update_handler(
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::admin::UserUpdate>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    forms::validate(&*form)?;
    let id = path.into_inner().0;

    let user = db::user::update(baas.get_ref().as_ref(), &id, form.into_inner().into_patch())
        .await
        .map_err(ApiError::log_internal("Erro ao atualizar usuário"))?
        .ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    Ok(HttpResponse::Ok().json(user))
}
