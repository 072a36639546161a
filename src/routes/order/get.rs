use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Result};
use uuid::Uuid;

use super::plans_of;
use crate::connectors::BaasConnector;
use crate::db;
use crate::helpers::ApiError;
use crate::models::User;
use crate::views;

#[tracing::instrument(name = "List own orders.", skip_all, fields(user_id = %user.id))]
#[get("")]
pub async fn list_handler(
    user: web::ReqData<Arc<User>>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();
    let orders = db::order::list_for_user(baas, &user.id)
        .await
        .map_err(ApiError::log_internal("Erro ao buscar pedidos"))?;
    let plans = plans_of(baas, &orders).await?;

    let orders = orders
        .into_iter()
        .map(|order| {
            let plan = plans.get(&order.plano_id);
            views::order::Summary::new(order, plan)
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument(name = "Get own order.", skip_all, fields(user_id = %user.id))]
#[get("/{id}")]
pub async fn item_handler(
    user: web::ReqData<Arc<User>>,
    path: web::Path<(Uuid,)>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();
    let id = path.into_inner().0;

    let order = db::order::fetch_owned(baas, &id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pedido não encontrado"))?;
    let plan = db::plan::fetch(baas, &order.plano_id, false).await?;

    Ok(HttpResponse::Ok().json(views::order::Detail::new(order, plan.as_ref())))
}
