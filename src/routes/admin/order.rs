use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{get, post, put, web, HttpResponse, Result};
use chrono::{Duration, Utc};
use serde_json::{json, Map};
use uuid::Uuid;

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::{AccessStatus, PaymentStatus};
use crate::routes::order::plans_of;
use crate::services::Notifier;
use crate::views;

#[tracing::instrument(name = "Admin list orders.", skip(baas))]
#[get("")]
pub async fn order_list_handler(
    filter: web::Query<forms::admin::OrderFilter>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();
    let orders = db::order::list(baas, filter.status_pagamento, filter.status_acesso)
        .await
        .map_err(ApiError::log_internal("Erro ao buscar pedidos"))?;

    let mut customer_ids: Vec<Uuid> = orders.iter().map(|o| o.usuario_id).collect();
    customer_ids.sort();
    customer_ids.dedup();

    let (plans, customers) =
        tokio::try_join!(plans_of(baas, &orders), db::user::fetch_many(baas, &customer_ids))?;
    let customers: HashMap<Uuid, _> = customers.into_iter().map(|u| (u.id, u)).collect();

    let orders = orders
        .into_iter()
        .map(|order| {
            let customer = customers.get(&order.usuario_id);
            let plan = plans.get(&order.plano_id);
            views::order::Admin::new(order, customer, plan)
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument(name = "Admin update order.", skip(baas))]
#[put("/{id}")]
pub async fn order_update_handler(
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::admin::OrderUpdate>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    forms::validate(&*form)?;
    let id = path.into_inner().0;

    let order = db::order::update(baas.get_ref().as_ref(), &id, form.into_inner().into_patch())
        .await
        .map_err(ApiError::log_internal("Erro ao atualizar pedido"))?
        .ok_or_else(|| ApiError::not_found("Pedido não encontrado"))?;

    Ok(HttpResponse::Ok().json(order))
}

/// Activate a paid order and email its IPTV credentials to the customer
#[tracing::instrument(name = "Admin deliver credentials.", skip(form, baas, notifier))]
#[post("/{id}/credenciais")]
pub async fn order_credentials_handler(
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::admin::Credentials>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, ApiError> {
    form.check_required()?;
    forms::validate(&*form)?;
    let baas = baas.get_ref().as_ref();
    let id = path.into_inner().0;

    let order = db::order::fetch(baas, &id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pedido não encontrado"))?;
    if order.status_pagamento != PaymentStatus::Paid {
        return Err(ApiError::bad_request("Pedido ainda não foi pago"));
    }

    let (plan, customer) = tokio::try_join!(
        db::plan::fetch(baas, &order.plano_id, false),
        db::user::fetch(baas, &order.usuario_id),
    )?;
    let plan = plan.ok_or_else(|| ApiError::not_found("Plano não encontrado"))?;
    let customer = customer.ok_or_else(|| ApiError::not_found("Usuário não encontrado"))?;

    let expires_at = Duration::try_days(plan.duracao_dias as i64)
        .and_then(|days| Utc::now().checked_add_signed(days))
        .ok_or_else(|| ApiError::bad_request("Duração do plano inválida"))?;

    let mut patch = Map::new();
    patch.insert("status_acesso".to_string(), json!(AccessStatus::Active));
    patch.insert("data_expiracao".to_string(), json!(expires_at));
    let order = db::order::update(baas, &order.id, patch)
        .await
        .map_err(ApiError::log_internal("Erro ao atualizar pedido"))?
        .ok_or_else(|| ApiError::not_found("Pedido não encontrado"))?;

    notifier
        .credentials_delivered(&customer, &order, &plan, form.credenciais.trim())
        .await;

    tracing::info!("Access of order {} activated", order.id);
    Ok(HttpResponse::Ok().json(order))
}
