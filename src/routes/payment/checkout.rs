use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Result};

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::{Order, PaymentStatus, Plan, User};
use crate::services::Checkout;

/// Unpaid order of the caller together with its plan
async fn payable_order(
    baas: &dyn BaasConnector,
    order_id: &uuid::Uuid,
    user: &User,
) -> Result<(Order, Plan), ApiError> {
    let order = db::order::fetch_owned(baas, order_id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pedido não encontrado"))?;

    if order.status_pagamento != PaymentStatus::AwaitingPayment {
        return Err(ApiError::bad_request("Pedido já processado"));
    }

    let plan = db::plan::fetch(baas, &order.plano_id, false)
        .await?
        .ok_or_else(|| ApiError::not_found("Plano não encontrado"))?;

    Ok((order, plan))
}

#[tracing::instrument(name = "Create payment preference.", skip_all, fields(user_id = %user.id, pedido_id = %form.pedido_id))]
#[post("/criar-preferencia")]
pub async fn preference_handler(
    user: web::ReqData<Arc<User>>,
    form: web::Json<forms::order::Payment>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    checkout: web::Data<Checkout>,
) -> Result<HttpResponse, ApiError> {
    let (order, plan) = payable_order(baas.get_ref().as_ref(), &form.pedido_id, &user).await?;

    let preference = checkout
        .create_preference(&order, &plan, &user)
        .await
        .map_err(ApiError::log_internal("Erro ao criar preferência de pagamento"))?;

    Ok(HttpResponse::Ok().json(preference))
}

#[tracing::instrument(name = "Create PIX charge.", skip_all, fields(user_id = %user.id, pedido_id = %form.pedido_id))]
#[post("/criar-pix")]
pub async fn pix_handler(
    user: web::ReqData<Arc<User>>,
    form: web::Json<forms::order::Payment>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    checkout: web::Data<Checkout>,
) -> Result<HttpResponse, ApiError> {
    let (order, plan) = payable_order(baas.get_ref().as_ref(), &form.pedido_id, &user).await?;

    let charge = checkout
        .create_pix(&order, &plan, &user)
        .await
        .map_err(ApiError::log_internal("Erro ao criar pagamento PIX"))?;

    Ok(HttpResponse::Ok().json(charge))
}
