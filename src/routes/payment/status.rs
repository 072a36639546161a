use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Result};

use crate::connectors::BaasConnector;
use crate::db;
use crate::helpers::ApiError;
use crate::models::User;
use crate::services::Checkout;

/// Live gateway status of a payment belonging to one of the caller's orders
#[tracing::instrument(name = "Payment status.", skip_all, fields(user_id = %user.id))]
#[get("/status/{payment_id}")]
pub async fn status_handler(
    user: web::ReqData<Arc<User>>,
    path: web::Path<(String,)>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    checkout: web::Data<Checkout>,
) -> Result<HttpResponse, ApiError> {
    let payment_id = path.into_inner().0;

    db::order::fetch_by_payment(baas.get_ref().as_ref(), &payment_id, &user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pagamento não encontrado"))?;

    let payment = checkout
        .gateway()
        .get_payment(&payment_id)
        .await
        .map_err(ApiError::log_internal("Erro ao consultar status"))?;

    Ok(HttpResponse::Ok().json(payment))
}
