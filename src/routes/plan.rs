use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Result};

use crate::connectors::BaasConnector;
use crate::db;
use crate::helpers::ApiError;

/// Public catalog
#[tracing::instrument(name = "List active plans.", skip(baas))]
#[get("")]
pub async fn list_handler(baas: web::Data<Arc<dyn BaasConnector>>) -> Result<HttpResponse, ApiError> {
    let plans = db::plan::list_active(baas.get_ref().as_ref())
        .await
        .map_err(ApiError::log_internal("Erro ao buscar planos"))?;

    Ok(HttpResponse::Ok().json(plans))
}
