use std::sync::Arc;

use actix_web::{get, post, put, web, HttpResponse, Result};
use uuid::Uuid;

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;

#[tracing::instrument(name = "Admin list plans.", skip(baas))]
#[get("")]
pub async fn plan_list_handler(
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let plans = db::plan::list_all(baas.get_ref().as_ref())
        .await
        .map_err(ApiError::log_internal("Erro ao buscar planos"))?;

    Ok(HttpResponse::Ok().json(plans))
}

#[tracing::instrument(name = "Admin create plan.", skip(baas))]
#[post("")]
pub async fn plan_add_handler(
    form: web::Json<forms::admin::NewPlan>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    forms::validate(&*form)?;

    let plan = db::plan::insert(baas.get_ref().as_ref(), form.into_inner().into_row())
        .await
        .map_err(ApiError::log_internal("Erro ao criar plano"))?;

    tracing::info!("Plan {} created", plan.id);
    Ok(HttpResponse::Created().json(plan))
}

#[tracing::instrument(name = "Admin update plan.", skip(baas))]
#[put("/{id}")]
pub async fn plan_update_handler(
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::admin::PlanUpdate>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    forms::validate(&*form)?;
    let id = path.into_inner().0;
    let patch = form.into_inner().into_patch()?;

    let plan = db::plan::update(baas.get_ref().as_ref(), &id, patch)
        .await
        .map_err(ApiError::log_internal("Erro ao atualizar plano"))?
        .ok_or_else(|| ApiError::not_found("Plano não encontrado"))?;

    Ok(HttpResponse::Ok().json(plan))
}
