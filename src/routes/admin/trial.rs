use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{get, put, web, HttpResponse, Result};
use serde_json::json;
use uuid::Uuid;

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::{TrialStatus, User};
use crate::services::Notifier;
use crate::views;

#[tracing::instrument(name = "Admin list trial requests.", skip(baas))]
#[get("")]
pub async fn trial_list_handler(
    filter: web::Query<forms::admin::TrialFilter>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();
    let trials = db::trial::list(baas, filter.status)
        .await
        .map_err(ApiError::log_internal("Erro ao buscar solicitações"))?;

    let mut requester_ids: Vec<Uuid> = trials.iter().map(|t| t.usuario_id).collect();
    requester_ids.sort();
    requester_ids.dedup();
    let requesters: HashMap<Uuid, User> = db::user::fetch_many(baas, &requester_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let trials = trials
        .into_iter()
        .map(|trial| {
            let requester = requesters.get(&trial.usuario_id);
            views::trial::Admin::new(trial, requester)
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(trials))
}

#[tracing::instrument(name = "Admin decide trial request.", skip_all, fields(admin_id = %admin.id))]
#[put("/{id}")]
pub async fn trial_decide_handler(
    admin: web::ReqData<Arc<User>>,
    path: web::Path<(Uuid,)>,
    form: web::Json<forms::trial::Decision>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    notifier: web::Data<Notifier>,
) -> Result<HttpResponse, ApiError> {
    let status = form
        .status()
        .ok_or_else(|| ApiError::bad_request("Status inválido"))?;
    forms::validate(&*form)?;
    let baas = baas.get_ref().as_ref();
    let id = path.into_inner().0;

    let observacoes_admin = forms::non_blank(form.observacoes_admin.clone());
    let trial = match db::trial::decide(baas, &id, status, observacoes_admin.as_deref(), &admin.id)
        .await
        .map_err(ApiError::log_internal("Erro ao processar solicitação"))?
    {
        Some(trial) => trial,
        // nothing matched: either unknown or already decided
        None => {
            return match db::trial::fetch(baas, &id).await? {
                Some(current) => {
                    tracing::info!("Trial {} already {}", id, current.status.as_str());
                    Err(ApiError::bad_request("Solicitação já processada"))
                }
                None => Err(ApiError::not_found("Solicitação não encontrada")),
            };
        }
    };

    notifier.trial_decided(&trial).await;

    let verb = match status {
        TrialStatus::Approved => "aprovada",
        _ => "rejeitada",
    };
    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Solicitação {} com sucesso", verb),
        "solicitacao": trial,
    })))
}
