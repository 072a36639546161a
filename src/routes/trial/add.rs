use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Result};
use serde_json::json;

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::{TrialStatus, User};

#[tracing::instrument(name = "Request free trial.", skip_all, fields(user_id = %user.id))]
#[post("")]
pub async fn add_handler(
    user: web::ReqData<Arc<User>>,
    form: Option<web::Json<forms::trial::NewTrial>>,
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let form = form.map(web::Json::into_inner).unwrap_or_default();
    forms::validate(&form)?;
    let baas = baas.get_ref().as_ref();

    if let Some(open) = db::trial::find_open(baas, &user.id).await? {
        tracing::info!("User already holds trial request {} ({:?})", open.id, open.status);
        let msg = match open.status {
            TrialStatus::Pending => "Você já possui uma solicitação pendente",
            _ => "Você já possui um teste aprovado",
        };
        return Err(ApiError::bad_request(msg));
    }

    let observacoes = form.observacoes();
    let trial = db::trial::insert(baas, &user.id, observacoes.as_deref())
        .await
        .map_err(ApiError::log_internal("Erro ao criar solicitação"))?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Solicitação de teste grátis criada com sucesso",
        "solicitacao": trial,
    })))
}
