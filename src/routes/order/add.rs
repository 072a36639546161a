use std::sync::Arc;

use actix_web::{post, web, HttpResponse, Result};

use crate::connectors::BaasConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::models::User;
use crate::services::Checkout;
use crate::views;

#[tracing::instrument(name = "Create order.", skip_all, fields(user_id = %user.id, plano_id = %form.plano_id))]
#[post("")]
pub async fn add_handler(
    user: web::ReqData<Arc<User>>,
    form: web::Json<forms::order::NewOrder>,
    baas: web::Data<Arc<dyn BaasConnector>>,
    checkout: web::Data<Checkout>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();

    let plan = db::plan::fetch(baas, &form.plano_id, true)
        .await?
        .ok_or_else(|| ApiError::not_found("Plano não encontrado"))?;

    let mut order = db::order::insert(baas, &user.id, &plan)
        .await
        .map_err(ApiError::log_internal("Erro ao criar pedido"))?;

    let preference = checkout.create_preference(&order, &plan, &user).await?;
    order.mp_preference_id = Some(preference.id.clone());

    Ok(HttpResponse::Created().json(views::order::Created {
        order,
        plano_nome: plan.nome,
        payment_link: preference.init_point,
    }))
}
