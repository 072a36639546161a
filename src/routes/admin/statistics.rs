use std::sync::Arc;

use actix_web::{get, web, HttpResponse, Result};

use crate::connectors::BaasConnector;
use crate::db;
use crate::helpers::ApiError;
use crate::models::{PaymentStatus, TrialStatus, UserStatus};
use crate::views::statistics::{Orders, Revenue, Statistics, Trials, Users};

#[tracing::instrument(name = "Admin statistics.", skip(baas))]
#[get("")]
pub async fn statistics_handler(
    baas: web::Data<Arc<dyn BaasConnector>>,
) -> Result<HttpResponse, ApiError> {
    let baas = baas.get_ref().as_ref();

    let (users, active_users, orders, paid_orders, pending_trials, revenue) = tokio::try_join!(
        db::user::count(baas, None),
        db::user::count(baas, Some(UserStatus::Active)),
        db::order::count(baas, None),
        db::order::count(baas, Some(PaymentStatus::Paid)),
        db::trial::count(baas, Some(TrialStatus::Pending)),
        db::order::paid_revenue(baas),
    )
    .map_err(ApiError::log_internal("Erro ao buscar estatísticas"))?;

    Ok(HttpResponse::Ok().json(Statistics {
        usuarios: Users {
            total: users,
            ativos: active_users,
        },
        pedidos: Orders {
            total: orders,
            pagos: paid_orders,
        },
        solicitacoes_teste: Trials {
            pendentes: pending_trials,
        },
        receita: Revenue { total: revenue },
    }))
}
