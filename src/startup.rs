use crate::configuration::Settings;
use crate::connectors::{BaasConnector, EmailRelay, PaymentGatewayConnector};
use crate::health::HealthChecker;
use crate::helpers::ApiError;
use crate::middleware::authentication::Manager;
use crate::middleware::authorization::RequireRole;
use crate::routes;
use crate::services::{Checkout, EmailTemplates, ExpirationSweeper, Notifier, Reconciler};
use actix_cors::Cors;
use actix_web::{dev::Server, error, web, App, HttpServer};
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

/// External collaborators shared by every worker
#[derive(Clone)]
pub struct Connectors {
    pub baas: Arc<dyn BaasConnector>,
    pub gateway: Arc<dyn PaymentGatewayConnector>,
    pub mailer: Arc<dyn EmailRelay>,
}

fn io_error<E>(err: E) -> std::io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    std::io::Error::new(std::io::ErrorKind::Other, err)
}

/// Unsigned webhooks are refused at startup when signatures are mandatory
pub fn check_webhook_secret(settings: &Settings) -> Result<(), std::io::Error> {
    let mp = &settings.connectors.mercadopago;
    if mp.require_signature && mp.webhook_secret.is_none() {
        return Err(io_error(
            "require_signature is set but MP_WEBHOOK_SECRET is missing",
        ));
    }
    if mp.webhook_secret.is_none() {
        tracing::warn!("MP_WEBHOOK_SECRET not set, webhook signatures will not be verified");
    }
    Ok(())
}

fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return Cors::permissive();
    }

    allowed_origins.iter().fold(
        Cors::default()
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        |cors, origin| cors.allowed_origin(origin),
    )
}

pub async fn run(
    listener: TcpListener,
    settings: Settings,
    connectors: Connectors,
) -> Result<Server, std::io::Error> {
    check_webhook_secret(&settings)?;

    let Connectors {
        baas,
        gateway,
        mailer,
    } = connectors;

    let templates = Arc::new(EmailTemplates::new().map_err(io_error)?);
    let notifier = Notifier::new(
        baas.clone(),
        mailer,
        templates,
        &settings.frontend_url,
        settings.connectors.email.admin_address.clone(),
    );
    let checkout = Checkout::new(baas.clone(), gateway.clone(), &settings);
    let reconciler = Reconciler::new(baas.clone(), gateway.clone(), notifier.clone());
    let health_checker = HealthChecker::new(baas.clone(), gateway.clone());

    if settings.expiration.enabled {
        tracing::info!(
            "Expiration sweep every {}s",
            settings.expiration.interval_secs
        );
        ExpirationSweeper::new(baas.clone(), notifier.clone(), &settings.expiration).spawn();
    }

    let allowed_origins = settings.allowed_origins.clone();
    let baas = web::Data::new(baas);
    let notifier = web::Data::new(notifier);
    let checkout = web::Data::new(checkout);
    let reconciler = web::Data::new(reconciler);
    let health_checker = web::Data::new(health_checker);
    let settings = web::Data::new(settings);

    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let msg = match err {
            error::JsonPayloadError::Deserialize(err) => format!("JSON inválido: {}", err),
            err => format!("Requisição inválida: {}", err),
        };
        ApiError::bad_request(msg).into()
    });
    let query_config = web::QueryConfig::default()
        .error_handler(|err, _req| ApiError::bad_request(format!("Filtro inválido: {}", err)).into());
    let path_config = web::PathConfig::default()
        .error_handler(|err, _req| ApiError::bad_request(format!("Identificador inválido: {}", err)).into());

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Manager::new())
            .wrap(cors(&allowed_origins))
            .app_data(json_config.clone())
            .app_data(query_config.clone())
            .app_data(path_config.clone())
            .app_data(baas.clone())
            .app_data(notifier.clone())
            .app_data(checkout.clone())
            .app_data(reconciler.clone())
            .app_data(health_checker.clone())
            .app_data(settings.clone())
            .service(
                web::scope("/health")
                    .service(routes::health_check)
                    .service(routes::health_components),
            )
            .service(
                web::scope("/api")
                    .service(
                        web::scope("/auth")
                            .service(routes::auth::register_handler)
                            .service(routes::auth::login_handler)
                            .service(
                                web::scope("")
                                    .wrap(RequireRole::authenticated())
                                    .service(routes::auth::profile_handler)
                                    .service(routes::auth::change_password_handler),
                            ),
                    )
                    .service(web::scope("/planos").service(routes::plan::list_handler))
                    .service(
                        web::scope("/webhooks").service(routes::webhook::mercadopago_handler),
                    )
                    .service(
                        web::scope("/admin")
                            .wrap(RequireRole::admin())
                            .service(
                                web::scope("/planos")
                                    .service(routes::admin::plan_list_handler)
                                    .service(routes::admin::plan_add_handler)
                                    .service(routes::admin::plan_update_handler),
                            )
                            .service(
                                web::scope("/pedidos")
                                    .service(routes::admin::order_list_handler)
                                    .service(routes::admin::order_update_handler)
                                    .service(routes::admin::order_credentials_handler),
                            )
                            .service(
                                web::scope("/usuarios")
                                    .service(routes::admin::user_list_handler)
                                    .service(routes::admin::user_item_handler)
                                    .service(routes::admin::user_update_handler),
                            )
                            .service(
                                web::scope("/solicitacoes-teste")
                                    .service(routes::admin::trial_list_handler)
                                    .service(routes::admin::trial_decide_handler),
                            )
                            .service(
                                web::scope("/estatisticas")
                                    .service(routes::admin::statistics_handler),
                            ),
                    )
                    .service(
                        web::scope("/pedidos")
                            .wrap(RequireRole::authenticated())
                            .service(routes::order::add_handler)
                            .service(routes::order::list_handler)
                            .service(routes::order::item_handler),
                    )
                    .service(
                        web::scope("/pagamento")
                            .wrap(RequireRole::authenticated())
                            .service(routes::payment::preference_handler)
                            .service(routes::payment::pix_handler)
                            .service(routes::payment::status_handler),
                    )
                    .service(
                        web::scope("/solicitacoes-teste")
                            .wrap(RequireRole::authenticated())
                            .service(routes::trial::add_handler)
                            .service(routes::trial::list_handler),
                    )
                    .service(
                        web::scope("/notificacoes")
                            .wrap(RequireRole::authenticated())
                            .service(routes::notification::list_handler)
                            .service(routes::notification::mark_read_handler),
                    ),
            )
    })
    .listen(listener)?
    .run();

    Ok(server)
}
