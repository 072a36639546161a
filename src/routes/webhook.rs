use std::collections::HashMap;

use actix_web::{post, web, HttpRequest, HttpResponse};
use serde_json::json;

use crate::configuration::Settings;
use crate::connectors::mercadopago::signature;
use crate::forms::webhook::GatewayNotification;
use crate::services::{ReconcileOutcome, Reconciler};

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|value| value.to_str().ok())
}

/// Payment notifications from Mercado Pago.
///
/// Only the payment id is taken from the request; its state is fetched from
/// the gateway before the order is touched.
#[tracing::instrument(name = "Mercado Pago webhook.", skip_all)]
#[post("/mercadopago")]
pub async fn mercadopago_handler(
    req: HttpRequest,
    query: web::Query<HashMap<String, String>>,
    body: web::Bytes,
    settings: web::Data<Settings>,
    reconciler: web::Data<Reconciler>,
) -> HttpResponse {
    let notification = GatewayNotification::parse(&query, &body);
    tracing::info!(
        kind = ?notification.kind,
        resource_id = ?notification.resource_id,
        "webhook received"
    );

    match settings.connectors.mercadopago.webhook_secret.as_deref() {
        Some(secret) => {
            if !notification.ids_agree() {
                tracing::warn!(
                    signed_id = ?notification.signed_id,
                    resource_id = ?notification.resource_id,
                    "Rejected webhook: body id differs from signed id"
                );
                return HttpResponse::Unauthorized().json(json!({ "error": "Assinatura inválida" }));
            }
            if let Err(err) = signature::verify(
                secret,
                header(&req, "x-signature"),
                header(&req, "x-request-id"),
                notification.signature_id(),
            ) {
                tracing::warn!("Rejected webhook: {}", err);
                return HttpResponse::Unauthorized().json(json!({ "error": "Assinatura inválida" }));
            }
        }
        None => tracing::warn!("MP_WEBHOOK_SECRET not set, webhook signature not checked"),
    }

    if !notification.is_payment() {
        return HttpResponse::Ok().json(json!({ "received": true }));
    }

    let payment_id = match notification.resource_id.as_deref() {
        Some(id) => id,
        None => {
            tracing::warn!("Payment notification without id");
            return HttpResponse::Ok().json(json!({ "received": true }));
        }
    };

    match reconciler.reconcile(payment_id).await {
        Ok(outcome) => {
            if let ReconcileOutcome::Updated { order_id, status } = &outcome {
                tracing::info!("Order {} reconciled to {}", order_id, status.as_str());
            }
            HttpResponse::Ok().json(json!({ "received": true }))
        }
        Err(err) => {
            tracing::error!("Webhook processing failed for payment {}: {}", payment_id, err);
            HttpResponse::InternalServerError().json(json!({ "error": "Erro ao processar webhook" }))
        }
    }
}
