use actix_web::{get, web, HttpResponse};
use chrono::Utc;
use serde_json::json;

use crate::health::HealthChecker;

#[get("")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

#[tracing::instrument(name = "Component health report.", skip(checker))]
#[get("/components")]
pub async fn health_components(checker: web::Data<HealthChecker>) -> HttpResponse {
    let report = checker.check_all().await;
    if report.is_healthy() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
