mod common;

#[tokio::test]
async fn health_check_works() {
    let app = common::spawn_app().await;

    let response = app.get("/health", None).await;

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn components_report_every_dependency() {
    let app = common::spawn_app().await;

    let response = app.get("/health/components", None).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["components"]["baas"]["status"], "healthy");
    assert_eq!(body["components"]["mercadopago"]["status"], "healthy");
}

#[tokio::test]
async fn components_answer_503_when_gateway_is_down() {
    let app = common::spawn_app().await;
    app.gateway.set_unavailable(true);

    let response = app.get("/health/components", None).await;

    assert_eq!(response.status().as_u16(), 503);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["components"]["mercadopago"]["status"], "unhealthy");
}
