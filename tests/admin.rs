mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn customers_cannot_reach_admin_routes() {
    let app = common::spawn_app().await;
    let ana = app.customer();

    for path in [
        "/api/admin/estatisticas",
        "/api/admin/pedidos",
        "/api/admin/usuarios",
        "/api/admin/planos",
        "/api/admin/solicitacoes-teste",
    ] {
        let response = app.get(path, Some(&ana.token)).await;
        assert_eq!(response.status().as_u16(), 403, "{}", path);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["error"], "Acesso negado. Apenas administradores.");
    }

    let anonymous = app.get("/api/admin/estatisticas", None).await;
    assert_eq!(anonymous.status().as_u16(), 401);
}

#[tokio::test]
async fn statistics_count_users_orders_and_revenue() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    let plan = app.plan("Mensal", 29.9, true);
    app.order(&ana, &plan);
    app.baas.seed(
        "pedidos",
        json!({
            "usuario_id": ana.id,
            "plano_id": plan["id"].clone(),
            "valor": 29.9,
            "status_pagamento": "pago",
            "status_acesso": "ativo"
        }),
    );
    app.baas.seed(
        "solicitacoes_teste",
        json!({ "usuario_id": ana.id, "status": "pendente" }),
    );

    let response = app.get("/api/admin/estatisticas", Some(&admin.token)).await;

    assert_eq!(response.status().as_u16(), 200);
    let stats: Value = response.json().await.unwrap();
    assert_eq!(stats["usuarios"]["total"], 2);
    assert_eq!(stats["usuarios"]["ativos"], 2);
    assert_eq!(stats["pedidos"]["total"], 2);
    assert_eq!(stats["pedidos"]["pagos"], 1);
    assert_eq!(stats["solicitacoes_teste"]["pendentes"], 1);
    assert_eq!(stats["receita"]["total"], json!(29.9));
}

#[tokio::test]
async fn plan_lifecycle() {
    let app = common::spawn_app().await;
    let admin = app.admin();

    let created = app
        .post(
            "/api/admin/planos",
            Some(&admin.token),
            json!({ "nome": "Trimestral", "preco": 79.9, "duracao_dias": 90 }),
        )
        .await;
    assert_eq!(created.status().as_u16(), 201);
    let plan: Value = created.json().await.unwrap();
    assert_eq!(plan["ativo"], true);

    let invalid = app
        .post(
            "/api/admin/planos",
            Some(&admin.token),
            json!({ "nome": "Grátis", "preco": -1.0, "duracao_dias": 0 }),
        )
        .await;
    assert_eq!(invalid.status().as_u16(), 400);

    let path = format!("/api/admin/planos/{}", plan["id"].as_str().unwrap());
    let updated = app
        .put(&path, Some(&admin.token), json!({ "ativo": false }))
        .await;
    assert_eq!(updated.status().as_u16(), 200);

    let empty = app.put(&path, Some(&admin.token), json!({})).await;
    assert_eq!(empty.status().as_u16(), 400);
    let body: Value = empty.json().await.unwrap();
    assert_eq!(body["error"], "Nenhum campo para atualizar");

    let public: Vec<Value> = app.get("/api/planos", None).await.json().await.unwrap();
    assert!(public.is_empty());

    let all: Vec<Value> = app
        .get("/api/admin/planos", Some(&admin.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn order_list_joins_customer_and_plan() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    let plan = app.plan("Mensal", 29.9, true);
    app.order(&ana, &plan);

    let response = app
        .get(
            "/api/admin/pedidos?status_pagamento=aguardando_pagamento",
            Some(&admin.token),
        )
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let orders: Vec<Value> = response.json().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["usuario_nome"], "Ana Souza");
    assert_eq!(orders[0]["usuario_email"], "ana@example.com");
    assert_eq!(orders[0]["plano_nome"], "Mensal");

    let paid: Vec<Value> = app
        .get("/api/admin/pedidos?status_pagamento=pago", Some(&admin.token))
        .await
        .json()
        .await
        .unwrap();
    assert!(paid.is_empty());
}

#[tokio::test]
async fn credentials_need_a_paid_order() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    let plan = app.plan("Mensal", 29.9, true);
    let order = app.order(&ana, &plan);
    let path = format!("/api/admin/pedidos/{}/credenciais", order["id"].as_str().unwrap());

    let response = app
        .post(&path, Some(&admin.token), json!({ "credenciais": "usuario ana senha 123" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Pedido ainda não foi pago");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn credentials_activate_access_and_email_customer() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    let plan = app.plan("Mensal", 29.9, true);
    let order = app.baas.seed(
        "pedidos",
        json!({
            "usuario_id": ana.id,
            "plano_id": plan["id"].clone(),
            "valor": 29.9,
            "status_pagamento": "pago",
            "status_acesso": "inativo"
        }),
    );
    let path = format!("/api/admin/pedidos/{}/credenciais", order["id"].as_str().unwrap());

    let blank = app
        .post(&path, Some(&admin.token), json!({ "credenciais": " " }))
        .await;
    assert_eq!(blank.status().as_u16(), 400);

    let response = app
        .post(&path, Some(&admin.token), json!({ "credenciais": "usuario ana senha 123" }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status_acesso"], "ativo");
    assert!(body["data_expiracao"].is_string());

    let sent = app.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@example.com");
    assert!(sent[0].html.contains("usuario ana senha 123"));
}

#[tokio::test]
async fn credentials_for_out_of_range_plan_duration_are_refused() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();

    let too_long = app
        .post(
            "/api/admin/planos",
            Some(&admin.token),
            json!({ "nome": "Eterno", "preco": 10.0, "duracao_dias": 2_000_000_000 }),
        )
        .await;
    assert_eq!(too_long.status().as_u16(), 400);

    // row written outside the admin form
    let plan = app.baas.seed(
        "planos",
        json!({ "nome": "Eterno", "preco": 10.0, "duracao_dias": 2_000_000_000, "ativo": true }),
    );
    let order = app.baas.seed(
        "pedidos",
        json!({
            "usuario_id": ana.id,
            "plano_id": plan["id"].clone(),
            "valor": 10.0,
            "status_pagamento": "pago",
            "status_acesso": "inativo"
        }),
    );
    let path = format!("/api/admin/pedidos/{}/credenciais", order["id"].as_str().unwrap());

    let response = app
        .post(&path, Some(&admin.token), json!({ "credenciais": "usuario ana senha 123" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Duração do plano inválida");
    assert_eq!(app.baas.rows("pedidos")[0]["status_acesso"], "inativo");
    assert!(app.mailer.sent().is_empty());
}

#[tokio::test]
async fn trial_decision_is_final() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    let trial = app.baas.seed(
        "solicitacoes_teste",
        json!({ "usuario_id": ana.id, "status": "pendente" }),
    );
    let path = format!("/api/admin/solicitacoes-teste/{}", trial["id"].as_str().unwrap());

    let invalid = app
        .put(&path, Some(&admin.token), json!({ "status": "pendente" }))
        .await;
    assert_eq!(invalid.status().as_u16(), 400);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(body["error"], "Status inválido");

    let approved = app
        .put(
            &path,
            Some(&admin.token),
            json!({ "status": "aprovado", "observacoes_admin": "Liberado por 24h" }),
        )
        .await;
    assert_eq!(approved.status().as_u16(), 200);
    let body: Value = approved.json().await.unwrap();
    assert_eq!(body["message"], "Solicitação aprovada com sucesso");
    assert_eq!(body["solicitacao"]["status"], "aprovado");
    assert_eq!(body["solicitacao"]["aprovado_por"], admin.id.to_string());

    let notifications = app.notifications_of(&ana.id);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["titulo"], "Teste Grátis Aprovado!");

    let again = app
        .put(&path, Some(&admin.token), json!({ "status": "rejeitado" }))
        .await;
    assert_eq!(again.status().as_u16(), 400);
    let body: Value = again.json().await.unwrap();
    assert_eq!(body["error"], "Solicitação já processada");
    assert_eq!(app.notifications_of(&ana.id).len(), 1);
}

#[tokio::test]
async fn trial_list_shows_requester() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    app.baas.seed(
        "solicitacoes_teste",
        json!({ "usuario_id": ana.id, "status": "pendente" }),
    );

    let trials: Vec<Value> = app
        .get("/api/admin/solicitacoes-teste?status=pendente", Some(&admin.token))
        .await
        .json()
        .await
        .unwrap();

    assert_eq!(trials.len(), 1);
    assert_eq!(trials[0]["usuario_nome"], "Ana Souza");
    assert_eq!(trials[0]["usuario_telefone"], "11999990000");
}

#[tokio::test]
async fn user_detail_and_suspension() {
    let app = common::spawn_app().await;
    let admin = app.admin();
    let ana = app.customer();
    let plan = app.plan("Mensal", 29.9, true);
    app.order(&ana, &plan);
    let path = format!("/api/admin/usuarios/{}", ana.id);

    let detail: Value = app
        .get(&path, Some(&admin.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(detail["email"], "ana@example.com");
    assert_eq!(detail["pedidos"].as_array().unwrap().len(), 1);
    assert!(detail["solicitacoes_teste"].as_array().unwrap().is_empty());
    assert!(detail.get("role").is_none());

    let updated = app
        .put(&path, Some(&admin.token), json!({ "status": "suspensa" }))
        .await;
    assert_eq!(updated.status().as_u16(), 200);
    assert_eq!(app.baas.rows("usuarios")[1]["status"], "suspensa");

    let search: Vec<Value> = app
        .get("/api/admin/usuarios?search=souza", Some(&admin.token))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(search.len(), 1);
    assert_eq!(search[0]["id"], ana.id.to_string());
}
