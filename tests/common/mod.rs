#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use revenda::configuration::{ExpirationSettings, Settings};
use revenda::connectors::{ConnectorConfig, InMemoryBaas, MockEmailRelay, MockPaymentGateway};
use revenda::startup::{run, Connectors};
use serde_json::{json, Value};
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub baas: Arc<InMemoryBaas>,
    pub gateway: Arc<MockPaymentGateway>,
    pub mailer: Arc<MockEmailRelay>,
    pub client: reqwest::Client,
}

pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

pub fn test_settings() -> Settings {
    Settings {
        app_port: 0,
        app_host: "127.0.0.1".to_string(),
        frontend_url: "http://frontend.test".to_string(),
        backend_url: "http://backend.test".to_string(),
        allowed_origins: vec!["http://frontend.test".to_string()],
        connectors: ConnectorConfig::default(),
        expiration: ExpirationSettings {
            enabled: false,
            ..ExpirationSettings::default()
        },
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with_configuration(test_settings()).await
}

pub async fn spawn_app_with_configuration(configuration: Settings) -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let baas = Arc::new(InMemoryBaas::new());
    let gateway = Arc::new(MockPaymentGateway::new());
    let mailer = Arc::new(MockEmailRelay::new());
    let connectors = Connectors {
        baas: baas.clone(),
        gateway: gateway.clone(),
        mailer: mailer.clone(),
    };

    let server = run(listener, configuration, connectors)
        .await
        .expect("Failed to bind address.");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        baas,
        gateway,
        mailer,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Identity plus profile and role rows, as registration leaves them
    pub fn account(&self, email: &str, nome: &str, role: &str) -> Account {
        let (id, token) = self.baas.add_identity(email, "senha-forte");
        self.baas.seed(
            "usuarios",
            json!({
                "id": id,
                "email": email,
                "nome_completo": nome,
                "telefone": "11999990000",
                "status": "ativa",
            }),
        );
        self.baas
            .seed("user_roles", json!({ "user_id": id, "role": role }));

        Account {
            id,
            email: email.to_string(),
            token,
        }
    }

    pub fn customer(&self) -> Account {
        self.account("ana@example.com", "Ana Souza", "cliente")
    }

    pub fn admin(&self) -> Account {
        self.account("admin@example.com", "Admin Revenda", "admin")
    }

    pub fn plan(&self, nome: &str, preco: f64, ativo: bool) -> Value {
        self.baas.seed(
            "planos",
            json!({
                "nome": nome,
                "descricao": format!("Plano {}", nome),
                "preco": preco,
                "duracao_dias": 30,
                "ativo": ativo,
            }),
        )
    }

    /// Unpaid order of `owner` for `plan`
    pub fn order(&self, owner: &Account, plan: &Value) -> Value {
        self.baas.seed(
            "pedidos",
            json!({
                "usuario_id": owner.id,
                "plano_id": plan["id"].clone(),
                "valor": plan["preco"].clone(),
                "status_pagamento": "aguardando_pagamento",
                "status_acesso": "inativo",
            }),
        )
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("Failed to execute request.")
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut req = self.client.post(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("Failed to execute request.")
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> reqwest::Response {
        let mut req = self.client.put(self.url(path)).json(&body);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        req.send().await.expect("Failed to execute request.")
    }

    pub fn notifications_of(&self, user_id: &Uuid) -> Vec<Value> {
        let id = user_id.to_string();
        self.baas
            .rows("notificacoes")
            .into_iter()
            .filter(|n| n["usuario_id"].as_str() == Some(id.as_str()))
            .collect()
    }
}
