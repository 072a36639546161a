use serde::Deserialize;
use serde_json::{json, Map, Value};
use serde_valid::Validate;

use super::{non_blank, present};
use crate::helpers::ApiError;
use crate::models::{AccessStatus, PaymentStatus, TrialStatus, UserStatus};

#[derive(Debug, Deserialize, Validate)]
pub struct NewPlan {
    #[validate(min_length = 1)]
    #[validate(max_length = 120)]
    pub nome: String,
    #[validate(max_length = 2000)]
    pub descricao: Option<String>,
    #[validate(minimum = 0.0)]
    pub preco: f64,
    #[validate(minimum = 1)]
    #[validate(maximum = 3650)]
    pub duracao_dias: i32,
    #[serde(default)]
    pub recursos: Option<Value>,
    /// Plans are active unless explicitly created inactive
    #[serde(default)]
    pub ativo: Option<bool>,
}

impl NewPlan {
    pub fn into_row(self) -> Value {
        json!({
            "nome": self.nome.trim(),
            "descricao": self.descricao,
            "preco": self.preco,
            "duracao_dias": self.duracao_dias,
            "recursos": self.recursos,
            "ativo": self.ativo.unwrap_or(true),
        })
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PlanUpdate {
    #[validate(min_length = 1)]
    #[validate(max_length = 120)]
    pub nome: Option<String>,
    #[validate(max_length = 2000)]
    pub descricao: Option<String>,
    #[validate(minimum = 0.0)]
    pub preco: Option<f64>,
    #[validate(minimum = 1)]
    #[validate(maximum = 3650)]
    pub duracao_dias: Option<i32>,
    pub recursos: Option<Value>,
    pub ativo: Option<bool>,
}

impl PlanUpdate {
    pub fn into_patch(self) -> Result<Value, ApiError> {
        let mut patch = Map::new();
        if let Some(nome) = self.nome {
            patch.insert("nome".to_string(), json!(nome.trim()));
        }
        if let Some(descricao) = self.descricao {
            patch.insert("descricao".to_string(), json!(descricao));
        }
        if let Some(preco) = self.preco {
            patch.insert("preco".to_string(), json!(preco));
        }
        if let Some(dias) = self.duracao_dias {
            patch.insert("duracao_dias".to_string(), json!(dias));
        }
        if let Some(recursos) = self.recursos {
            patch.insert("recursos".to_string(), recursos);
        }
        if let Some(ativo) = self.ativo {
            patch.insert("ativo".to_string(), json!(ativo));
        }

        if patch.is_empty() {
            return Err(ApiError::bad_request("Nenhum campo para atualizar"));
        }
        Ok(Value::Object(patch))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct OrderUpdate {
    pub status_acesso: Option<AccessStatus>,
    #[validate(max_length = 2000)]
    pub observacoes_admin: Option<String>,
}

impl OrderUpdate {
    pub fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();
        if let Some(status) = self.status_acesso {
            patch.insert("status_acesso".to_string(), json!(status));
        }
        if let Some(obs) = self.observacoes_admin {
            patch.insert("observacoes_admin".to_string(), json!(obs));
        }
        patch
    }
}

/// IPTV access data sent to the customer after payment
#[derive(Deserialize, Validate)]
pub struct Credentials {
    #[serde(default)]
    #[validate(max_length = 4000)]
    pub credenciais: String,
}

impl Credentials {
    pub fn check_required(&self) -> Result<(), ApiError> {
        if present(&self.credenciais) {
            Ok(())
        } else {
            Err(ApiError::bad_request("Credenciais são obrigatórias"))
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UserUpdate {
    #[validate(max_length = 120)]
    pub nome_completo: Option<String>,
    #[validate(max_length = 30)]
    pub telefone: Option<String>,
    pub status: Option<UserStatus>,
}

impl UserUpdate {
    /// Blank names are ignored rather than written
    pub fn into_patch(self) -> Map<String, Value> {
        let mut patch = Map::new();
        if let Some(nome) = non_blank(self.nome_completo) {
            patch.insert("nome_completo".to_string(), json!(nome));
        }
        if let Some(telefone) = self.telefone {
            patch.insert("telefone".to_string(), json!(non_blank(Some(telefone))));
        }
        if let Some(status) = self.status {
            patch.insert("status".to_string(), json!(status));
        }
        patch
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OrderFilter {
    pub status_pagamento: Option<PaymentStatus>,
    pub status_acesso: Option<AccessStatus>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TrialFilter {
    pub status: Option<TrialStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plan_is_active_by_default() {
        let form: NewPlan = serde_json::from_value(json!({
            "nome": "Mensal",
            "preco": 29.9,
            "duracao_dias": 30
        }))
        .unwrap();
        assert!(form.validate().is_ok());
        assert_eq!(form.into_row()["ativo"], json!(true));
    }

    #[test]
    fn plan_rules() {
        let form: NewPlan = serde_json::from_value(json!({
            "nome": "Mensal",
            "preco": -1.0,
            "duracao_dias": 0
        }))
        .unwrap();
        assert!(form.validate().is_err());

        let form: NewPlan = serde_json::from_value(json!({
            "nome": "Eterno",
            "preco": 10.0,
            "duracao_dias": 2_000_000_000
        }))
        .unwrap();
        assert!(form.validate().is_err());

        let update: PlanUpdate =
            serde_json::from_value(json!({ "duracao_dias": 3651 })).unwrap();
        assert!(update.validate().is_err());
        let update: PlanUpdate =
            serde_json::from_value(json!({ "duracao_dias": 3650 })).unwrap();
        assert!(update.validate().is_ok());

        let empty: PlanUpdate = serde_json::from_value(json!({})).unwrap();
        assert!(empty.into_patch().is_err());
    }

    #[test]
    fn user_update_skips_blank_name() {
        let form: UserUpdate = serde_json::from_value(json!({
            "nome_completo": "",
            "status": "suspensa"
        }))
        .unwrap();
        let patch = form.into_patch();
        assert!(!patch.contains_key("nome_completo"));
        assert_eq!(patch["status"], json!("suspensa"));
    }

    #[test]
    fn filters_reject_unknown_statuses() {
        let filter: Result<OrderFilter, _> =
            serde_json::from_value(json!({"status_pagamento": "talvez"}));
        assert!(filter.is_err());
    }
}
