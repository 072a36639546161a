use serde::Deserialize;
use serde_json::{json, Map, Value};
use serde_valid::Validate;

use super::{non_blank, present};
use crate::helpers::ApiError;

#[derive(Deserialize, Validate)]
pub struct Register {
    #[serde(default)]
    #[validate(max_length = 254)]
    pub email: String,
    #[serde(default)]
    #[validate(max_length = 72)]
    pub senha: String,
    #[serde(default)]
    #[validate(max_length = 120)]
    pub nome_completo: String,
    #[serde(default)]
    #[validate(max_length = 30)]
    pub telefone: Option<String>,
}

impl Register {
    pub fn check_required(&self) -> Result<(), ApiError> {
        if present(&self.email) && present(&self.senha) && present(&self.nome_completo) {
            Ok(())
        } else {
            Err(ApiError::bad_request(
                "Email, senha e nome completo são obrigatórios",
            ))
        }
    }

    pub fn telefone(&self) -> Option<String> {
        non_blank(self.telefone.clone())
    }
}

#[derive(Deserialize, Validate)]
pub struct Login {
    #[serde(default)]
    #[validate(max_length = 254)]
    pub email: String,
    #[serde(default)]
    #[validate(max_length = 72)]
    pub senha: String,
}

impl Login {
    pub fn check_required(&self) -> Result<(), ApiError> {
        if present(&self.email) && present(&self.senha) {
            Ok(())
        } else {
            Err(ApiError::bad_request("Email e senha são obrigatórios"))
        }
    }

    /// Name given to a profile created at first sign-in
    pub fn default_name(&self) -> String {
        self.email
            .trim()
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(max_length = 120)]
    pub nome_completo: Option<String>,
    #[validate(max_length = 30)]
    pub telefone: Option<String>,
}

impl ProfileUpdate {
    pub fn into_patch(self) -> Result<Map<String, Value>, ApiError> {
        let mut patch = Map::new();
        if let Some(nome) = self.nome_completo {
            if !present(&nome) {
                return Err(ApiError::bad_request("Nome completo não pode ser vazio"));
            }
            patch.insert("nome_completo".to_string(), json!(nome.trim()));
        }
        if let Some(telefone) = self.telefone {
            patch.insert("telefone".to_string(), json!(non_blank(Some(telefone))));
        }
        Ok(patch)
    }
}

#[derive(Deserialize, Validate)]
pub struct ChangePassword {
    #[serde(default)]
    pub senha_atual: String,
    #[serde(default)]
    #[validate(max_length = 72)]
    pub nova_senha: String,
}

impl ChangePassword {
    pub fn check_required(&self) -> Result<(), ApiError> {
        if !present(&self.senha_atual) || !present(&self.nova_senha) {
            return Err(ApiError::bad_request(
                "Senha atual e nova senha são obrigatórias",
            ));
        }
        if self.nova_senha.chars().count() < 6 {
            return Err(ApiError::bad_request(
                "A nova senha deve ter pelo menos 6 caracteres",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_requires_email_password_and_name() {
        let form: Register =
            serde_json::from_value(json!({"email": "ana@example.com", "senha": "segredo"}))
                .unwrap();
        let err = form.check_required().unwrap_err();
        assert_eq!(err.to_string(), "Email, senha e nome completo são obrigatórios");

        let form: Register = serde_json::from_value(json!({
            "email": "ana@example.com",
            "senha": "segredo",
            "nome_completo": "Ana Souza",
            "telefone": "  "
        }))
        .unwrap();
        assert!(form.check_required().is_ok());
        assert_eq!(form.telefone(), None);
    }

    #[test]
    fn login_default_name_is_the_mailbox() {
        let form: Login =
            serde_json::from_value(json!({"email": "ana.souza@example.com", "senha": "x"}))
                .unwrap();
        assert_eq!(form.default_name(), "ana.souza");
    }

    #[test]
    fn profile_patch_keeps_only_sent_fields() {
        let form: ProfileUpdate = serde_json::from_value(json!({"telefone": "11999990000"})).unwrap();
        let patch = form.into_patch().unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch["telefone"], json!("11999990000"));

        let form: ProfileUpdate = serde_json::from_value(json!({"nome_completo": " "})).unwrap();
        assert!(form.into_patch().is_err());
    }

    #[test]
    fn short_new_password_is_rejected() {
        let form: ChangePassword =
            serde_json::from_value(json!({"senha_atual": "antiga", "nova_senha": "123"})).unwrap();
        assert!(form.check_required().is_err());
    }
}
