use crate::models::{TrialRequest, User};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Admin {
    #[serde(flatten)]
    pub trial: TrialRequest,
    pub usuario_nome: Option<String>,
    pub usuario_email: Option<String>,
    pub usuario_telefone: Option<String>,
}

impl Admin {
    pub fn new(trial: TrialRequest, requester: Option<&User>) -> Self {
        Self {
            trial,
            usuario_nome: requester.map(|u| u.nome_completo.clone()),
            usuario_email: requester.map(|u| u.email.clone()),
            usuario_telefone: requester.and_then(|u| u.telefone.clone()),
        }
    }
}
