use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Row of the `planos` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub nome: String,
    #[serde(default)]
    pub descricao: Option<String>,
    pub preco: f64,
    pub duracao_dias: i32,
    #[serde(default)]
    pub recursos: Option<Value>,
    pub ativo: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
