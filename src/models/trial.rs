use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    #[default]
    #[serde(rename = "pendente")]
    Pending,
    #[serde(rename = "aprovado")]
    Approved,
    #[serde(rename = "rejeitado")]
    Rejected,
}

impl TrialStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialStatus::Pending => "pendente",
            TrialStatus::Approved => "aprovado",
            TrialStatus::Rejected => "rejeitado",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, TrialStatus::Pending)
    }

    /// Statuses that prevent the same user from opening another request
    pub const BLOCKING: [TrialStatus; 2] = [TrialStatus::Pending, TrialStatus::Approved];
}

/// Row of the `solicitacoes_teste` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialRequest {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub status: TrialStatus,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default)]
    pub observacoes_admin: Option<String>,
    /// Admin who decided the request
    #[serde(default)]
    pub aprovado_por: Option<Uuid>,
    /// Time of the decision
    #[serde(default)]
    pub aprovado_em: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
