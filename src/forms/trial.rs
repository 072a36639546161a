use serde::Deserialize;
use serde_valid::Validate;

use super::non_blank;
use crate::models::TrialStatus;

#[derive(Debug, Default, Deserialize, Validate)]
pub struct NewTrial {
    #[serde(default)]
    #[validate(max_length = 1000)]
    pub observacoes: Option<String>,
}

impl NewTrial {
    pub fn observacoes(&self) -> Option<String> {
        non_blank(self.observacoes.clone())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct Decision {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    #[validate(max_length = 1000)]
    pub observacoes_admin: Option<String>,
}

impl Decision {
    /// Only the two terminal states can be chosen by an admin
    pub fn status(&self) -> Option<TrialStatus> {
        match self.status.as_str() {
            "aprovado" => Some(TrialStatus::Approved),
            "rejeitado" => Some(TrialStatus::Rejected),
            _ => None,
        }
    }
}
