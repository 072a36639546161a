use crate::models::{Order, TrialRequest, User};
use serde::Serialize;

/// Profile row together with the caller's role
#[derive(Debug, Serialize)]
pub struct Account<'a> {
    #[serde(flatten)]
    pub user: &'a User,
    pub role: &'static str,
}

impl<'a> Account<'a> {
    pub fn new(user: &'a User) -> Self {
        Self {
            user,
            role: user.role.as_str(),
        }
    }

    /// Sign-in answer uses the role label the frontend expects
    pub fn for_session(user: &'a User) -> Self {
        Self {
            user,
            role: user.role.label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminDetail {
    #[serde(flatten)]
    pub user: User,
    pub pedidos: Vec<Order>,
    pub solicitacoes_teste: Vec<TrialRequest>,
}
