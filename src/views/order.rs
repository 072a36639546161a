use crate::models::{Order, Plan, User};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Order as listed to its owner
#[derive(Debug, Serialize)]
pub struct Summary {
    #[serde(flatten)]
    pub order: Order,
    pub plano_nome: Option<String>,
    pub data_compra: Option<DateTime<Utc>>,
}

impl Summary {
    pub fn new(order: Order, plan: Option<&Plan>) -> Self {
        Self {
            plano_nome: plan.map(|p| p.nome.clone()),
            data_compra: order.created_at,
            order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Detail {
    #[serde(flatten)]
    pub order: Order,
    pub plano_nome: Option<String>,
    pub plano_descricao: Option<String>,
}

impl Detail {
    pub fn new(order: Order, plan: Option<&Plan>) -> Self {
        Self {
            order,
            plano_nome: plan.map(|p| p.nome.clone()),
            plano_descricao: plan.and_then(|p| p.descricao.clone()),
        }
    }
}

/// Answer to order creation: the order plus where to pay it
#[derive(Debug, Serialize)]
pub struct Created {
    #[serde(flatten)]
    pub order: Order,
    pub plano_nome: String,
    pub payment_link: String,
}

#[derive(Debug, Serialize)]
pub struct Admin {
    #[serde(flatten)]
    pub order: Order,
    pub usuario_nome: Option<String>,
    pub usuario_email: Option<String>,
    pub plano_nome: Option<String>,
    pub data_compra: Option<DateTime<Utc>>,
}

impl Admin {
    pub fn new(order: Order, customer: Option<&User>, plan: Option<&Plan>) -> Self {
        Self {
            usuario_nome: customer.map(|u| u.nome_completo.clone()),
            usuario_email: customer.map(|u| u.email.clone()),
            plano_nome: plan.map(|p| p.nome.clone()),
            data_compra: order.created_at,
            order,
        }
    }
}
