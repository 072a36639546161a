use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Sent to an admin when a customer's payment clears
    PagamentoConfirmado,
    /// Sent to the customer when their payment clears
    PagamentoAprovado,
    Sucesso,
    Info,
}

/// Row of the `notificacoes` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub usuario_id: Uuid,
    pub titulo: String,
    pub mensagem: String,
    /// Kept as text: rows may carry kinds written by other clients
    pub tipo: String,
    #[serde(default)]
    pub lida: bool,
    #[serde(default)]
    pub pedido_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewNotification {
    pub usuario_id: Uuid,
    pub tipo: NotificationKind,
    pub titulo: String,
    pub mensagem: String,
    pub lida: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pedido_id: Option<Uuid>,
}

impl NewNotification {
    pub fn new(
        usuario_id: Uuid,
        tipo: NotificationKind,
        titulo: impl Into<String>,
        mensagem: impl Into<String>,
    ) -> Self {
        Self {
            usuario_id,
            tipo,
            titulo: titulo.into(),
            mensagem: mensagem.into(),
            lida: false,
            pedido_id: None,
        }
    }

    pub fn for_order(mut self, order_id: Uuid) -> Self {
        self.pedido_id = Some(order_id);
        self
    }
}
