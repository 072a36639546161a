use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct NewOrder {
    pub plano_id: Uuid,
}

/// Body of the checkout routes
#[derive(Debug, Deserialize)]
pub struct Payment {
    pub pedido_id: Uuid,
}
