mod add;
mod get;

pub use add::*;
pub use get::*;

use std::collections::HashMap;

use uuid::Uuid;

use crate::connectors::{BaasConnector, ConnectorError};
use crate::db;
use crate::models::{Order, Plan};

/// Plans referenced by `orders`, keyed by id
pub(crate) async fn plans_of(
    baas: &dyn BaasConnector,
    orders: &[Order],
) -> Result<HashMap<Uuid, Plan>, ConnectorError> {
    let mut ids: Vec<Uuid> = orders.iter().map(|o| o.plano_id).collect();
    ids.sort();
    ids.dedup();

    Ok(db::plan::fetch_many(baas, &ids)
        .await?
        .into_iter()
        .map(|plan| (plan.id, plan))
        .collect())
}
