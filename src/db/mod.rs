//! Table access over the BaaS row API.
//!
//! Each submodule owns one table. Functions take the connector as
//! `&dyn BaasConnector` and return decoded models.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::connectors::ConnectorError;

pub mod notification;
pub mod order;
pub mod plan;
pub mod setting;
pub mod trial;
pub mod user;

pub(crate) fn decode<T: DeserializeOwned>(table: &str, row: Value) -> Result<T, ConnectorError> {
    serde_json::from_value(row).map_err(|err| {
        tracing::error!("Failed to decode {} row: {:?}", table, err);
        ConnectorError::InvalidResponse(format!("{} row: {}", table, err))
    })
}

pub(crate) fn decode_all<T: DeserializeOwned>(
    table: &str,
    rows: Vec<Value>,
) -> Result<Vec<T>, ConnectorError> {
    rows.into_iter().map(|row| decode(table, row)).collect()
}

pub(crate) fn decode_first<T: DeserializeOwned>(
    table: &str,
    rows: Vec<Value>,
) -> Result<Option<T>, ConnectorError> {
    rows.into_iter().next().map(|row| decode(table, row)).transpose()
}
