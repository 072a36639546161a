pub(crate) mod admin;
pub(crate) mod auth;
pub mod health_checks;
pub(crate) mod notification;
pub(crate) mod order;
pub(crate) mod payment;
pub(crate) mod plan;
pub(crate) mod trial;
pub(crate) mod webhook;

pub use health_checks::*;
