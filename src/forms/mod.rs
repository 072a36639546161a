//! Request bodies and query strings.
//!
//! Length and range rules are declared with `serde_valid`; presence checks
//! that answer with a specific message live on the forms themselves.

pub mod admin;
pub mod auth;
pub mod order;
pub mod trial;
pub mod webhook;

use serde_valid::Validate;

use crate::helpers::ApiError;

/// Run the declared rules of a form, answering 400 on the first failure
pub fn validate<T: Validate>(form: &T) -> Result<(), ApiError> {
    form.validate().map_err(|errors| {
        tracing::debug!("form rejected: {}", errors);
        ApiError::bad_request(format!("Dados inválidos: {}", errors))
    })
}

pub(crate) fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Trimmed value, `None` when blank
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
