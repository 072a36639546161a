//! Bearer-token authentication.
//!
//! [`Manager`] runs on every request. A valid token attaches the caller as
//! `Arc<User>` to the request extensions; a rejected one attaches an
//! [`AuthFailure`] instead, which the authorization guards turn into a 401.
//! Requests without credentials pass through untouched so public routes work.

mod getheader;
mod manager;
mod manager_middleware;
mod method;

pub use getheader::*;
pub use manager::*;
pub use manager_middleware::*;

/// Why a presented token was not accepted
#[derive(Debug, Clone, PartialEq)]
pub struct AuthFailure(pub String);
