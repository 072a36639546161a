//! Routes under `/api/admin`, all behind the admin guard.

mod order;
mod plan;
mod statistics;
mod trial;
mod user;

pub use order::*;
pub use plan::*;
pub use statistics::*;
pub use trial::*;
pub use user::*;
