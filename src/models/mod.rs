mod notification;
mod order;
mod plan;
mod trial;
pub mod user;

pub use notification::*;
pub use order::*;
pub use plan::*;
pub use trial::*;
pub use user::*;
