mod checkout;
mod status;

pub use checkout::*;
pub use status::*;
