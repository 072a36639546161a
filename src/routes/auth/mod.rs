mod login;
mod password;
mod profile;
mod register;

pub use login::*;
pub use password::*;
pub use profile::*;
pub use register::*;
