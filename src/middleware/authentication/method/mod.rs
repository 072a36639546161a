mod f_bearer;

pub use f_bearer::try_bearer;
