pub(crate) mod json;

pub use json::ApiError;
