//! Response shapes that extend a table row with joined fields.

pub mod order;
pub mod statistics;
pub mod trial;
pub mod user;
