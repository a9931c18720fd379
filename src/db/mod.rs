//! Database access for billboards and contracts

pub mod queries;

pub use queries::*;
