//! Domain models shared by queries and handlers

pub mod aliases;
pub mod contract;

pub use contract::ContractRecord;
