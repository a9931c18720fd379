//! HTTP route handlers outside the pricing engine

pub mod contracts;
pub mod health;
