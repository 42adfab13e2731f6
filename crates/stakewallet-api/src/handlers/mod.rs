//! HTTP handlers

pub mod health;
pub mod transaction;
pub mod wallet;
