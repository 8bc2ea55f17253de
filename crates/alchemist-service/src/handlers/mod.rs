//! API handlers.

pub mod admin;
pub mod checkout;
pub mod health;
pub mod keywords;
pub mod validate;
pub mod webhooks;
