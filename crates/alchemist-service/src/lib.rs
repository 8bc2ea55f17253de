//! Keyword Alchemist HTTP API Service.
//!
//! This crate provides the HTTP API for the keyword-alchemist backend,
//! including:
//!
//! - Access key validation
//! - Credit-metered keyword-to-article processing
//! - Stripe checkout and webhook handling (key minting)
//! - Administrative key management and analytics resets
//!
//! # Authentication
//!
//! Clients authenticate by presenting a prepaid access key in the request
//! body; administrative endpoints require the `x-admin-key` header.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers need async for consistency

pub mod auth;
pub mod config;
pub mod error;
pub mod generator;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod stripe;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use generator::{BlogPost, ContentGenerator, GeneratorError};
pub use routes::create_router;
pub use state::AppState;
pub use stripe::{StripeClient, StripeError};
