//! Keyword Alchemist client SDK.
//!
//! This crate provides a client library for frontends and tools to interact
//! with the keyword-alchemist API.
//!
//! # Example
//!
//! ```no_run
//! use alchemist_client::{AlchemistClient, ProcessOutcome};
//!
//! # async fn example() -> Result<(), alchemist_client::ClientError> {
//! let client = AlchemistClient::new("http://localhost:3002");
//!
//! let validation = client.validate_key("KWA-7G2-XYZ-9A").await?;
//! println!("{} credits remaining", validation.credits_remaining);
//!
//! let outcome = client
//!     .process_keywords("KWA-7G2-XYZ-9A", &["rust web frameworks".to_string()])
//!     .await?;
//!
//! match outcome {
//!     ProcessOutcome::Completed { processed, .. } => {
//!         println!("{} articles generated", processed.len());
//!     }
//!     ProcessOutcome::InsufficientCredits { rejected_keywords, .. } => {
//!         println!("{} keywords rejected", rejected_keywords.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod error;
mod types;

pub use client::{AlchemistClient, ClientOptions};
pub use error::ClientError;
pub use types::*;
