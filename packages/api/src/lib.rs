//! Harbor public API
//!
//! Client-side HTTP response caching and retry orchestration. [`Harbor`]
//! puts a multi-tier [`ResponseCache`] in front of a [`RetryExecutor`]; the
//! caller supplies the executor that actually performs a request.
//!
//! ```no_run
//! use harbor::{Harbor, Outcome, RequestDescriptor, RetryPolicy};
//!
//! # async fn run() -> Result<(), harbor::ConfigurationError> {
//! let harbor = Harbor::builder().retry(RetryPolicy::aggressive()).build()?;
//! let request = RequestDescriptor::get("https://api.example.com/items");
//!
//! let outcome = harbor
//!     .execute(&request, |req| async move {
//!         // Perform `req` with any transport here.
//!         let _ = req;
//!         Outcome::ok("[]")
//!     })
//!     .await;
//! assert!(outcome.is_success());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;
mod harbor;

pub use builder::HarborBuilder;
pub use harbor::Harbor;
pub use http::Method;

// Re-export the client types callers need alongside the facade
pub use harbor_client::prelude::*;
pub use harbor_client::{cache, retry, telemetry};
