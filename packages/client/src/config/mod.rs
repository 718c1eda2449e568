//! Configuration validation shared by the cache and retry components
//!
//! The configuration records themselves live next to the component that
//! consumes them (`cache::CacheConfig`, `retry::RetryPolicy`).

pub mod validation;

pub use validation::{ConfigResult, ConfigValidator, ConfigurationError, Validator};
