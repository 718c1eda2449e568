//! Harbor builder API
//!
//! Provides the fluent builder that assembles a [`Harbor`](crate::Harbor)
//! from cache, storage and retry configuration.

pub mod core;

pub use core::*;
