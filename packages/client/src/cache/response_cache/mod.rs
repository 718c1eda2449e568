//! Response cache modules
//!
//! Two-tier HTTP response cache: a byte-bounded memory tier in front of a
//! persistent tier backed by a [`StorageBackend`](crate::cache::StorageBackend).
//!
//! The functionality is organized into logical modules:
//!
//! - `core`: `ResponseCache` struct, construction and shared state
//! - `operations`: store/retrieve/invalidate and cacheability rules
//! - `eviction`: expired entry sweeping
//! - `sweeper`: the periodic background sweep task
//!
//! All mutation goes through a single state mutex, so no two operations on
//! the same cache interleave.

pub mod core;
pub mod eviction;
pub mod operations;
mod sweeper;

pub use core::ResponseCache;
