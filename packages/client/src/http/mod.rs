//! Request and outcome types consumed by the cache and retry core
//!
//! Wire-level transport is delegated to the caller's executor; these types
//! carry only what key derivation, cacheability and retry decisions need.

pub mod compression;
pub mod outcome;
pub mod request;

pub use outcome::Outcome;
pub use request::RequestDescriptor;
