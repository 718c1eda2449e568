pub mod types;

pub use types::{Cancelled, ErrorKind, StorageError, StorageResult};
