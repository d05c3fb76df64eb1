pub mod error;
pub mod types;

pub use error::{Result, SyncError};
pub use types::{AnnotationKey, CartLineSnapshot, LineSyncResult, ResolverSignals, UpdateOperation};
