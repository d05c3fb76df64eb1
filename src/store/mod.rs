pub mod annotations;
pub mod backend;

pub use annotations::AnnotationStore;
pub use backend::{FileStorage, MemoryStorage, StorageBackend};
