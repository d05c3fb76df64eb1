// ============================================================================
// RoomSync Library
// ============================================================================
//
// Keeps free-text "Assign to Room" annotations attached to the correct cart
// line across page loads, page types and server round-trips. Three parts:
// a key resolver deriving stable identity keys from whatever signals a page
// exposes, a scoped annotation store over persistent storage, and a cart
// reconciler that pushes cached annotations into server-side line-item
// properties with per-line idempotence.

pub mod cart;
pub mod context;
pub mod core;
pub mod facade;
pub mod quote;
pub mod reconcile;
pub mod resolver;
pub mod store;

// Re-export main types for convenience
pub use crate::core::{
    AnnotationKey, CartLineSnapshot, LineSyncResult, ResolverSignals, Result, SyncError,
    UpdateOperation,
};
pub use cart::{CartApi, HttpCartClient};
pub use context::PageContext;
pub use facade::AnnotationSync;
pub use quote::{Quote, QuoteItem};
pub use reconcile::{DEFAULT_ANNOTATION_PROPERTY, Reconciler, ReconcilerConfig, compute_updates};
pub use store::{AnnotationStore, FileStorage, MemoryStorage, StorageBackend};
