//! External cart collaborator: snapshot source and line mutation endpoint.

pub mod http;

use crate::core::{CartLineSnapshot, Result, UpdateOperation};
use async_trait::async_trait;

pub use http::HttpCartClient;

/// Contract the reconciler relies on.
///
/// `fetch_lines` must reflect the latest committed server state.
/// `change_line` applies an operation's properties as the line's complete
/// property set; the server is assumed to serialize concurrent mutations
/// unsafely, so callers must not issue overlapping `change_line` calls for
/// the same cart.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn fetch_lines(&self) -> Result<Vec<CartLineSnapshot>>;

    async fn change_line(&self, update: &UpdateOperation) -> Result<()>;
}
