//! Cart reconciliation: make server-side line-item properties reflect the
//! annotation store, touching only lines that actually differ and never
//! wiping properties this crate does not own.

use crate::cart::CartApi;
use crate::core::{AnnotationKey, CartLineSnapshot, LineSyncResult, UpdateOperation};
use crate::resolver::{candidate_keys, normalize};
use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;

/// Property name the original storefront writes annotations under.
pub const DEFAULT_ANNOTATION_PROPERTY: &str = "Assign to Room";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reconciler configuration
#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    /// Line-item property the annotation is written to.
    pub property_name: String,

    /// Per-call timeout on line mutations. Expiry counts as that line's
    /// failure; the batch continues.
    pub request_timeout: Duration,
}

impl ReconcilerConfig {
    pub fn new() -> Self {
        Self {
            property_name: DEFAULT_ANNOTATION_PROPERTY.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the annotation property name
    pub fn property_name(mut self, name: &str) -> Self {
        self.property_name = name.to_string();
        self
    }

    /// Set the per-call mutation timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the minimal set of line updates needed to bring server-side
/// properties in line with cached annotations. Pure; no suspension.
///
/// Per line:
/// - look up the cached annotation under each candidate key in priority
///   order (a note cached from the saved-cart page lives under a `sku:` or
///   `title:` key even when the live line also has a line key)
/// - no cached value ⇒ no update; the cache is never a destructive source
///   and must not clear an annotation entered from another browser
/// - normalized-equal values ⇒ no update (idempotence, no redundant calls)
/// - otherwise emit the line's complete property set: every existing
///   non-empty property preserved, plus the annotation property.
pub fn compute_updates(
    snapshot: &[CartLineSnapshot],
    entries: &HashMap<AnnotationKey, String>,
    property_name: &str,
) -> Vec<UpdateOperation> {
    let mut updates = Vec::new();

    for line in snapshot {
        // Lines with no identity signal at all are skipped; the annotation
        // feature is simply unavailable for them.
        let cached = candidate_keys(&line.signals)
            .iter()
            .find_map(|key| entries.get(key))
            .map(String::as_str)
            .unwrap_or("");
        if cached.is_empty() {
            continue;
        }

        let current = line
            .properties
            .get(property_name)
            .map(String::as_str)
            .unwrap_or("");
        if normalize(current) == normalize(cached) {
            continue;
        }

        let mut properties: HashMap<String, String> = line
            .properties
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        properties.insert(property_name.to_string(), cached.to_string());

        updates.push(UpdateOperation {
            line: line.line,
            quantity: line.quantity,
            properties,
        });
    }

    updates
}

/// Applies computed updates against the cart collaborator.
pub struct Reconciler {
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// [`compute_updates`] with this reconciler's property name.
    pub fn compute(
        &self,
        snapshot: &[CartLineSnapshot],
        entries: &HashMap<AnnotationKey, String>,
    ) -> Vec<UpdateOperation> {
        compute_updates(snapshot, entries, &self.config.property_name)
    }

    /// Apply updates strictly sequentially, in ascending line order.
    ///
    /// The cart endpoint does not serialize concurrent mutations safely, so
    /// each call completes before the next is issued. A failed or timed-out
    /// call is recorded for that line and the batch continues; this never
    /// returns an error.
    pub async fn apply(
        &self,
        cart: &dyn CartApi,
        mut updates: Vec<UpdateOperation>,
    ) -> Vec<LineSyncResult> {
        updates.sort_by_key(|update| update.line);

        let mut results = Vec::with_capacity(updates.len());
        for update in &updates {
            let outcome =
                tokio::time::timeout(self.config.request_timeout, cart.change_line(update)).await;
            let result = match outcome {
                Ok(Ok(())) => {
                    debug!("Applied annotation update to cart line {}", update.line);
                    LineSyncResult::applied(update.line)
                }
                Ok(Err(err)) => {
                    warn!("Cart line {} update failed: {err}", update.line);
                    LineSyncResult::failed(update.line, err.to_string())
                }
                Err(_) => {
                    let reason = crate::core::SyncError::Timeout(self.config.request_timeout);
                    warn!("Cart line {} update timed out", update.line);
                    LineSyncResult::failed(update.line, reason.to_string())
                }
            };
            results.push(result);
        }
        results
    }
}
