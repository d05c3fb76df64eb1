//! High-level orchestration: annotate lines, sync cached annotations into
//! server-side cart properties, transfer annotations between scopes.

use crate::cart::CartApi;
use crate::core::{LineSyncResult, ResolverSignals, Result};
use crate::reconcile::{Reconciler, ReconcilerConfig};
use crate::resolver::{candidate_keys, resolve_key};
use crate::store::{AnnotationStore, StorageBackend};

/// Ties the annotation store, resolver and reconciler together over a cart
/// collaborator.
///
/// One instance per browser/session context; all state lives in the
/// storage backend and on the server, so dropping and recreating the
/// facade loses nothing.
///
/// # Examples
///
/// ```no_run
/// use roomsync::{AnnotationSync, FileStorage, HttpCartClient, PageContext, ResolverSignals};
///
/// # async fn run() -> roomsync::Result<()> {
/// let storage = FileStorage::new("./annotations")?;
/// let cart = HttpCartClient::new("https://shop.example.com")?;
/// let mut sync = AnnotationSync::new(storage, cart);
///
/// let scope = PageContext::from_url(
///     "https://shop.example.com/apps/cart-saved-data?cartId=123",
/// )
/// .scope();
///
/// // Cache what the user typed for a saved-cart row.
/// let signals = ResolverSignals::new().sku("EP123").title("Blue Bunk Bed");
/// sync.annotate(&scope, &signals, "Toddler Room")?;
///
/// // Later, on the live cart: push cached annotations into cart properties.
/// for line in sync.sync(&scope).await? {
///     if !line.applied {
///         eprintln!("line {} not synced: {:?}", line.line, line.error);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct AnnotationSync<B: StorageBackend, C: CartApi> {
    store: AnnotationStore<B>,
    cart: C,
    reconciler: Reconciler,
}

impl<B: StorageBackend, C: CartApi> AnnotationSync<B, C> {
    pub fn new(backend: B, cart: C) -> Self {
        Self::with_config(backend, cart, ReconcilerConfig::new())
    }

    pub fn with_config(backend: B, cart: C, config: ReconcilerConfig) -> Self {
        Self {
            store: AnnotationStore::new(backend),
            cart,
            reconciler: Reconciler::new(config),
        }
    }

    /// Cache an annotation for the line identified by `signals`.
    ///
    /// The value is stored under the strongest available key; an empty
    /// value removes the entry. Fails with `UnresolvableKey` when the line
    /// offers no identity signal at all.
    pub fn annotate(&mut self, scope: &str, signals: &ResolverSignals, value: &str) -> Result<()> {
        let key = resolve_key(signals)?;
        self.store.set(scope, &key, value)
    }

    /// Cached annotation for a line, trying each candidate key in priority
    /// order. Returns `""` when nothing is cached.
    pub fn annotation(&self, scope: &str, signals: &ResolverSignals) -> String {
        let entries = self.store.all_entries(scope);
        candidate_keys(signals)
            .iter()
            .find_map(|key| entries.get(key))
            .cloned()
            .unwrap_or_default()
    }

    /// Push cached annotations into server-side line-item properties.
    ///
    /// Fetches a fresh cart snapshot, diffs it against the scope's cached
    /// entries and applies the resulting updates sequentially. Only the
    /// snapshot fetch itself can fail; everything downstream is reported
    /// in the per-line result list. An empty cache is a successful no-op.
    pub async fn sync(&self, scope: &str) -> Result<Vec<LineSyncResult>> {
        let entries = self.store.all_entries(scope);
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let snapshot = self.cart.fetch_lines().await?;
        let updates = self.reconciler.compute(&snapshot, &entries);
        Ok(self.reconciler.apply(&self.cart, updates).await)
    }

    /// Copy all annotations from a saved quote's scope into a destination
    /// scope (full overwrite).
    ///
    /// When the source scope could not be determined from context, pass
    /// `None`: the transfer is refused as a no-op rather than guessing and
    /// copying the wrong cart's annotations.
    pub fn transfer_scope(&mut self, source: Option<&str>, dest: &str) -> Result<bool> {
        match source {
            Some(source) => self.store.copy_scope(source, dest),
            None => Ok(false),
        }
    }

    pub fn store(&self) -> &AnnotationStore<B> {
        &self.store
    }

    pub fn cart(&self) -> &C {
        &self.cart
    }

    pub fn store_mut(&mut self) -> &mut AnnotationStore<B> {
        &mut self.store
    }
}
