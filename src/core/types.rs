use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity key for one annotated cart line.
///
/// Keys are always namespaced by the signal that produced them (`line:`,
/// `sku:` or `title:`), so keys derived from different signal types can
/// never collide even when their raw values match textually. Construct
/// them through [`crate::resolver::resolve_key`], never by hand.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationKey(pub(crate) String);

impl AnnotationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnnotationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity signals available for one cart line or page row.
///
/// Different page types expose different subsets: the live cart carries a
/// cart-engine line key, the saved-cart page only a SKU and/or title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolverSignals {
    pub line_key: Option<String>,
    pub sku: Option<String>,
    pub title: Option<String>,
}

impl ResolverSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line_key(mut self, key: impl Into<String>) -> Self {
        self.line_key = Some(key.into());
        self
    }

    pub fn sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Read-only view of one server-side cart line at a point in time.
///
/// Built fresh on every reconciliation pass and never cached beyond it.
/// `line` is 1-based, matching the cart change endpoint's addressing.
#[derive(Debug, Clone)]
pub struct CartLineSnapshot {
    pub line: usize,
    pub quantity: u32,
    pub properties: HashMap<String, String>,
    pub signals: ResolverSignals,
}

/// The complete desired property set for one cart line.
///
/// The mutation endpoint replaces a line's properties wholesale, so this
/// always carries every property the line should keep, not a delta.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateOperation {
    pub line: usize,
    pub quantity: u32,
    pub properties: HashMap<String, String>,
}

/// Outcome of applying one [`UpdateOperation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineSyncResult {
    pub line: usize,
    pub applied: bool,
    pub error: Option<String>,
}

impl LineSyncResult {
    pub fn applied(line: usize) -> Self {
        Self {
            line,
            applied: true,
            error: None,
        }
    }

    pub fn failed(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            applied: false,
            error: Some(reason.into()),
        }
    }
}
