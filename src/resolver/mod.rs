//! Key resolution: derive a stable annotation key for a cart line from
//! whatever identity signals the current page exposes.
//!
//! The live cart exposes a cart-engine line key, the saved-cart page only a
//! SKU or a title, so the same logical item must resolve to the same key on
//! both page types once the stronger signals are gone. Everything here is
//! pure; callers feed in signals once the page data is available.

use crate::core::{AnnotationKey, ResolverSignals, Result, SyncError};

/// Maximum length (in chars) of the normalized title used for title keys.
/// Titles are the weakest signal; capping keeps keys stable when themes
/// append badges or availability text to long product names.
pub const TITLE_KEY_MAX: usize = 120;

/// Collapse whitespace runs to single spaces, trim, lowercase.
///
/// This is the basis for cross-page matching: a title scraped from the
/// saved-cart page and a `product_title` from the cart snapshot must
/// normalize to the identical string.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Resolve exactly one key for a line, first available signal wins.
///
/// Priority: line key, then SKU, then title. No fallback mixing — a line
/// with both a SKU and a title always caches under its SKU key. With no
/// usable signal at all this fails with [`SyncError::UnresolvableKey`]
/// rather than inventing a key that can never be looked up again.
pub fn resolve_key(signals: &ResolverSignals) -> Result<AnnotationKey> {
    candidate_keys(signals)
        .into_iter()
        .next()
        .ok_or(SyncError::UnresolvableKey)
}

/// All keys derivable from the given signals, strongest first.
///
/// The reconciler uses this for fallback lookup: an annotation cached from
/// the saved-cart page lives under a `sku:`/`title:` key, while the live
/// cart line also carries a line key, so a single-key lookup would miss it.
pub fn candidate_keys(signals: &ResolverSignals) -> Vec<AnnotationKey> {
    let mut keys = Vec::with_capacity(3);

    if let Some(line_key) = signals.line_key.as_deref() {
        let line_key = line_key.trim();
        if !line_key.is_empty() {
            keys.push(AnnotationKey(format!("line:{line_key}")));
        }
    }

    if let Some(sku) = signals.sku.as_deref() {
        let sku = normalize(sku);
        if !sku.is_empty() {
            keys.push(AnnotationKey(format!("sku:{sku}")));
        }
    }

    if let Some(title) = signals.title.as_deref() {
        let title: String = normalize(title).chars().take(TITLE_KEY_MAX).collect();
        if !title.is_empty() {
            keys.push(AnnotationKey(format!("title:{title}")));
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_whitespace() {
        assert_eq!(normalize("  Blue   Bunk\t\nBed  "), "blue bunk bed");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_line_key_wins() {
        let signals = ResolverSignals::new()
            .line_key("a")
            .sku("b")
            .title("c");
        assert_eq!(resolve_key(&signals).unwrap().as_str(), "line:a");
    }

    #[test]
    fn test_sku_beats_title() {
        let signals = ResolverSignals::new().sku("b").title("c");
        assert_eq!(resolve_key(&signals).unwrap().as_str(), "sku:b");
    }

    #[test]
    fn test_title_fallback_is_normalized() {
        let signals = ResolverSignals::new().title("Blue  Bunk Bed");
        assert_eq!(resolve_key(&signals).unwrap().as_str(), "title:blue bunk bed");
    }

    #[test]
    fn test_sku_is_normalized() {
        let signals = ResolverSignals::new().sku(" EP123 ");
        assert_eq!(resolve_key(&signals).unwrap().as_str(), "sku:ep123");
    }

    #[test]
    fn test_title_capped_at_120_chars() {
        let long = "x".repeat(300);
        let signals = ResolverSignals::new().title(long);
        let key = resolve_key(&signals).unwrap();
        assert_eq!(key.as_str().len(), "title:".len() + TITLE_KEY_MAX);
    }

    #[test]
    fn test_blank_signals_count_as_absent() {
        let signals = ResolverSignals::new().line_key("   ").sku(" \t").title("Crib");
        assert_eq!(resolve_key(&signals).unwrap().as_str(), "title:crib");
    }

    #[test]
    fn test_no_signal_is_unresolvable() {
        let err = resolve_key(&ResolverSignals::new()).unwrap_err();
        assert!(matches!(err, SyncError::UnresolvableKey));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let signals = ResolverSignals::new().sku("EP123").title("Bunk Bed");
        let first = resolve_key(&signals).unwrap();
        let second = resolve_key(&signals).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_candidate_keys_in_priority_order() {
        let signals = ResolverSignals::new()
            .line_key("k1")
            .sku("EP9")
            .title("Toddler Desk");
        let keys: Vec<String> = candidate_keys(&signals)
            .into_iter()
            .map(|k| k.as_str().to_string())
            .collect();
        assert_eq!(keys, vec!["line:k1", "sku:ep9", "title:toddler desk"]);
    }
}
