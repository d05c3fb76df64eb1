//! Explicit page-identity context.
//!
//! The host page knows which cart/quote instance it is rendering (a
//! `cartId` query parameter on saved-cart pages, an injected cart token on
//! the live cart). That identity is passed in here explicitly instead of
//! being read from ambient page state, which keeps scope derivation pure
//! and testable.

use url::Url;

/// Scope used when no cart id or token is available (the live cart page
/// before a token is injected).
pub const DEFAULT_SCOPE: &str = "cart";

/// Identity of the page a reconciliation pass runs against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    pub cart_id: Option<String>,
    pub cart_token: Option<String>,
}

impl PageContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cart_id(mut self, id: impl Into<String>) -> Self {
        self.cart_id = Some(id.into());
        self
    }

    pub fn cart_token(mut self, token: impl Into<String>) -> Self {
        self.cart_token = Some(token.into());
        self
    }

    /// Extract a context from a page URL's `cartId` query parameter.
    ///
    /// Unparseable URLs and missing/empty parameters yield an empty
    /// context, which in turn scopes to [`DEFAULT_SCOPE`].
    pub fn from_url(page_url: &str) -> Self {
        let Ok(url) = Url::parse(page_url) else {
            return Self::default();
        };
        let cart_id = url
            .query_pairs()
            .find(|(name, _)| name == "cartId")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());
        Self {
            cart_id,
            cart_token: None,
        }
    }

    /// Scope identifier partitioning the annotation key space.
    ///
    /// Cart id wins over cart token; with neither, everything lands in the
    /// shared [`DEFAULT_SCOPE`].
    pub fn scope(&self) -> String {
        self.cart_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .or(self.cart_token.as_deref().filter(|t| !t.is_empty()))
            .unwrap_or(DEFAULT_SCOPE)
            .to_string()
    }
}
