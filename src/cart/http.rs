//! HTTP implementation of [`CartApi`] against the storefront cart
//! endpoints: `GET /cart.js` for snapshots, `POST /cart/change.js` for
//! per-line mutations.

use crate::cart::CartApi;
use crate::core::{CartLineSnapshot, ResolverSignals, Result, SyncError, UpdateOperation};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use url::Url;

pub struct HttpCartClient {
    base: Url,
    http: reqwest::Client,
}

impl HttpCartClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| SyncError::CartRequest(format!("Invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            base,
            http: reqwest::Client::new(),
        })
    }

    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self> {
        let base = Url::parse(base_url)
            .map_err(|e| SyncError::CartRequest(format!("Invalid base URL '{base_url}': {e}")))?;
        Ok(Self { base, http })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|e| SyncError::CartRequest(format!("Invalid endpoint '{path}': {e}")))
    }
}

#[async_trait]
impl CartApi for HttpCartClient {
    async fn fetch_lines(&self) -> Result<Vec<CartLineSnapshot>> {
        let url = self.endpoint("/cart.js")?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::CartRequest(e.to_string()))?;
        if !response.status().is_success() {
            return Err(SyncError::CartRequest(format!(
                "Cart snapshot returned {}",
                response.status()
            )));
        }
        let payload: CartPayload = response
            .json()
            .await
            .map_err(|e| SyncError::CartRequest(format!("Malformed cart payload: {e}")))?;
        Ok(payload.into_snapshots())
    }

    async fn change_line(&self, update: &UpdateOperation) -> Result<()> {
        let url = self.endpoint("/cart/change.js")?;
        let response = self
            .http
            .post(url)
            .json(update)
            .send()
            .await
            .map_err(|e| SyncError::LineUpdate {
                line: update.line,
                reason: e.to_string(),
            })?;
        if !response.status().is_success() {
            return Err(SyncError::LineUpdate {
                line: update.line,
                reason: format!("Cart change returned {}", response.status()),
            });
        }
        Ok(())
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Deserialize)]
struct CartPayload {
    #[serde(default)]
    items: Vec<CartItemPayload>,
}

#[derive(Debug, Deserialize)]
struct CartItemPayload {
    key: Option<String>,
    sku: Option<String>,
    product_title: Option<String>,
    quantity: u32,
    // The cart API returns null for properties it has dropped, and some
    // themes write empty strings; both are scrubbed here.
    #[serde(default)]
    properties: Option<HashMap<String, serde_json::Value>>,
}

impl CartPayload {
    fn into_snapshots(self) -> Vec<CartLineSnapshot> {
        self.items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| item.into_snapshot(idx + 1))
            .collect()
    }
}

impl CartItemPayload {
    fn into_snapshot(self, line: usize) -> CartLineSnapshot {
        let properties = self
            .properties
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    serde_json::Value::Null => return None,
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                if value.is_empty() {
                    return None;
                }
                Some((name, value))
            })
            .collect();

        let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

        CartLineSnapshot {
            line,
            quantity: self.quantity,
            properties,
            signals: ResolverSignals {
                line_key: non_empty(self.key),
                sku: non_empty(self.sku),
                title: non_empty(self.product_title),
            },
        }
    }
}
