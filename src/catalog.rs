//! Product catalog — memoized lookups keyed by barcode.
//!
//! Barcodes are validated before anything else touches them. A cache hit
//! resolves with no network traffic at all; a miss hands the host a
//! fetch instruction for the lookup proxy, and the response comes back
//! through [`ingest_lookup`], which stores the product before the
//! confirmation prompt goes out. Entries are never evicted — the cache
//! persists with the rest of the session state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Sugar figures as reported by the lookup proxy. `sugars_serving` is
/// the proxy-computed total container sugar; `sugars_100g` is the raw
/// label value used for the sugar-free test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutriments {
    pub sugars_100g: Option<f64>,
    pub sugars_serving: Option<f64>,
}

/// The typed subset of a lookup response the engine reads. Unknown proxy
/// fields are dropped on ingest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub product_name: Option<String>,
    pub serving_size: Option<String>,
    pub nutriments: Nutriments,
}

impl Product {
    /// Name for user-facing messages; lookup data often omits it.
    pub fn display_name(&self) -> &str {
        self.product_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or("this product")
    }
}

/// Barcode → product. Insertion order is irrelevant and entries are
/// never evicted.
pub type ProductCache = HashMap<String, Product>;

/// A barcode is a non-empty string of ASCII digits.
pub fn valid_barcode(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit())
}

/// Lookup-proxy URL for a barcode.
pub fn lookup_url(barcode: &str) -> String {
    format!("/api/proxy/product/{barcode}")
}

/// Outcome of resolving a barcode against the cache.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Cached — usable immediately, no network involved.
    Cached(Product),
    /// Not cached — the host must fetch `url` and feed the response
    /// back through [`ingest_lookup`].
    NeedsFetch { url: String },
}

/// Resolve a barcode: validate, then consult the cache.
pub fn resolve(cache: &ProductCache, barcode: &str) -> Result<Resolution, EngineError> {
    if !valid_barcode(barcode) {
        return Err(EngineError::InvalidBarcode);
    }
    match cache.get(barcode) {
        Some(product) => Ok(Resolution::Cached(product.clone())),
        None => Ok(Resolution::NeedsFetch {
            url: lookup_url(barcode),
        }),
    }
}

/// Ingest a lookup-proxy response body. A `status: "error"` marker or a
/// missing `product` object means the proxy had nothing usable; a body
/// that is not JSON at all means the lookup failed outright. On success
/// the product is cached under `barcode` before being returned.
pub fn ingest_lookup(
    cache: &mut ProductCache,
    barcode: &str,
    payload: &str,
) -> Result<Product, EngineError> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|err| {
        tracing::warn!(%barcode, %err, "lookup response was not JSON");
        EngineError::LookupFailed
    })?;

    if value.get("status").and_then(|s| s.as_str()) == Some("error")
        || value.get("product").is_none()
    {
        return Err(EngineError::ProductNotFound(
            "Product data is invalid.".to_string(),
        ));
    }

    let product: Product =
        serde_json::from_value(value["product"].clone()).map_err(|err| {
            tracing::warn!(%barcode, %err, "lookup product shape unreadable");
            EngineError::LookupFailed
        })?;

    cache.insert(barcode.to_string(), product.clone());
    Ok(product)
}
