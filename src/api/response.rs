use crate::error::ApiError;
use crate::models::Product;
use serde_json::Value;

/// Decodes a search response body.
///
/// Both `{"items": [...], "total": n}` and a bare array are accepted. Anything
/// else, including a body that is not JSON, yields an empty list. Individual
/// items that do not decode as products are skipped.
pub fn parse_search_response(body: &[u8]) -> Vec<Product> {
    match serde_json::from_slice::<Value>(body) {
        Ok(value) => products_from_value(value),
        Err(e) => {
            ::log::warn!("Search response is not valid JSON: {}", e);
            Vec::new()
        }
    }
}

/// Extracts the product list from an already-parsed search response
pub fn products_from_value(value: Value) -> Vec<Product> {
    let items = match value {
        Value::Object(mut body) => match body.remove("items") {
            Some(Value::Array(items)) => items,
            _ => {
                ::log::debug!("Search response object has no items array");
                return Vec::new();
            }
        },
        Value::Array(items) => items,
        other => {
            ::log::debug!("Unexpected search response shape: {}", other);
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Product>(item) {
            Ok(product) => Some(product),
            Err(e) => {
                ::log::debug!("Skipping malformed search item: {}", e);
                None
            }
        })
        .collect()
}

/// Decodes a product detail body. An empty body or a JSON `null` is `None`.
pub fn parse_product_response(body: &[u8]) -> Result<Option<Product>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    let product: Option<Product> = serde_json::from_slice(body)?;
    Ok(product)
}
