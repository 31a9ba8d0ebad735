//! Remote collaborators consumed by the client.
//!
//! The controller and page loaders only see the traits below; [`http::HttpApi`]
//! is the reqwest-backed implementation used by the binary, and tests plug in
//! in-memory doubles.

pub mod http;
pub mod response;

#[cfg(test)]
mod tests;

use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, Product, ProductId, RegisterRequest};
use serde::{Deserialize, Serialize};
use std::future::Future;

pub use http::HttpApi;
pub use response::{parse_product_response, parse_search_response, products_from_value};

/// Body of a search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    /// Result-count hint
    pub cnt: u32,
}

/// Free-text product search
pub trait ProductSearch: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
        count: u32,
    ) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;
}

/// Product lookup by id. `Ok(None)` means the service answered with an empty body.
pub trait ProductFetch: Send + Sync {
    fn fetch(&self, id: &ProductId)
    -> impl Future<Output = Result<Option<Product>, ApiError>> + Send;
}

/// Login and registration endpoints
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        request: &LoginRequest,
    ) -> impl Future<Output = Result<LoginResponse, ApiError>> + Send;

    fn register(&self, request: &RegisterRequest)
    -> impl Future<Output = Result<(), ApiError>> + Send;
}
