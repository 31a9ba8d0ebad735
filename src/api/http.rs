use super::response::{parse_product_response, parse_search_response};
use super::{AuthApi, ProductFetch, ProductSearch, SearchQuery};
use crate::config::StorefrontConfig;
use crate::error::ApiError;
use crate::models::{LoginRequest, LoginResponse, Product, ProductId, RegisterRequest};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// reqwest-backed client for the product and auth services
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    search_url: Url,
    product_url: Url,
    login_url: Url,
    register_url: Url,
    timeout: Duration,
}

impl HttpApi {
    /// Build a client from configuration; endpoint URLs are resolved once here
    pub fn new(config: &StorefrontConfig) -> Result<Self, ApiError> {
        let base = config.api_base_url.trim_end_matches('/');
        let timeout = config.request_timeout();
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            search_url: endpoint(base, &config.search_path)?,
            product_url: endpoint(base, &config.product_path)?,
            login_url: endpoint(base, &config.login_path)?,
            register_url: endpoint(base, &config.register_path)?,
            timeout,
        })
    }

    /// URL of the detail endpoint for one product; the id is percent-encoded
    pub fn product_url(&self, id: &ProductId) -> Result<Url, ApiError> {
        let mut url = self.product_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: &Url, body: &B) -> Result<Vec<u8>, ApiError> {
        ::log::debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.read_body(response).await
    }

    async fn read_body(&self, response: Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            ::log::debug!("Request answered with status {}", status);
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(bytes.to_vec())
    }

    fn classify(&self, error: reqwest::Error) -> ApiError {
        if error.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(error)
        }
    }
}

/// Joins a base URL and an endpoint path without dropping the base's own path
fn endpoint(base: &str, path: &str) -> Result<Url, ApiError> {
    let path = path.trim_start_matches('/');
    Ok(Url::parse(&format!("{}/{}", base, path))?)
}

impl ProductSearch for HttpApi {
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Product>, ApiError> {
        let body = SearchQuery {
            query: query.to_string(),
            cnt: count,
        };
        let bytes = self.post_json(&self.search_url, &body).await?;
        let products = parse_search_response(&bytes);
        ::log::debug!("Search for '{}' returned {} products", query, products.len());
        Ok(products)
    }
}

impl ProductFetch for HttpApi {
    async fn fetch(&self, id: &ProductId) -> Result<Option<Product>, ApiError> {
        let url = self.product_url(id)?;
        ::log::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let bytes = self.read_body(response).await?;
        parse_product_response(&bytes)
    }
}

impl AuthApi for HttpApi {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let bytes = self.post_json(&self.login_url, request).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        self.post_json(&self.register_url, request).await?;
        Ok(())
    }
}
