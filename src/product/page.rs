use super::carousel::ImageCarousel;
use super::projector::extra_attributes;
use crate::api::ProductFetch;
use crate::models::{AttributeValue, Product, ProductId};

/// Message shown when the detail request fails
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load product";

/// Everything the detail view needs, computed once when the record arrives
#[derive(Debug, Clone)]
pub struct ProductView {
    pub product: Product,
    pub attributes: Vec<(String, AttributeValue)>,
    pub carousel: ImageCarousel,
}

impl ProductView {
    pub fn new(product: Product) -> Self {
        let attributes = extra_attributes(&product);
        let carousel = ImageCarousel::new(product.picture_urls().len());
        Self {
            product,
            attributes,
            carousel,
        }
    }

    pub fn current_picture(&self) -> Option<&str> {
        self.carousel.current(self.product.picture_urls())
    }
}

/// Outcome of opening a product detail page
#[derive(Debug, Clone)]
pub enum ProductPage {
    Loaded(Box<ProductView>),
    /// No id, or the service had no record for it
    NotFound,
    /// Blocking error with a way back to search
    Failed { message: String },
}

impl ProductPage {
    pub async fn load<F: ProductFetch>(fetch: &F, id: &ProductId) -> Self {
        if id.is_blank() {
            return ProductPage::NotFound;
        }

        match fetch.fetch(id).await {
            Ok(Some(product)) if product.details.is_some() => {
                ::log::debug!("Loaded product {}", id);
                ProductPage::Loaded(Box::new(ProductView::new(product)))
            }
            Ok(_) => {
                ::log::info!("Product {} has no detail record", id);
                ProductPage::NotFound
            }
            Err(e) => {
                ::log::error!("Product fetch error for {}: {}", id, e);
                ProductPage::Failed {
                    message: LOAD_FAILED_MESSAGE.to_string(),
                }
            }
        }
    }
}
