pub mod auth;
pub mod product;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use product::{AttributeValue, Attributes, Product, ProductDetails, ProductId};
