use crate::models::ProductId;
use percent_encoding::percent_decode_str;
use url::Url;

/// Pages reachable in the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Search,
    Product(ProductId),
    Login,
    Register,
}

impl Route {
    /// Resolves a path or a full URL. Unknown paths fall back to search.
    pub fn parse(input: &str) -> Self {
        let path = match Url::parse(input) {
            Ok(url) => url.path().to_string(),
            Err(_) => input.split(['?', '#']).next().unwrap_or_default().to_string(),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Search,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["product", id] => Route::Product(ProductId::Text(decode_segment(id))),
            _ => {
                ::log::debug!("No route for {}, redirecting to /", path);
                Route::Search
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Search => "/".to_string(),
            Route::Product(id) => format!("/product/{}", id),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
        }
    }
}

/// Undo percent-encoding in a path segment; `+` and `&` are literal here
fn decode_segment(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
