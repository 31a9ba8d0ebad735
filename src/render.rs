use crate::models::Product;
use crate::product::{ProductPage, ProductView, humanize_key};
use crate::search::SearchSnapshot;
use std::fmt::Write;

/// Currency sign used when a record does not name one
pub const DEFAULT_CURRENCY: &str = "₽";

/// Formats a price with space-grouped thousands and up to two decimals
pub fn format_price(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    match frac {
        0 => format!("{}{}", sign, grouped),
        f if f % 10 == 0 => format!("{}{},{}", sign, grouped, f / 10),
        f => format!("{}{},{:02}", sign, grouped, f),
    }
}

/// Price followed by the record's currency, or `None` without a price
pub fn price_label(product: &Product) -> Option<String> {
    product.price().map(|price| {
        format!(
            "{} {}",
            format_price(price),
            product.currency().unwrap_or(DEFAULT_CURRENCY)
        )
    })
}

/// One line per product: id, name and price
pub fn render_card(product: &Product) -> String {
    match price_label(product) {
        Some(price) => format!("[{}] {}  {}", product.id, product.display_name(), price),
        None => format!("[{}] {}", product.id, product.display_name()),
    }
}

pub fn render_grid(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found ( - _ - )".to_string();
    }
    products
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result area of the search view
pub fn render_search(snapshot: &SearchSnapshot) -> String {
    let mut out = String::new();
    if snapshot.loading {
        out.push_str("Searching...\n");
    }
    if snapshot.timed_out {
        out.push_str("Search timed out\n");
    }
    if snapshot.query.trim().is_empty() {
        out.push_str("Type to search products");
    } else {
        out.push_str(&render_grid(&snapshot.results));
    }
    out
}

pub fn render_product_page(page: &ProductPage) -> String {
    match page {
        ProductPage::Loaded(view) => render_product_view(view),
        ProductPage::NotFound => "Product not found ( v _ v )\nBack to search: /".to_string(),
        ProductPage::Failed { message } => format!("{}\nBack to search: /", message),
    }
}

fn render_product_view(view: &ProductView) -> String {
    let product = &view.product;
    let details = product.details.as_ref();
    let mut out = String::new();

    let _ = writeln!(out, "{}", product.display_name());
    if let Some(tags) = details.and_then(|d| d.tags.as_ref()).filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "Tags: {}", tags.join(", "));
    }
    if let Some(price) = price_label(product) {
        let _ = writeln!(out, "Price: {}", price);
    }

    match view.current_picture() {
        Some(picture) => match view.carousel.position_label() {
            Some(label) => {
                let _ = writeln!(out, "Picture {}: {}", label, picture);
            }
            None => {
                let _ = writeln!(out, "Picture: {}", picture);
            }
        },
        None => {
            let _ = writeln!(out, "Picture: ( X o X )");
        }
    }

    if let Some(text) = details.and_then(|d| d.text.as_deref()).filter(|t| !t.is_empty()) {
        let _ = writeln!(out, "\nDescription\n{}", text);
    }

    if !view.attributes.is_empty() {
        let _ = writeln!(out, "\nCharacteristics");
        let labels: Vec<String> = view.attributes.iter().map(|(k, _)| humanize_key(k)).collect();
        let width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        for (label, (_, value)) in labels.iter().zip(&view.attributes) {
            let pad = width - label.chars().count();
            let _ = writeln!(out, "  {}{}  {}", label, " ".repeat(pad), value.display());
        }
    }

    if let Some(fetched_at) = details.and_then(|d| d.fetched_at.as_deref()) {
        let date = fetched_at.split('T').next().unwrap_or(fetched_at);
        let _ = writeln!(out, "\nUpdated: {}", date);
    }
    if let Some(url) = details.and_then(|d| d.url.as_deref()) {
        let _ = writeln!(out, "Original page: {}", url);
    }

    out.trim_end().to_string()
}
