use crate::models::{AttributeValue, Product};

/// Attribute names with a fixed meaning. They are rendered by dedicated
/// widgets and never listed among the extra attributes.
pub const KNOWN_FIELDS: [&str; 9] = [
    "id",
    "url",
    "name",
    "tags",
    "text",
    "price",
    "currency",
    "fetched_at",
    "picture_urls",
];

/// Marketplace-specific attributes worth displaying, in source order.
///
/// Known field names (exact, case-sensitive) and empty values are dropped.
pub fn extra_attributes(product: &Product) -> Vec<(String, AttributeValue)> {
    let Some(details) = product.details.as_ref() else {
        return Vec::new();
    };

    details
        .extra
        .iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(key))
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// `screen_size` -> `Screen Size`
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attributes, ProductDetails};
    use serde_json::Number;

    fn product_with(extra: Attributes) -> Product {
        Product::new("p-1", "Sample").with_details(ProductDetails {
            extra,
            ..ProductDetails::default()
        })
    }

    #[test]
    fn test_known_fields_are_excluded() {
        let extra: Attributes = [
            ("price", AttributeValue::from("999")),
            ("brand", AttributeValue::from("Acme")),
            ("picture_urls", AttributeValue::StringArray(vec!["x".into()])),
            ("Name", AttributeValue::from("case differs")),
        ]
        .into_iter()
        .collect();

        let attrs = extra_attributes(&product_with(extra));
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["brand", "Name"]);
    }

    #[test]
    fn test_empty_values_are_dropped() {
        let extra: Attributes = [
            ("color", AttributeValue::from("")),
            ("size", AttributeValue::Null),
            ("weight", AttributeValue::from("2kg")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            extra_attributes(&product_with(extra)),
            vec![("weight".to_string(), AttributeValue::from("2kg"))]
        );
    }

    #[test]
    fn test_order_and_non_string_values_survive() {
        let extra: Attributes = [
            ("ports", AttributeValue::StringArray(vec!["usb".into(), "hdmi".into()])),
            ("cores", AttributeValue::Number(Number::from(8))),
            ("empty_list", AttributeValue::StringArray(vec![])),
        ]
        .into_iter()
        .collect();

        let keys: Vec<String> = extra_attributes(&product_with(extra))
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["ports", "cores", "empty_list"]);
    }

    #[test]
    fn test_absent_record_gives_nothing() {
        assert!(extra_attributes(&Product::new("p-2", "Bare")).is_empty());
    }

    #[test]
    fn test_from_wire_record() {
        let product: Product = serde_json::from_str(
            r#"{"id": 1, "dataRow": {"url": "https://m.test/1", "screen_size": "6.1\"", "os": null, "ram_gb": 8}}"#,
        )
        .unwrap();
        let keys: Vec<String> = extra_attributes(&product).into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["screen_size", "ram_gb"]);
    }

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("screen_size"), "Screen Size");
        assert_eq!(humanize_key("color"), "Color");
        assert_eq!(humanize_key("__battery__life"), "Battery Life");
        assert_eq!(humanize_key("ёмкость_л"), "Ёмкость Л");
        assert_eq!(humanize_key(""), "");
    }
}
