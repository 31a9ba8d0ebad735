use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::fmt;

/// Stable product identifier, numeric or textual depending on the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    Number(i64),
    Text(String),
}

impl ProductId {
    /// True for an empty or whitespace-only textual id
    pub fn is_blank(&self) -> bool {
        matches!(self, ProductId::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{}", n),
            ProductId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Text(value.to_string())
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Number(value)
    }
}

/// Value of a marketplace-specific attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    String(String),
    Number(Number),
    StringArray(Vec<String>),
}

impl AttributeValue {
    /// Null or empty string. Arrays and numbers always count as present.
    pub fn is_empty(&self) -> bool {
        match self {
            AttributeValue::Null => true,
            AttributeValue::String(s) => s.is_empty(),
            AttributeValue::Number(_) | AttributeValue::StringArray(_) => false,
        }
    }

    /// Text shown next to the attribute name; arrays are joined with ", "
    pub fn display(&self) -> String {
        match self {
            AttributeValue::Null => "null".to_string(),
            AttributeValue::String(s) => s.clone(),
            AttributeValue::Number(n) => n.to_string(),
            AttributeValue::StringArray(items) => items.join(", "),
        }
    }
}

impl From<Value> for AttributeValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttributeValue::Null,
            Value::String(s) => AttributeValue::String(s),
            Value::Number(n) => AttributeValue::Number(n),
            Value::Bool(b) => AttributeValue::String(b.to_string()),
            Value::Array(items) => AttributeValue::StringArray(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Null => None,
                        Value::String(s) => Some(s),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            ),
            Value::Object(_) => AttributeValue::String(value.to_string()),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AttributeValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(AttributeValue::from)
    }
}

/// Open attribute bag, kept in the order the keys appeared in the source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, AttributeValue)>);

impl Attributes {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace; a replaced key keeps its original position
    pub fn insert(&mut self, key: impl Into<String>, value: AttributeValue) {
        let key = key.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.insert(key, value);
        }
        attributes
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct AttributesVisitor;

impl<'de> Visitor<'de> for AttributesVisitor {
    type Value = Attributes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of product attributes")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut attributes = Attributes::new();
        while let Some((key, value)) = access.next_entry::<String, AttributeValue>()? {
            attributes.insert(key, value);
        }
        Ok(attributes)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(Attributes::new())
    }
}

impl<'de> Deserialize<'de> for Attributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(AttributesVisitor)
    }
}

/// Detail record of a product: the known fields plus open attributes.
///
/// Known fields of an unexpected JSON type degrade to `None` instead of
/// failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Vec<String>>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub text: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub fetched_at: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub picture_urls: Option<Vec<String>>,

    /// Everything that is not a known field
    #[serde(flatten)]
    pub extra: Attributes,
}

/// Accepts a number, a numeric string, or null
fn lenient_price<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', ".").parse().ok(),
        _ => None,
    })
}

/// Strings pass through, numbers are stringified, anything else is `None`
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

/// An array of scalars, or a single string standing in for a one-element list
fn lenient_list<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(items.into_iter().filter_map(scalar_text).collect()),
        Value::String(s) => Some(vec![s]),
        _ => None,
    })
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A product as returned by the search and detail endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "dataRow", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ProductDetails>,
}

impl Product {
    pub fn new(id: impl Into<ProductId>, name: &str) -> Self {
        Self {
            id: id.into(),
            name: Some(name.to_string()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: ProductDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// Top-level name, falling back to the detail record's name
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or_else(|| self.details.as_ref().and_then(|d| d.name.as_deref()))
            .unwrap_or("Untitled product")
    }

    pub fn price(&self) -> Option<f64> {
        self.details.as_ref().and_then(|d| d.price)
    }

    pub fn currency(&self) -> Option<&str> {
        self.details.as_ref().and_then(|d| d.currency.as_deref())
    }

    pub fn picture_urls(&self) -> &[String] {
        self.details
            .as_ref()
            .and_then(|d| d.picture_urls.as_deref())
            .unwrap_or(&[])
    }
}
