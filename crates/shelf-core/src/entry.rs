//! Catalog entry domain model

use serde::{Deserialize, Deserializer, Serialize, de};

/// One product record returned by the catalog service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub attributes: EntryAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryAttributes {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(deserialize_with = "deserialize_price")]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping: Option<bool>,
}

impl CatalogEntry {
    pub fn title(&self) -> &str {
        &self.attributes.title
    }

    pub fn price(&self) -> f64 {
        self.attributes.price
    }

    /// First listed color, used as the initial selection on the detail view
    pub fn default_color(&self) -> Option<&str> {
        self.attributes.colors.first().map(String::as_str)
    }

    pub fn has_color(&self, color: &str) -> bool {
        self.attributes.colors.iter().any(|c| c == color)
    }
}

/// Body of a single entry read (`products/{id}`)
#[derive(Debug, Clone, Deserialize)]
pub struct EntryResponse {
    #[serde(default)]
    pub data: Option<CatalogEntry>,
}

/// The reference server sends prices as numeric strings, so both forms are accepted.
fn deserialize_price<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    let price = match RawPrice::deserialize(deserializer)? {
        RawPrice::Number(n) => n,
        RawPrice::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| de::Error::custom(format!("invalid price: {s:?}")))?,
    };

    if !price.is_finite() || price < 0.0 {
        return Err(de::Error::custom(format!("price must be non-negative: {price}")));
    }
    Ok(price)
}

/// Treat an explicit `null` like a missing list
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
