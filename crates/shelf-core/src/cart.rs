//! Cart domain model

use serde::{Deserialize, Serialize};

use crate::{CatalogEntry, Error, Result};

/// Largest amount offered by the amount selector
pub const MAX_AMOUNT_CHOICE: u32 = 20;

/// Snapshot of a product taken when it is added to the cart.
///
/// Write-once: re-adding the same product and color appends another line
/// with the same `cart_id` instead of merging amounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(rename = "cartID")]
    pub cart_id: String,
    #[serde(rename = "productID")]
    pub product_id: u64,
    pub image: String,
    pub title: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(rename = "productColor")]
    pub product_color: String,
    pub amount: u32,
}

impl CartLineItem {
    pub fn from_entry(entry: &CatalogEntry, color: &str, amount: u32) -> Result<Self> {
        if amount == 0 {
            return Err(Error::InvalidInput("amount must be at least 1".to_string()));
        }

        Ok(Self {
            cart_id: Self::composite_key(entry.id, color),
            product_id: entry.id,
            image: entry.attributes.image.clone(),
            title: entry.attributes.title.clone(),
            price: entry.attributes.price,
            company: entry.attributes.company.clone(),
            product_color: color.to_string(),
            amount,
        })
    }

    /// Product id concatenated with the chosen color, e.g. `7red`
    pub fn composite_key(product_id: u64, color: &str) -> String {
        format!("{}{}", product_id, color)
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.amount)
    }
}

/// Persisted cart: an ordered list of line items plus a version tag for
/// compare-and-swap writes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub version: u64,
    #[serde(default)]
    pub items: Vec<CartLineItem>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CartFile {
    Versioned(Cart),
    Legacy(Vec<CartLineItem>),
}

impl Cart {
    /// Parse persisted content. A bare JSON array is accepted as version 0.
    pub fn parse(content: &str) -> Result<Self> {
        match serde_json::from_str::<CartFile>(content) {
            Ok(CartFile::Versioned(cart)) => Ok(cart),
            Ok(CartFile::Legacy(items)) => Ok(Self { version: 0, items }),
            Err(e) => Err(Error::CorruptCart(e.to_string())),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of amounts over all lines
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.amount)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartLineItem::line_total).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryAttributes;

    fn entry(id: u64) -> CatalogEntry {
        CatalogEntry {
            id,
            attributes: EntryAttributes {
                title: "comfy bed".to_string(),
                image: "https://example.com/bed.jpg".to_string(),
                price: 129.5,
                category: Some("Beds".to_string()),
                company: Some("Homestead".to_string()),
                description: None,
                colors: vec!["red".to_string()],
                featured: None,
                shipping: None,
            },
        }
    }

    #[test]
    fn test_line_item_from_entry() {
        let item = CartLineItem::from_entry(&entry(7), "red", 2).unwrap();
        assert_eq!(item.cart_id, "7red");
        assert_eq!(item.product_id, 7);
        assert_eq!(item.amount, 2);
        assert_eq!(item.company.as_deref(), Some("Homestead"));
        assert_eq!(item.line_total(), 259.0);

        assert!(CartLineItem::from_entry(&entry(7), "red", 0).is_err());
    }

    #[test]
    fn test_wire_field_names() {
        let item = CartLineItem::from_entry(&entry(7), "red", 1).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["cartID"], "7red");
        assert_eq!(value["productID"], 7);
        assert_eq!(value["productColor"], "red");
    }

    #[test]
    fn test_parse_legacy_array() {
        let json = r#"[{"cartID": "3blue", "productID": 3, "image": "i", "title": "t",
                        "price": 10, "productColor": "blue", "amount": 4}]"#;
        let cart = Cart::parse(json).unwrap();
        assert_eq!(cart.version, 0);
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.subtotal(), 40.0);
    }

    #[test]
    fn test_parse_versioned_and_corrupt() {
        let cart = Cart {
            version: 5,
            items: vec![CartLineItem::from_entry(&entry(1), "red", 1).unwrap()],
        };
        let parsed = Cart::parse(&cart.to_json().unwrap()).unwrap();
        assert_eq!(parsed, cart);

        assert!(matches!(Cart::parse("{not json"), Err(Error::CorruptCart(_))));
    }
}
