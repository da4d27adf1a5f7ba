//! Listing filter state

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Upper bound of the price filter (and its default)
pub const MAX_PRICE: u32 = 1000;

/// Wire value the catalog service treats as "no constraint on this field"
pub const ALL_SENTINEL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "a-z")]
    AToZ,
    #[serde(rename = "z-a")]
    ZToA,
    #[serde(rename = "high")]
    PriceHigh,
    #[serde(rename = "low")]
    PriceLow,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::AToZ,
        SortOrder::ZToA,
        SortOrder::PriceHigh,
        SortOrder::PriceLow,
    ];

    /// Value sent as `filters[order]`
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::AToZ => "a-z",
            SortOrder::ZToA => "z-a",
            SortOrder::PriceHigh => "high",
            SortOrder::PriceLow => "low",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOrder::AToZ => "A-Z",
            SortOrder::ZToA => "Z-A",
            SortOrder::PriceHigh => "High Price",
            SortOrder::PriceLow => "Low Price",
        }
    }

    /// Next order in selection-control order, wrapping around
    pub fn cycle(&self) -> Self {
        let idx = Self::ALL.iter().position(|o| o == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "unknown sort order '{}' (expected a-z, z-a, high or low)",
                    s
                ))
            })
    }
}

/// Filter state owned by the query engine.
///
/// `None` for category or company means unconstrained. The wire sentinel
/// `all` only appears when the state is encoded into a query fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    pub search: String,
    pub category: Option<String>,
    pub company: Option<String>,
    pub order: SortOrder,
    pub max_price: u32,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            category: None,
            company: None,
            order: SortOrder::default(),
            max_price: MAX_PRICE,
        }
    }
}

impl FilterState {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = parse_facet(category);
        self
    }

    pub fn with_company(mut self, company: &str) -> Self {
        self.company = parse_facet(company);
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_max_price(mut self, price: u32) -> Self {
        self.set_max_price(price);
        self
    }

    pub fn set_max_price(&mut self, price: u32) {
        self.max_price = price.min(MAX_PRICE);
    }

    /// Category as sent on the wire
    pub fn category_param(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_SENTINEL)
    }

    /// Company as sent on the wire
    pub fn company_param(&self) -> &str {
        self.company.as_deref().unwrap_or(ALL_SENTINEL)
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Parse a user-supplied facet value; blank or `all` means unconstrained.
pub fn parse_facet(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters() {
        let filters = FilterState::default();
        assert_eq!(filters.search, "");
        assert_eq!(filters.category, None);
        assert_eq!(filters.company, None);
        assert_eq!(filters.order, SortOrder::AToZ);
        assert_eq!(filters.max_price, 1000);
        assert!(filters.is_default());
    }

    #[test]
    fn test_all_sentinel_parses_to_none() {
        assert_eq!(parse_facet("all"), None);
        assert_eq!(parse_facet("ALL"), None);
        assert_eq!(parse_facet("  "), None);
        assert_eq!(parse_facet("Tables"), Some("Tables".to_string()));

        let filters = FilterState::default().with_category("all").with_company("Luxora");
        assert_eq!(filters.category_param(), "all");
        assert_eq!(filters.company_param(), "Luxora");
    }

    #[test]
    fn test_max_price_clamped() {
        let filters = FilterState::default().with_max_price(5000);
        assert_eq!(filters.max_price, MAX_PRICE);

        let filters = FilterState::default().with_max_price(250);
        assert_eq!(filters.max_price, 250);
    }

    #[test]
    fn test_sort_order_parse_and_cycle() {
        assert_eq!("a-z".parse::<SortOrder>().unwrap(), SortOrder::AToZ);
        assert_eq!("HIGH".parse::<SortOrder>().unwrap(), SortOrder::PriceHigh);
        assert!("cheapest".parse::<SortOrder>().is_err());

        assert_eq!(SortOrder::AToZ.cycle(), SortOrder::ZToA);
        assert_eq!(SortOrder::PriceLow.cycle(), SortOrder::AToZ);
        assert_eq!(SortOrder::PriceHigh.to_string(), "high");
    }
}
