//! Query fragment builder
//!
//! Translates filter state into the listing endpoint's `filters[...]`
//! parameters. Pair order is fixed: search, category, company, order,
//! price. Values are kept raw here and percent-encoded by [`QueryFragment::encode`]
//! or by whoever appends the pairs to a request URL.

use std::fmt;

use url::form_urlencoded;

use crate::FilterState;

pub const PAGE_PARAM: &str = "pagination[page]";

const SEARCH_PARAM: &str = "filters[search]";
const CATEGORY_PARAM: &str = "filters[category]";
const COMPANY_PARAM: &str = "filters[company]";
const ORDER_PARAM: &str = "filters[order]";
const PRICE_PARAM: &str = "filters[price_lte]";

/// Encoded representation of active filter state sent with a listing request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueryFragment {
    pairs: Vec<(String, String)>,
}

impl QueryFragment {
    pub fn from_filters(filters: &FilterState) -> Self {
        let pairs = vec![
            (SEARCH_PARAM.to_string(), filters.search.clone()),
            (CATEGORY_PARAM.to_string(), filters.category_param().to_string()),
            (COMPANY_PARAM.to_string(), filters.company_param().to_string()),
            (ORDER_PARAM.to_string(), filters.order.as_str().to_string()),
            (PRICE_PARAM.to_string(), filters.max_price.min(crate::MAX_PRICE).to_string()),
        ];
        Self { pairs }
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Percent-encoded `key=value&...` form, without a leading separator
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl fmt::Display for QueryFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SortOrder;

    #[test]
    fn test_fragment_fixed_order() {
        let filters = FilterState::default().with_search("shoe");
        let fragment = QueryFragment::from_filters(&filters);

        let expected: Vec<(String, String)> = [
            ("filters[search]", "shoe"),
            ("filters[category]", "all"),
            ("filters[company]", "all"),
            ("filters[order]", "a-z"),
            ("filters[price_lte]", "1000"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        assert_eq!(fragment.pairs(), expected.as_slice());
    }

    #[test]
    fn test_fragment_encodes_values() {
        let filters = FilterState::default()
            .with_search("lamp & chair")
            .with_company("Homestead")
            .with_order(SortOrder::PriceLow)
            .with_max_price(300);
        let fragment = QueryFragment::from_filters(&filters);

        assert_eq!(fragment.get("filters[company]"), Some("Homestead"));
        assert_eq!(fragment.get("filters[price_lte]"), Some("300"));

        let encoded = fragment.encode();
        assert!(encoded.starts_with("filters%5Bsearch%5D=lamp+%26+chair&"));
        assert!(encoded.ends_with("filters%5Border%5D=low&filters%5Bprice_lte%5D=300"));
    }

    #[test]
    fn test_empty_fragment() {
        let fragment = QueryFragment::default();
        assert!(fragment.is_empty());
        assert_eq!(fragment.encode(), "");
    }
}
