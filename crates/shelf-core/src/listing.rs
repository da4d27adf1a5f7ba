//! Listing response model and pagination state

use serde::{Deserialize, Serialize};

use crate::CatalogEntry;
use crate::entry::null_as_empty;

/// Pagination as reported by the catalog service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub page_count: u32,
    #[serde(default)]
    pub total: u64,
}

fn first_page() -> u32 {
    1
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page: 1,
            page_count: 1,
            total: 0,
        }
    }
}

impl PaginationState {
    /// Enforce `1 <= page <= page_count` on server-reported values
    pub fn normalized(self) -> Self {
        let page_count = self.page_count.max(1);
        Self {
            page: self.page.clamp(1, page_count),
            page_count,
            total: self.total,
        }
    }

    pub fn contains(&self, page: u32) -> bool {
        (1..=self.page_count).contains(&page)
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Facet values currently selectable, advisory only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterMeta {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub companies: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingMeta {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub companies: Vec<String>,
    #[serde(default)]
    pub pagination: Option<PaginationState>,
}

/// Body of a listing read (`products?pagination[page]=N...`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingPage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<CatalogEntry>,
    #[serde(default)]
    pub meta: Option<ListingMeta>,
}

impl ListingPage {
    /// Split into the three pieces of view state a listing fetch replaces.
    ///
    /// Absent metadata yields empty facets and default pagination; the
    /// server is authoritative, so nothing is carried over from before.
    pub fn into_parts(self) -> (Vec<CatalogEntry>, FilterMeta, PaginationState) {
        let meta = self.meta.unwrap_or_default();
        let facets = FilterMeta {
            categories: meta.categories,
            companies: meta.companies,
        };
        let pagination = meta.pagination.unwrap_or_default().normalized();
        (self.data, facets, pagination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_listing() {
        let json = r#"{
            "data": [
                {"id": 1, "attributes": {"title": "chic chair", "image": "a.jpg", "price": "33999"}},
                {"id": 2, "attributes": {"title": "coffee table", "image": "b.jpg", "price": 17999}}
            ],
            "meta": {
                "categories": ["all", "Tables", "Chairs"],
                "companies": ["all", "Modenza"],
                "pagination": {"page": 2, "pageSize": 10, "pageCount": 3, "total": 22}
            }
        }"#;

        let page: ListingPage = serde_json::from_str(json).unwrap();
        let (entries, facets, pagination) = page.into_parts();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].title(), "coffee table");
        assert_eq!(facets.categories, vec!["all", "Tables", "Chairs"]);
        assert_eq!(facets.companies.len(), 2);
        assert_eq!(
            pagination,
            PaginationState {
                page: 2,
                page_count: 3,
                total: 22
            }
        );
    }

    #[test]
    fn test_missing_meta_resets_pagination() {
        let page: ListingPage = serde_json::from_str(r#"{"data": null}"#).unwrap();
        let (entries, facets, pagination) = page.into_parts();

        assert!(entries.is_empty());
        assert_eq!(facets, FilterMeta::default());
        assert_eq!(pagination, PaginationState::default());
    }

    #[test]
    fn test_normalize_out_of_range() {
        let pagination = PaginationState {
            page: 9,
            page_count: 0,
            total: 0,
        }
        .normalized();
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_count, 1);

        let pagination = PaginationState {
            page: 0,
            page_count: 4,
            total: 40,
        }
        .normalized();
        assert_eq!(pagination.page, 1);
        assert!(pagination.contains(4));
        assert!(!pagination.contains(5));
        assert!(pagination.has_next());
        assert!(!pagination.has_prev());
    }
}
