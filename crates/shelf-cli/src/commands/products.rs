use anyhow::{bail, Result};
use shelf_core::{parse_facet, FilterState, SortOrder};
use shelf_engine::CatalogQueryEngine;

use super::format_price;
use crate::Services;

pub struct ListingQuery {
    pub page: u32,
    pub search: Option<String>,
    pub category: Option<String>,
    pub company: Option<String>,
    pub order: Option<SortOrder>,
    pub price: Option<u32>,
}

impl ListingQuery {
    fn filters(&self) -> FilterState {
        let mut filters = FilterState {
            search: self.search.clone().unwrap_or_default(),
            category: self.category.as_deref().and_then(parse_facet),
            company: self.company.as_deref().and_then(parse_facet),
            order: self.order.unwrap_or_default(),
            ..FilterState::default()
        };
        if let Some(price) = self.price {
            filters.set_max_price(price);
        }
        filters
    }
}

pub async fn handle(services: &Services, query: ListingQuery, json: bool) -> Result<()> {
    let api = services.api.as_ref();
    let mut engine = CatalogQueryEngine::new(services.policy);

    *engine.filters_mut() = query.filters();
    engine.fetch_at(api, query.page).await;
    if let Some(err) = engine.last_error() {
        bail!("Failed to fetch products: {}", err);
    }

    let page_count = engine.pagination().page_count;
    if query.page > page_count {
        bail!("Page {} is out of range (1-{})", query.page, page_count);
    }

    if json {
        let out = serde_json::json!({
            "data": engine.entries(),
            "meta": {
                "categories": engine.meta().categories,
                "companies": engine.meta().companies,
                "pagination": engine.pagination(),
            }
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if engine.entries().is_empty() {
        println!("No products found.");
        return Ok(());
    }

    let pagination = engine.pagination();
    println!("{} products", pagination.total);
    for entry in engine.entries() {
        println!(
            "  [{:>3}] {:<32} {:>10}  {}",
            entry.id,
            entry.title(),
            format_price(entry.price()),
            entry.attributes.company.as_deref().unwrap_or("")
        );
    }
    println!("\nPage {} of {}", pagination.page, pagination.page_count);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use shelf_api::CatalogApi;
    use shelf_core::{CatalogEntry, Error, ListingPage, QueryFragment};
    use shelf_engine::{CartWriter, PageChangePolicy};
    use shelf_storage::MemoryCartStore;

    /// Three pages of listing; records the page and search of every request
    #[derive(Default)]
    struct RecordingCatalog {
        requests: Mutex<Vec<(u32, Option<String>)>>,
    }

    #[async_trait]
    impl CatalogApi for RecordingCatalog {
        async fn list_products(
            &self,
            page: u32,
            fragment: Option<&QueryFragment>,
        ) -> shelf_core::Result<ListingPage> {
            let search = fragment.and_then(|f| f.get("filters[search]")).map(str::to_string);
            self.requests.lock().unwrap().push((page, search));
            Ok(serde_json::from_value(serde_json::json!({
                "data": [],
                "meta": {"pagination": {"page": page, "pageCount": 3, "total": 25}}
            }))
            .unwrap())
        }

        async fn get_product(&self, id: u64) -> shelf_core::Result<CatalogEntry> {
            Err(Error::NotFound(id))
        }
    }

    fn services(catalog: &Arc<RecordingCatalog>, policy: PageChangePolicy) -> Services {
        Services {
            api: catalog.clone(),
            cart: CartWriter::new(Arc::new(MemoryCartStore::new())),
            policy,
        }
    }

    #[tokio::test]
    async fn test_page_and_search_sent_in_one_request() {
        for policy in [PageChangePolicy::KeepFilters, PageChangePolicy::DropFilters] {
            let catalog = Arc::new(RecordingCatalog::default());
            let q = ListingQuery {
                page: 2,
                search: Some("lamp".to_string()),
                ..query()
            };

            handle(&services(&catalog, policy), q, true).await.unwrap();

            let requests = catalog.requests.lock().unwrap().clone();
            assert_eq!(requests, vec![(2, Some("lamp".to_string()))]);
        }
    }

    #[tokio::test]
    async fn test_page_beyond_count_is_an_error() {
        let catalog = Arc::new(RecordingCatalog::default());
        let q = ListingQuery {
            page: 5,
            ..query()
        };

        let err = handle(&services(&catalog, PageChangePolicy::default()), q, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert_eq!(catalog.requests.lock().unwrap().clone(), vec![(5, None)]);
    }

    fn query() -> ListingQuery {
        ListingQuery {
            page: 1,
            search: None,
            category: None,
            company: None,
            order: None,
            price: None,
        }
    }

    #[test]
    fn test_no_flags_means_default_filters() {
        assert!(query().filters().is_default());
    }

    #[test]
    fn test_all_facet_is_unconstrained() {
        let q = ListingQuery {
            category: Some("all".to_string()),
            company: Some("Luxora".to_string()),
            ..query()
        };
        let filters = q.filters();
        assert_eq!(filters.category, None);
        assert_eq!(filters.company.as_deref(), Some("Luxora"));
    }

    #[test]
    fn test_price_is_clamped() {
        let q = ListingQuery {
            price: Some(5000),
            ..query()
        };
        assert_eq!(q.filters().max_price, shelf_core::MAX_PRICE);
    }
}
