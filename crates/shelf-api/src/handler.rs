//! Catalog API trait

use async_trait::async_trait;
use shelf_core::{CatalogEntry, ListingPage, QueryFragment, Result};

/// Read access to the remote catalog
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one listing page, optionally constrained by a filter fragment
    async fn list_products(
        &self,
        page: u32,
        fragment: Option<&QueryFragment>,
    ) -> Result<ListingPage>;

    /// Fetch a single entry; a missing entry is `Error::NotFound`
    async fn get_product(&self, id: u64) -> Result<CatalogEntry>;
}
