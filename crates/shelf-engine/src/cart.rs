//! Cart writer
//!
//! Appends line items to the persisted cart. Each write is a
//! load-append-save cycle guarded by the store's version check; a lost race
//! reloads and tries again.

use std::sync::Arc;

use shelf_core::{Cart, CartLineItem, CatalogEntry, Error, Result};
use shelf_storage::{CartStore, StorageError};
use tracing::{debug, info};

const MAX_WRITE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct CartWriter {
    store: Arc<dyn CartStore>,
}

impl CartWriter {
    pub fn new(store: Arc<dyn CartStore>) -> Self {
        Self { store }
    }

    /// Append a line for `entry` in `color`. The same product and color
    /// added twice yields two lines with the same composite key.
    pub async fn add_to_cart(
        &self,
        entry: &CatalogEntry,
        color: &str,
        amount: u32,
    ) -> Result<CartLineItem> {
        let line = CartLineItem::from_entry(entry, color, amount)?;

        self.update(|cart| cart.items.push(line.clone())).await?;

        info!(cart_id = %line.cart_id, amount = line.amount, "added to cart");
        Ok(line)
    }

    pub async fn list(&self) -> Result<Cart> {
        Ok(self.store.load().await?)
    }

    pub async fn clear(&self) -> Result<()> {
        self.update(|cart| cart.items.clear()).await?;
        info!("cart cleared");
        Ok(())
    }

    async fn update(&self, mut apply: impl FnMut(&mut Cart)) -> Result<u64> {
        let mut last_conflict = (0, 0);

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let mut cart = self.store.load().await?;
            let expected = cart.version;
            apply(&mut cart);

            match self.store.save(&cart, expected).await {
                Ok(version) => return Ok(version),
                Err(StorageError::Conflict { found, .. }) => {
                    debug!(attempt, expected, found, "cart changed underneath, retrying");
                    last_conflict = (expected, found);
                }
                Err(e) => return Err(e.into()),
            }
        }

        let (expected, found) = last_conflict;
        Err(Error::CartConflict { expected, found })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shelf_core::EntryAttributes;
    use shelf_storage::MemoryCartStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(id: u64) -> CatalogEntry {
        CatalogEntry {
            id,
            attributes: EntryAttributes {
                title: "dining table".to_string(),
                image: "table.jpg".to_string(),
                price: 250.0,
                category: None,
                company: Some("Artifex".to_string()),
                description: None,
                colors: vec!["red".to_string()],
                featured: None,
                shipping: None,
            },
        }
    }

    #[tokio::test]
    async fn test_add_to_empty_cart() {
        let writer = CartWriter::new(Arc::new(MemoryCartStore::new()));

        let line = writer.add_to_cart(&entry(7), "red", 2).await.unwrap();
        assert_eq!(line.cart_id, "7red");

        let cart = writer.list().await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].cart_id, "7red");
        assert_eq!(cart.items[0].amount, 2);
    }

    #[tokio::test]
    async fn test_duplicate_key_appends() {
        let writer = CartWriter::new(Arc::new(MemoryCartStore::new()));

        writer.add_to_cart(&entry(7), "red", 2).await.unwrap();
        writer.add_to_cart(&entry(7), "red", 2).await.unwrap();

        let cart = writer.list().await.unwrap();
        assert_eq!(cart.items.len(), 2);
        assert!(cart.items.iter().all(|i| i.cart_id == "7red"));
        assert_eq!(cart.item_count(), 4);
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let writer = CartWriter::new(Arc::new(MemoryCartStore::new()));
        let err = writer.add_to_cart(&entry(7), "red", 0).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(writer.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let writer = CartWriter::new(Arc::new(MemoryCartStore::new()));
        writer.add_to_cart(&entry(1), "red", 1).await.unwrap();
        writer.clear().await.unwrap();
        assert!(writer.list().await.unwrap().is_empty());
    }

    /// Loses the first `conflicts` saves to a simulated concurrent writer
    struct ContendedStore {
        inner: MemoryCartStore,
        conflicts: AtomicUsize,
    }

    #[async_trait]
    impl CartStore for ContendedStore {
        async fn load(&self) -> shelf_storage::Result<Cart> {
            self.inner.load().await
        }

        async fn save(&self, cart: &Cart, expected_version: u64) -> shelf_storage::Result<u64> {
            if self.conflicts.load(Ordering::SeqCst) > 0 {
                self.conflicts.fetch_sub(1, Ordering::SeqCst);
                // another writer sneaks in first
                let current = self.inner.load().await?;
                self.inner.save(&current, current.version).await?;
            }
            self.inner.save(cart, expected_version).await
        }
    }

    #[tokio::test]
    async fn test_conflict_retried() {
        let store = Arc::new(ContendedStore {
            inner: MemoryCartStore::new(),
            conflicts: AtomicUsize::new(2),
        });
        let writer = CartWriter::new(store.clone());

        writer.add_to_cart(&entry(3), "red", 1).await.unwrap();
        assert_eq!(writer.list().await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_persistent_conflict_gives_up() {
        let store = Arc::new(ContendedStore {
            inner: MemoryCartStore::new(),
            conflicts: AtomicUsize::new(10),
        });
        let writer = CartWriter::new(store);

        let err = writer.add_to_cart(&entry(3), "red", 1).await.unwrap_err();
        assert!(matches!(err, Error::CartConflict { .. }));
    }
}
