//! In-memory cart store

use std::sync::Mutex;

use async_trait::async_trait;
use shelf_core::Cart;

use crate::store::CartStore;
use crate::{Result, StorageError};

/// Cart kept in process memory; used for `--ephemeral` sessions and tests
#[derive(Default)]
pub struct MemoryCartStore {
    cart: Mutex<Cart>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cart(cart: Cart) -> Self {
        Self {
            cart: Mutex::new(cart),
        }
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self) -> Result<Cart> {
        let cart = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        Ok(cart.clone())
    }

    async fn save(&self, cart: &Cart, expected_version: u64) -> Result<u64> {
        let mut current = self.cart.lock().unwrap_or_else(|e| e.into_inner());
        if current.version != expected_version {
            return Err(StorageError::Conflict {
                expected: expected_version,
                found: current.version,
            });
        }

        *current = Cart {
            version: expected_version + 1,
            items: cart.items.clone(),
        };
        Ok(current.version)
    }
}
