//! Cart store trait

use async_trait::async_trait;
use shelf_core::Cart;

use crate::Result;

/// Persisted slot holding the cart.
///
/// `load` never fails on absent or corrupt content; both read as an empty
/// cart at version 0. `save` is a compare-and-swap: it only writes when the
/// stored version still equals `expected_version`, and returns the new
/// version.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn load(&self) -> Result<Cart>;

    async fn save(&self, cart: &Cart, expected_version: u64) -> Result<u64>;
}
