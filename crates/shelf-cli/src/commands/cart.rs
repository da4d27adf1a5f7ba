use anyhow::{bail, Result};
use shelf_core::MAX_AMOUNT_CHOICE;
use shelf_engine::DetailView;

use super::{format_price, load_failure};
use crate::cli::CartCommands;
use crate::Services;

pub async fn handle(services: &Services, cmd: CartCommands) -> Result<()> {
    match cmd {
        CartCommands::Add { id, color, amount } => add(services, id, color, amount).await,
        CartCommands::List { json } => list(services, json).await,
        CartCommands::Clear => clear(services).await,
    }
}

async fn add(services: &Services, id: u64, color: Option<String>, amount: u32) -> Result<()> {
    let mut view = DetailView::new(id);
    view.load_entry(services.api.as_ref()).await;

    let Some(entry) = view.entry() else {
        return Err(load_failure(&view));
    };
    let title = entry.title().to_string();
    let available = entry.attributes.colors.join(", ");

    if let Some(color) = color
        && !view.select_color(&color)
    {
        bail!(
            "Color '{}' is not available for {} (choose from: {})",
            color,
            title,
            if available.is_empty() { "none" } else { &available }
        );
    }

    if !view.set_amount(amount) {
        bail!("Amount must be between 1 and {}", MAX_AMOUNT_CHOICE);
    }

    let Some(line) = view.add_to_cart(&services.cart).await? else {
        bail!("Product {} not found", id);
    };

    println!("✓ Added to cart: {} x{}", line.title, line.amount);
    if !line.product_color.is_empty() {
        println!("  Color: {}", line.product_color);
    }
    println!("  Key:   {}", line.cart_id);

    Ok(())
}

async fn list(services: &Services, json: bool) -> Result<()> {
    let cart = services.cart.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cart)?);
        return Ok(());
    }

    if cart.is_empty() {
        println!("Your cart is empty.");
        return Ok(());
    }

    println!("Cart ({} items):", cart.item_count());
    for item in &cart.items {
        let color = if item.product_color.is_empty() {
            String::new()
        } else {
            format!(" ({})", item.product_color)
        };
        println!(
            "  {}{} x{}  {}",
            item.title,
            color,
            item.amount,
            format_price(item.line_total())
        );
    }
    println!("\nSubtotal: {}", format_price(cart.subtotal()));

    Ok(())
}

async fn clear(services: &Services) -> Result<()> {
    services.cart.clear().await?;
    println!("✓ Cart cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use shelf_api::CatalogApi;
    use shelf_core::{CatalogEntry, Error, ListingPage, QueryFragment};
    use shelf_engine::{CartWriter, PageChangePolicy};
    use shelf_storage::MemoryCartStore;

    struct OneProduct;

    #[async_trait]
    impl CatalogApi for OneProduct {
        async fn list_products(
            &self,
            _page: u32,
            _fragment: Option<&QueryFragment>,
        ) -> shelf_core::Result<ListingPage> {
            Ok(serde_json::from_str(r#"{"data": []}"#).unwrap())
        }

        async fn get_product(&self, id: u64) -> shelf_core::Result<CatalogEntry> {
            if id != 7 {
                return Err(Error::NotFound(id));
            }
            Ok(serde_json::from_value(serde_json::json!({
                "id": 7,
                "attributes": {
                    "title": "lounge chair",
                    "image": "https://example.com/7.jpg",
                    "price": "179.99",
                    "colors": ["#33FF57", "#FF5733"]
                }
            }))
            .unwrap())
        }
    }

    fn services() -> Services {
        Services {
            api: Arc::new(OneProduct),
            cart: CartWriter::new(Arc::new(MemoryCartStore::new())),
            policy: PageChangePolicy::default(),
        }
    }

    #[tokio::test]
    async fn test_add_defaults_to_first_color() {
        let services = services();
        add(&services, 7, None, 2).await.unwrap();

        let cart = services.cart.list().await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].cart_id, "7#33FF57");
        assert_eq!(cart.items[0].amount, 2);
    }

    #[tokio::test]
    async fn test_add_rejects_unknown_color() {
        let services = services();
        assert!(add(&services, 7, Some("purple".to_string()), 1).await.is_err());
        assert!(services.cart.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_range_amount() {
        let services = services();
        assert!(add(&services, 7, None, 21).await.is_err());
        assert!(add(&services, 7, None, 0).await.is_err());
    }

    #[tokio::test]
    async fn test_add_missing_product() {
        let services = services();
        assert!(add(&services, 8, None, 1).await.is_err());
    }

    #[tokio::test]
    async fn test_clear() {
        let services = services();
        add(&services, 7, Some("#FF5733".to_string()), 1).await.unwrap();
        clear(&services).await.unwrap();
        assert!(services.cart.list().await.unwrap().is_empty());
    }
}
