pub mod cart;
pub mod completions;
pub mod products;
pub mod show;
pub mod ui;

use anyhow::anyhow;
use shelf_engine::DetailView;

/// Error for a detail load that produced no entry
pub fn load_failure(view: &DetailView) -> anyhow::Error {
    match view.last_error() {
        Some(cause) => anyhow!("Failed to load product {}: {}", view.id(), cause),
        None => anyhow!("Product {} not found", view.id()),
    }
}

/// Format a price the way the storefront shows it
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}
