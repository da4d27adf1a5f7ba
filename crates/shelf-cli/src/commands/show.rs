use anyhow::Result;
use shelf_engine::DetailView;

use super::{format_price, load_failure};
use crate::Services;

pub async fn handle(services: &Services, id: u64, json: bool) -> Result<()> {
    let mut view = DetailView::new(id);
    view.load_entry(services.api.as_ref()).await;

    let Some(entry) = view.entry() else {
        return Err(load_failure(&view));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(entry)?);
        return Ok(());
    }

    let attrs = &entry.attributes;
    println!("{}", attrs.title);
    if let Some(company) = &attrs.company {
        println!("  Company:  {}", company);
    }
    if let Some(category) = &attrs.category {
        println!("  Category: {}", category);
    }
    println!("  Price:    {}", format_price(attrs.price));
    if attrs.shipping == Some(true) {
        println!("  Shipping: free");
    }
    if attrs.featured == Some(true) {
        println!("  Featured");
    }
    if !attrs.colors.is_empty() {
        println!("  Colors:   {}", attrs.colors.join(", "));
    }
    if let Some(description) = &attrs.description {
        println!("\n{}", description);
    }

    Ok(())
}
