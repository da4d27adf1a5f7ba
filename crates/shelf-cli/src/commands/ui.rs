use anyhow::Result;

use crate::Services;

pub async fn handle(services: Services) -> Result<()> {
    shelf_tui::run(services.api, services.cart, services.policy).await
}
