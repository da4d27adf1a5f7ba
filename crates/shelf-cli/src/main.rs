mod cli;
mod commands;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use shelf_api::{ApiConfig, CatalogApi, HttpCatalogClient};
use shelf_config::Config;
use shelf_engine::{CartWriter, PageChangePolicy};
use shelf_storage::{CartStore, FileCartStore, MemoryCartStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

/// Everything a command needs, built once from config and flags
pub struct Services {
    pub api: Arc<dyn CatalogApi>,
    pub cart: CartWriter,
    pub policy: PageChangePolicy,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.is_interactive());

    if let Some(Commands::Completions { shell }) = cli.command {
        commands::completions::handle(shell, &mut Cli::command());
        return Ok(());
    }

    let config = Config::load().context("Failed to load config")?;
    let services = build_services(&cli, &config)?;

    match cli.command {
        Some(Commands::Products {
            page,
            search,
            category,
            company,
            order,
            price,
            json,
        }) => {
            let query = commands::products::ListingQuery {
                page,
                search,
                category,
                company,
                order: order.map(Into::into),
                price,
            };
            commands::products::handle(&services, query, json).await
        }
        Some(Commands::Show { id, json }) => commands::show::handle(&services, id, json).await,
        Some(Commands::Cart(cmd)) => commands::cart::handle(&services, cmd).await,
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::Ui) | None => commands::ui::handle(services).await,
    }
}

fn init_tracing(interactive: bool) {
    if interactive {
        // Log lines would tear the alternate screen, so stay quiet unless asked
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_services(cli: &Cli, config: &Config) -> Result<Services> {
    let api_config = ApiConfig {
        base_url: cli
            .api_url
            .clone()
            .unwrap_or_else(|| config.api.base_url.clone()),
        timeout: Duration::from_secs(config.api.timeout_secs),
        user_agent: config.api.user_agent.clone(),
    };
    let client = HttpCatalogClient::new(api_config).context("Failed to create catalog client")?;

    let store: Arc<dyn CartStore> = if cli.ephemeral {
        Arc::new(MemoryCartStore::new())
    } else {
        let store = cli
            .cart_file
            .clone()
            .or_else(|| config.cart.path.clone())
            .map(FileCartStore::new)
            .unwrap_or_else(FileCartStore::open_default);
        debug!(path = %store.path().display(), "using cart file");
        Arc::new(store)
    };

    let policy = if config.listing.keep_filters_on_page_change {
        PageChangePolicy::KeepFilters
    } else {
        PageChangePolicy::DropFilters
    };

    Ok(Services {
        api: Arc::new(client),
        cart: CartWriter::new(store),
        policy,
    })
}
