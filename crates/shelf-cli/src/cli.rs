use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use shelf_core::SortOrder;

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Browse the product catalog and manage a local cart", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Catalog API base URL (overrides config)
    #[arg(long, global = true, env = "SHELF_API_URL")]
    pub api_url: Option<String>,

    /// Cart file location (overrides config)
    #[arg(long, global = true)]
    pub cart_file: Option<PathBuf>,

    /// Keep the cart in memory for this run only
    #[arg(long, global = true, conflicts_with = "cart_file")]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List products, optionally filtered
    Products {
        /// Page to show (1-indexed)
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Title search text
        #[arg(long)]
        search: Option<String>,

        /// Category name ("all" for any)
        #[arg(long)]
        category: Option<String>,

        /// Company name ("all" for any)
        #[arg(long)]
        company: Option<String>,

        /// Sort order
        #[arg(long, value_enum)]
        order: Option<OrderArg>,

        /// Maximum price (0-1000)
        #[arg(long)]
        price: Option<u32>,

        /// Print the raw listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single product
    Show {
        /// Product ID
        id: u64,

        #[arg(long)]
        json: bool,
    },

    /// Manage the local cart
    #[command(subcommand)]
    Cart(CartCommands),

    /// Interactive catalog browser
    Ui,

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Add a product to the cart
    Add {
        /// Product ID
        id: u64,

        /// Color (defaults to the product's first color)
        #[arg(long)]
        color: Option<String>,

        /// Amount (1-20)
        #[arg(long, default_value = "1")]
        amount: u32,
    },

    /// List cart contents
    List {
        #[arg(long)]
        json: bool,
    },

    /// Remove everything from the cart
    Clear,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OrderArg {
    #[value(name = "a-z")]
    AToZ,
    #[value(name = "z-a")]
    ZToA,
    High,
    Low,
}

impl From<OrderArg> for SortOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::AToZ => SortOrder::AToZ,
            OrderArg::ZToA => SortOrder::ZToA,
            OrderArg::High => SortOrder::PriceHigh,
            OrderArg::Low => SortOrder::PriceLow,
        }
    }
}

impl Cli {
    /// The interactive browser owns the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Ui))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_is_interactive() {
        let cli = Cli::try_parse_from(["shelf"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_products_flags() {
        let cli = Cli::try_parse_from([
            "shelf", "products", "--page", "2", "--order", "z-a", "--price", "300",
        ])
        .unwrap();
        assert!(!cli.is_interactive());
        match cli.command {
            Some(Commands::Products {
                page, order, price, ..
            }) => {
                assert_eq!(page, 2);
                assert_eq!(order.map(SortOrder::from), Some(SortOrder::ZToA));
                assert_eq!(price, Some(300));
            }
            _ => panic!("expected products command"),
        }
    }

    #[test]
    fn test_ephemeral_conflicts_with_cart_file() {
        let result = Cli::try_parse_from([
            "shelf",
            "--ephemeral",
            "--cart-file",
            "/tmp/cart.json",
            "cart",
            "list",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_zero_rejected() {
        assert!(Cli::try_parse_from(["shelf", "products", "--page", "0"]).is_err());
    }
}
