//! Catalog browsing engine
//!
//! - [`CatalogQueryEngine`]: filter/sort/page state and listing fetches
//! - [`DetailView`]: single-entry fetch with loading/loaded/absent state
//! - [`CartWriter`]: appends line items to the persisted cart

pub mod cart;
pub mod detail;
pub mod listing;

pub use cart::CartWriter;
pub use detail::{DetailState, DetailView};
pub use listing::{CatalogQueryEngine, FetchTicket, PageChangePolicy};
