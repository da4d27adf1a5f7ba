//! Core domain models and logic for shelf
//!
//! This crate contains:
//! - Domain models (CatalogEntry, FilterState, PaginationState, CartLineItem)
//! - Query fragment builder (filter state -> listing query parameters)
//! - Response reconciliation helpers

pub mod cart;
pub mod entry;
pub mod error;
pub mod filter;
pub mod listing;
pub mod query;

pub use cart::{Cart, CartLineItem, MAX_AMOUNT_CHOICE};
pub use entry::{CatalogEntry, EntryAttributes, EntryResponse};
pub use error::{Error, Result};
pub use filter::{parse_facet, FilterState, SortOrder, ALL_SENTINEL, MAX_PRICE};
pub use listing::{FilterMeta, ListingMeta, ListingPage, PaginationState};
pub use query::{QueryFragment, PAGE_PARAM};
