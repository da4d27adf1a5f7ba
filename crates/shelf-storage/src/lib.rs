//! Cart persistence for shelf
//!
//! This crate provides:
//! - The `CartStore` contract (versioned load / compare-and-swap save)
//! - A JSON file store
//! - An in-memory store

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

pub use error::{Result, StorageError};
pub use file::FileCartStore;
pub use memory::MemoryCartStore;
pub use store::CartStore;
