//! Remote catalog API access
//!
//! [`CatalogApi`] is the seam the engine talks to; [`HttpCatalogClient`]
//! implements it over reqwest against a Strapi-style products endpoint.

pub mod client;
pub mod handler;

pub use client::{ApiConfig, DEFAULT_BASE_URL, HttpCatalogClient};
pub use handler::CatalogApi;
