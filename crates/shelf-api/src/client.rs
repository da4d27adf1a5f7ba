use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use shelf_core::{CatalogEntry, EntryResponse, Error, ListingPage, PAGE_PARAM, QueryFragment, Result};
use tracing::debug;
use url::Url;

use crate::handler::CatalogApi;

pub const DEFAULT_BASE_URL: &str = "https://strapi-store-server.onrender.com/api";

/// Connection settings for [`HttpCatalogClient`]
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("shelf/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

pub struct HttpCatalogClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCatalogClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport(format!("Failed to create HTTP client: {}", e)))?;

        // Trailing slash so `join` appends instead of replacing the last segment
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let base_url = Url::parse(&base)
            .map_err(|e| Error::InvalidInput(format!("Invalid API URL '{}': {}", config.base_url, e)))?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(Error::InvalidInput(format!(
                "API URL must start with http:// or https://: {}",
                config.base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/products?pagination[page]=N` followed by the fragment pairs
    pub fn listing_url(&self, page: u32, fragment: Option<&QueryFragment>) -> Result<Url> {
        let mut url = self.join("products")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair(PAGE_PARAM, &page.to_string());
            if let Some(fragment) = fragment {
                query.extend_pairs(fragment.pairs().iter());
            }
        }
        Ok(url)
    }

    pub fn entry_url(&self, id: u64) -> Result<Url> {
        self.join(&format!("products/{}", id))
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidInput(format!("Invalid request path '{}': {}", path, e)))
    }

    /// GET the URL and return the body of a successful response
    async fn get_text(&self, url: Url) -> Result<(StatusCode, String)> {
        debug!(%url, "catalog request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Transport(format!("Failed to fetch {}: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(format!("Failed to read response: {}", e)))?;

        Ok((status, body))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list_products(
        &self,
        page: u32,
        fragment: Option<&QueryFragment>,
    ) -> Result<ListingPage> {
        let url = self.listing_url(page, fragment)?;
        let (status, body) = self.get_text(url.clone()).await?;

        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| Error::Decode(format!("listing: {}", e)))
    }

    async fn get_product(&self, id: u64) -> Result<CatalogEntry> {
        let url = self.entry_url(id)?;
        let (status, body) = self.get_text(url.clone()).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id));
        }
        if !status.is_success() {
            return Err(Error::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let response: EntryResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Decode(format!("product {}: {}", id, e)))?;
        response.data.ok_or(Error::NotFound(id))
    }
}
