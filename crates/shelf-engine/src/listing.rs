//! Catalog query engine
//!
//! Owns filter, sort, price and page state for the listing screen, turns it
//! into listing requests and reconciles responses back into view state.
//!
//! Every fetch is split into `begin` (returns a [`FetchTicket`]) and
//! `complete`. Tickets carry a generation number; only the most recently
//! issued ticket may change state, so a slow response that arrives after a
//! newer request was made is dropped instead of overwriting fresher data.

use shelf_api::CatalogApi;
use shelf_core::{
    CatalogEntry, FilterMeta, FilterState, ListingPage, PaginationState, QueryFragment, Result,
};
use tracing::{debug, warn};

/// What a plain page change sends along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageChangePolicy {
    /// Resend the last submitted filter fragment
    #[default]
    KeepFilters,
    /// Fetch the page unfiltered and forget the submitted fragment
    DropFilters,
}

/// A listing request that has been started but not yet applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    page: u32,
    fragment: Option<QueryFragment>,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn fragment(&self) -> Option<&QueryFragment> {
        self.fragment.as_ref()
    }

    /// Issue the remote read this ticket describes
    pub async fn execute(&self, api: &dyn CatalogApi) -> Result<ListingPage> {
        api.list_products(self.page, self.fragment.as_ref()).await
    }
}

pub struct CatalogQueryEngine {
    filters: FilterState,
    pagination: PaginationState,
    meta: FilterMeta,
    entries: Vec<CatalogEntry>,
    in_flight: bool,
    active_fragment: Option<QueryFragment>,
    generation: u64,
    policy: PageChangePolicy,
    last_error: Option<String>,
}

impl CatalogQueryEngine {
    pub fn new(policy: PageChangePolicy) -> Self {
        Self {
            filters: FilterState::default(),
            pagination: PaginationState::default(),
            meta: FilterMeta::default(),
            entries: Vec::new(),
            in_flight: false,
            active_fragment: None,
            generation: 0,
            policy,
            last_error: None,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// Edit filters in place; nothing is fetched until a search is submitted
    pub fn filters_mut(&mut self) -> &mut FilterState {
        &mut self.filters
    }

    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }

    pub fn meta(&self) -> &FilterMeta {
        &self.meta
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    pub fn active_fragment(&self) -> Option<&QueryFragment> {
        self.active_fragment.as_ref()
    }

    pub fn policy(&self) -> PageChangePolicy {
        self.policy
    }

    /// Message of the most recent failed fetch, cleared by the next success
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_next(&self) -> bool {
        self.pagination.has_next()
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.has_prev()
    }

    /// Start a listing fetch for the current page
    pub fn begin_fetch(&mut self, fragment: Option<QueryFragment>) -> FetchTicket {
        self.generation += 1;
        self.in_flight = true;
        FetchTicket {
            generation: self.generation,
            page: self.pagination.page,
            fragment,
        }
    }

    /// Apply the outcome of a fetch. Returns `false` when the ticket was
    /// superseded by a newer one and the result was discarded.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, result: Result<ListingPage>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                latest = self.generation,
                page = ticket.page,
                "discarding stale listing response"
            );
            return false;
        }

        self.in_flight = false;
        match result {
            Ok(page) => {
                let (entries, meta, pagination) = page.into_parts();
                debug!(
                    page = pagination.page,
                    page_count = pagination.page_count,
                    total = pagination.total,
                    entries = entries.len(),
                    "listing applied"
                );
                self.entries = entries;
                self.meta = meta;
                self.pagination = pagination;
                self.last_error = None;
            }
            Err(e) => {
                warn!(page = ticket.page, error = %e, "listing fetch failed");
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    pub async fn fetch_page(
        &mut self,
        api: &dyn CatalogApi,
        fragment: Option<QueryFragment>,
    ) -> bool {
        let ticket = self.begin_fetch(fragment);
        self.run(api, ticket).await
    }

    /// Initial unfiltered fetch of the current page
    pub async fn mount(&mut self, api: &dyn CatalogApi) -> bool {
        self.fetch_page(api, None).await
    }

    /// Build the fragment from the current filters, remember it and start the fetch.
    /// The current page is kept.
    pub fn request_search(&mut self) -> FetchTicket {
        let fragment = QueryFragment::from_filters(&self.filters);
        debug!(query = %fragment, "search submitted");
        self.active_fragment = Some(fragment.clone());
        self.begin_fetch(Some(fragment))
    }

    pub async fn submit_search(&mut self, api: &dyn CatalogApi) -> bool {
        let ticket = self.request_search();
        self.run(api, ticket).await
    }

    /// Restore default filters, go to page 1 and start an unfiltered fetch
    pub fn request_reset(&mut self) -> FetchTicket {
        self.filters = FilterState::default();
        self.active_fragment = None;
        self.pagination.page = 1;
        self.begin_fetch(None)
    }

    pub async fn reset_filters(&mut self, api: &dyn CatalogApi) -> bool {
        let ticket = self.request_reset();
        self.run(api, ticket).await
    }

    /// Move to `new_page` and start its fetch. Pages outside
    /// `1..=page_count` are refused and leave all state untouched.
    pub fn request_page(&mut self, new_page: u32) -> Option<FetchTicket> {
        if !self.pagination.contains(new_page) {
            debug!(
                requested = new_page,
                page_count = self.pagination.page_count,
                "page change refused"
            );
            return None;
        }

        self.pagination.page = new_page;
        let fragment = match self.policy {
            PageChangePolicy::KeepFilters => self.active_fragment.clone(),
            PageChangePolicy::DropFilters => {
                self.active_fragment = None;
                None
            }
        };
        Some(self.begin_fetch(fragment))
    }

    /// Returns `false` without fetching when the page is out of range
    pub async fn change_page(&mut self, api: &dyn CatalogApi, new_page: u32) -> bool {
        match self.request_page(new_page) {
            Some(ticket) => {
                self.run(api, ticket).await;
                true
            }
            None => false,
        }
    }

    pub fn request_next(&mut self) -> Option<FetchTicket> {
        self.request_page(self.pagination.page.saturating_add(1))
    }

    pub fn request_prev(&mut self) -> Option<FetchTicket> {
        self.request_page(self.pagination.page.saturating_sub(1))
    }

    /// Fetch `page` together with the current filters in a single request.
    ///
    /// For one-shot queries where no listing has been loaded yet, so the
    /// page count is unknown and the range can only be checked against the
    /// response. Default filters are sent as no fragment; the page-change
    /// policy does not apply.
    pub fn request_at(&mut self, page: u32) -> FetchTicket {
        self.pagination.page = page.max(1);
        if self.filters.is_default() {
            self.active_fragment = None;
            self.begin_fetch(None)
        } else {
            self.request_search()
        }
    }

    pub async fn fetch_at(&mut self, api: &dyn CatalogApi, page: u32) -> bool {
        let ticket = self.request_at(page);
        self.run(api, ticket).await
    }

    async fn run(&mut self, api: &dyn CatalogApi, ticket: FetchTicket) -> bool {
        let result = ticket.execute(api).await;
        self.complete_fetch(&ticket, result)
    }
}

impl Default for CatalogQueryEngine {
    fn default() -> Self {
        Self::new(PageChangePolicy::default())
    }
}
