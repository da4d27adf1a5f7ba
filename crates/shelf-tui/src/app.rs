use std::sync::Arc;

use anyhow::Result;
use shelf_api::CatalogApi;
use shelf_core::{CatalogEntry, ListingPage, parse_facet, ALL_SENTINEL};
use shelf_engine::{CartWriter, CatalogQueryEngine, DetailView, FetchTicket, PageChangePolicy};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Step used by the price keys
const PRICE_STEP: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Listing,
    Detail(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    EditingSearch,
    EditingPrice,
    ShowingHelp,
}

/// Result of a background fetch, delivered back to the event loop
pub enum FetchOutcome {
    Listing(FetchTicket, shelf_core::Result<ListingPage>),
    Detail(u64, shelf_core::Result<CatalogEntry>),
}

pub struct App {
    pub route: Route,
    pub engine: CatalogQueryEngine,
    pub detail: Option<DetailView>,
    pub selected: usize,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub status_message: Option<String>,
    pub should_quit: bool,
    api: Arc<dyn CatalogApi>,
    cart: CartWriter,
    tx: mpsc::UnboundedSender<FetchOutcome>,
    listing_task: Option<JoinHandle<()>>,
    detail_task: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        cart: CartWriter,
        policy: PageChangePolicy,
        tx: mpsc::UnboundedSender<FetchOutcome>,
    ) -> Self {
        Self {
            route: Route::Listing,
            engine: CatalogQueryEngine::new(policy),
            detail: None,
            selected: 0,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            status_message: None,
            should_quit: false,
            api,
            cart,
            tx,
            listing_task: None,
            detail_task: None,
        }
    }

    /// Initial unfiltered fetch of the listing screen
    pub fn mount(&mut self) {
        let ticket = self.engine.begin_fetch(None);
        self.spawn_listing(ticket);
    }

    fn spawn_listing(&mut self, ticket: FetchTicket) {
        // the superseded request can no longer be applied, so stop it
        if let Some(task) = self.listing_task.take() {
            task.abort();
        }

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.listing_task = Some(tokio::spawn(async move {
            let result = ticket.execute(api.as_ref()).await;
            let _ = tx.send(FetchOutcome::Listing(ticket, result));
        }));
    }

    fn spawn_detail(&mut self, id: u64) {
        if let Some(task) = self.detail_task.take() {
            task.abort();
        }

        let api = self.api.clone();
        let tx = self.tx.clone();
        self.detail_task = Some(tokio::spawn(async move {
            let result = api.get_product(id).await;
            let _ = tx.send(FetchOutcome::Detail(id, result));
        }));
    }

    pub fn apply(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Listing(ticket, result) => {
                if self.engine.complete_fetch(&ticket, result) {
                    self.listing_task = None;
                    self.selected = self
                        .selected
                        .min(self.engine.entries().len().saturating_sub(1));
                    self.status_message = self
                        .engine
                        .last_error()
                        .map(|e| format!("Failed to load products: {}", e));
                }
            }
            FetchOutcome::Detail(id, result) => {
                if let Some(detail) = self.detail.as_mut()
                    && detail.complete_load(id, result)
                {
                    self.detail_task = None;
                }
            }
        }
    }

    /// Abort every outstanding fetch
    pub fn shutdown(&mut self) {
        for task in [self.listing_task.take(), self.detail_task.take()]
            .into_iter()
            .flatten()
        {
            task.abort();
        }
    }

    // ---------------------------------------------------------------------
    // Listing
    // ---------------------------------------------------------------------

    pub fn next(&mut self) {
        let len = self.engine.entries().len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    pub fn previous(&mut self) {
        let len = self.engine.entries().len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn selected_entry(&self) -> Option<&CatalogEntry> {
        self.engine.entries().get(self.selected)
    }

    pub fn next_page(&mut self) {
        if let Some(ticket) = self.engine.request_next() {
            self.selected = 0;
            self.spawn_listing(ticket);
        }
    }

    pub fn prev_page(&mut self) {
        if let Some(ticket) = self.engine.request_prev() {
            self.selected = 0;
            self.spawn_listing(ticket);
        }
    }

    pub fn search(&mut self) {
        let ticket = self.engine.request_search();
        self.selected = 0;
        self.status_message = None;
        self.spawn_listing(ticket);
    }

    pub fn reset(&mut self) {
        let ticket = self.engine.request_reset();
        self.selected = 0;
        self.status_message = Some("Filters reset".to_string());
        self.spawn_listing(ticket);
    }

    pub fn cycle_category(&mut self) {
        let next = cycle_facet(
            self.engine.filters().category.as_deref(),
            &self.engine.meta().categories,
        );
        self.engine.filters_mut().category = next;
    }

    pub fn cycle_company(&mut self) {
        let next = cycle_facet(
            self.engine.filters().company.as_deref(),
            &self.engine.meta().companies,
        );
        self.engine.filters_mut().company = next;
    }

    pub fn cycle_order(&mut self) {
        let filters = self.engine.filters_mut();
        filters.order = filters.order.cycle();
    }

    pub fn raise_price(&mut self) {
        let filters = self.engine.filters_mut();
        let price = filters.max_price.saturating_add(PRICE_STEP);
        filters.set_max_price(price);
    }

    pub fn lower_price(&mut self) {
        let filters = self.engine.filters_mut();
        let price = filters.max_price.saturating_sub(PRICE_STEP);
        filters.set_max_price(price);
    }

    // ---------------------------------------------------------------------
    // Navigation
    // ---------------------------------------------------------------------

    pub fn open_selected(&mut self) {
        if let Some(id) = self.selected_entry().map(|e| e.id) {
            self.navigate(Route::Detail(id));
        }
    }

    pub fn navigate(&mut self, route: Route) {
        debug!(?route, "navigate");
        self.route = route;
        match route {
            Route::Listing => {
                if let Some(task) = self.detail_task.take() {
                    task.abort();
                }
                self.detail = None;
            }
            Route::Detail(id) => {
                self.detail = Some(DetailView::new(id));
                self.spawn_detail(id);
            }
        }
        self.status_message = None;
    }

    // ---------------------------------------------------------------------
    // Detail
    // ---------------------------------------------------------------------

    pub fn cycle_color(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.cycle_color();
        }
    }

    pub fn increment_amount(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.increment_amount();
        }
    }

    pub fn decrement_amount(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.decrement_amount();
        }
    }

    pub async fn add_to_cart(&mut self) -> Result<()> {
        let Some(detail) = self.detail.as_ref() else {
            return Ok(());
        };

        self.status_message = match detail.add_to_cart(&self.cart).await {
            Ok(Some(line)) => Some(format!(
                "Added {} x {} to bag",
                line.amount, line.title
            )),
            Ok(None) => None,
            Err(e) => Some(format!("Failed to add to bag: {}", e)),
        };
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Input
    // ---------------------------------------------------------------------

    pub fn start_edit_search(&mut self) {
        self.input_mode = InputMode::EditingSearch;
        self.input_buffer = self.engine.filters().search.clone();
    }

    pub fn start_edit_price(&mut self) {
        self.input_mode = InputMode::EditingPrice;
        self.input_buffer = self.engine.filters().max_price.to_string();
    }

    pub fn toggle_help(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::ShowingHelp => InputMode::Normal,
            _ => InputMode::ShowingHelp,
        };
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    pub fn input_char(&mut self, c: char) {
        if self.input_mode == InputMode::EditingPrice && !c.is_ascii_digit() {
            return;
        }
        self.input_buffer.push(c);
    }

    pub fn input_backspace(&mut self) {
        self.input_buffer.pop();
    }

    /// Store the edited value in the filters; the search itself is submitted separately
    pub fn confirm_input(&mut self) {
        match self.input_mode {
            InputMode::EditingSearch => {
                self.engine.filters_mut().search = self.input_buffer.trim().to_string();
            }
            InputMode::EditingPrice => match self.input_buffer.parse::<u32>() {
                Ok(price) => self.engine.filters_mut().set_max_price(price),
                Err(_) => self.status_message = Some("Price must be a number".to_string()),
            },
            _ => {}
        }
        self.cancel_input();
    }
}

/// Next facet value after `current`; the sentinel entry is skipped and
/// wrapping past the last value returns to unconstrained.
pub fn cycle_facet(current: Option<&str>, values: &[String]) -> Option<String> {
    let choices: Vec<&String> = values
        .iter()
        .filter(|v| !v.eq_ignore_ascii_case(ALL_SENTINEL))
        .collect();

    let next = match current {
        None => choices.first(),
        Some(current) => {
            let pos = choices.iter().position(|v| v.as_str() == current);
            match pos {
                Some(i) => choices.get(i + 1),
                None => choices.first(),
            }
        }
    };
    next.and_then(|v| parse_facet(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shelf_core::{Error, ListingMeta, PaginationState, QueryFragment};
    use shelf_storage::MemoryCartStore;

    struct StaticCatalog;

    #[async_trait]
    impl CatalogApi for StaticCatalog {
        async fn list_products(
            &self,
            page: u32,
            _fragment: Option<&QueryFragment>,
        ) -> shelf_core::Result<ListingPage> {
            Ok(ListingPage {
                data: Vec::new(),
                meta: Some(ListingMeta {
                    categories: vec!["all".to_string(), "Beds".to_string()],
                    companies: vec!["all".to_string()],
                    pagination: Some(PaginationState {
                        page,
                        page_count: 2,
                        total: 0,
                    }),
                }),
            })
        }

        async fn get_product(&self, id: u64) -> shelf_core::Result<CatalogEntry> {
            Err(Error::NotFound(id))
        }
    }

    fn app() -> (App, mpsc::UnboundedReceiver<FetchOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            Arc::new(StaticCatalog),
            CartWriter::new(Arc::new(MemoryCartStore::new())),
            PageChangePolicy::KeepFilters,
            tx,
        );
        (app, rx)
    }

    #[test]
    fn test_cycle_facet() {
        let values = vec!["all".to_string(), "Beds".to_string(), "Sofas".to_string()];
        assert_eq!(cycle_facet(None, &values), Some("Beds".to_string()));
        assert_eq!(cycle_facet(Some("Beds"), &values), Some("Sofas".to_string()));
        assert_eq!(cycle_facet(Some("Sofas"), &values), None);
        assert_eq!(cycle_facet(Some("Gone"), &values), Some("Beds".to_string()));
        assert_eq!(cycle_facet(None, &[]), None);
    }

    #[tokio::test]
    async fn test_mount_applies_listing() {
        let (mut app, mut rx) = app();
        app.mount();
        assert!(app.engine.is_loading());

        let outcome = rx.recv().await.unwrap();
        app.apply(outcome);

        assert!(!app.engine.is_loading());
        assert_eq!(app.engine.pagination().page_count, 2);
        assert_eq!(app.engine.meta().categories.len(), 2);
    }

    #[tokio::test]
    async fn test_detail_navigation_round_trip() {
        let (mut app, mut rx) = app();
        app.navigate(Route::Detail(42));
        assert!(app.detail.as_ref().unwrap().is_loading());

        let outcome = rx.recv().await.unwrap();
        app.apply(outcome);
        assert!(app.detail.as_ref().unwrap().is_absent());

        app.navigate(Route::Listing);
        assert_eq!(app.route, Route::Listing);
        assert!(app.detail.is_none());
    }

    #[test]
    fn test_price_input_and_steps() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            Arc::new(StaticCatalog),
            CartWriter::new(Arc::new(MemoryCartStore::new())),
            PageChangePolicy::KeepFilters,
            tx,
        );

        app.raise_price();
        assert_eq!(app.engine.filters().max_price, 1000);
        app.lower_price();
        assert_eq!(app.engine.filters().max_price, 950);

        app.start_edit_price();
        app.input_buffer.clear();
        for c in "2x50".chars() {
            app.input_char(c);
        }
        app.confirm_input();
        assert_eq!(app.engine.filters().max_price, 250);
        assert_eq!(app.input_mode, InputMode::Normal);
    }
}
