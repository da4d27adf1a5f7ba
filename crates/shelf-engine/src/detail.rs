//! Detail view state for a single catalog entry

use shelf_api::CatalogApi;
use shelf_core::{CartLineItem, CatalogEntry, Error, MAX_AMOUNT_CHOICE, Result};
use tracing::warn;

use crate::cart::CartWriter;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Loaded(CatalogEntry),
    Absent,
}

pub struct DetailView {
    id: u64,
    state: DetailState,
    selected_color: Option<String>,
    amount: u32,
    last_error: Option<String>,
}

impl DetailView {
    /// A view for `id`; it stays in `Loading` until a load completes
    pub fn new(id: u64) -> Self {
        Self {
            id,
            state: DetailState::Loading,
            selected_color: None,
            amount: 1,
            last_error: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn entry(&self) -> Option<&CatalogEntry> {
        match &self.state {
            DetailState::Loaded(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, DetailState::Loading)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.state, DetailState::Absent)
    }

    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Why the last load failed, when it was not a plain "not found"
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn begin_load(&mut self) {
        self.state = DetailState::Loading;
        self.last_error = None;
    }

    /// Apply a load result. Results for another id are ignored.
    pub fn complete_load(&mut self, id: u64, result: Result<CatalogEntry>) -> bool {
        if id != self.id {
            return false;
        }

        match result {
            Ok(entry) => {
                self.selected_color = entry.default_color().map(str::to_string);
                self.amount = 1;
                self.last_error = None;
                self.state = DetailState::Loaded(entry);
            }
            Err(e) => {
                warn!(id, error = %e, "failed to load catalog entry");
                self.last_error = match e {
                    Error::NotFound(_) => None,
                    other => Some(other.to_string()),
                };
                self.selected_color = None;
                self.state = DetailState::Absent;
            }
        }
        true
    }

    pub async fn load_entry(&mut self, api: &dyn CatalogApi) {
        self.begin_load();
        let result = api.get_product(self.id).await;
        self.complete_load(self.id, result);
    }

    /// Select one of the loaded entry's colors
    pub fn select_color(&mut self, color: &str) -> bool {
        match self.entry() {
            Some(entry) if entry.has_color(color) => {
                self.selected_color = Some(color.to_string());
                true
            }
            _ => false,
        }
    }

    /// Move the selection to the next listed color, wrapping around
    pub fn cycle_color(&mut self) {
        let Some(entry) = self.entry() else {
            return;
        };
        let colors = &entry.attributes.colors;
        if colors.is_empty() {
            return;
        }

        let next = match self.selected_color.as_deref() {
            Some(current) => colors
                .iter()
                .position(|c| c == current)
                .map_or(0, |i| (i + 1) % colors.len()),
            None => 0,
        };
        let color = colors[next].clone();
        self.selected_color = Some(color);
    }

    /// Amounts outside `1..=MAX_AMOUNT_CHOICE` are refused
    pub fn set_amount(&mut self, amount: u32) -> bool {
        if (1..=MAX_AMOUNT_CHOICE).contains(&amount) {
            self.amount = amount;
            true
        } else {
            false
        }
    }

    pub fn increment_amount(&mut self) -> bool {
        self.set_amount(self.amount + 1)
    }

    pub fn decrement_amount(&mut self) -> bool {
        self.set_amount(self.amount.saturating_sub(1))
    }

    /// Append the loaded entry with the current color and amount to the cart.
    /// Returns `None` when nothing is loaded.
    pub async fn add_to_cart(&self, writer: &CartWriter) -> Result<Option<CartLineItem>> {
        let Some(entry) = self.entry() else {
            return Ok(None);
        };
        let color = self.selected_color.as_deref().unwrap_or_default();
        writer.add_to_cart(entry, color, self.amount).await.map(Some)
    }
}
