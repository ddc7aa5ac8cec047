//! Home screen: the item list, search box, and stock-value totals.

use chrono::{Datelike, Local, NaiveDate};

use stocktrack_inventory::{Item, MonthOfYear, filter_items, format_price};
use stocktrack_store::{LiveQuery, StoreResult};

use crate::repository::ItemsRepository;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeUiState {
    pub item_list: Vec<Item>,
}

pub struct HomeViewModel {
    ui_state: LiveQuery<HomeUiState>,
    search_query: String,
    period: MonthOfYear,
    total_for_month: LiveQuery<f64>,
    total_for_year: LiveQuery<f64>,
}

impl HomeViewModel {
    /// Totals are keyed to today's local month and year.
    pub async fn new(repository: &ItemsRepository) -> StoreResult<Self> {
        Self::for_date(repository, Local::now().date_naive()).await
    }

    pub async fn for_date(repository: &ItemsRepository, today: NaiveDate) -> StoreResult<Self> {
        let period = MonthOfYear::containing(&today);

        let ui_state = repository
            .all_items_stream()
            .await?
            .map(|items| HomeUiState {
                item_list: items.clone(),
            });
        let total_for_month = repository.total_price_for_month(period).await?;
        let total_for_year = repository.total_price_for_year(today.year()).await?;

        Ok(Self {
            ui_state,
            search_query: String::new(),
            period,
            total_for_month,
            total_for_year,
        })
    }

    pub fn ui_state(&self) -> HomeUiState {
        self.ui_state.get()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn on_search_query_changed(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    /// Items matching the current search query, in list order.
    pub fn visible_items(&self) -> Vec<Item> {
        filter_items(&self.ui_state.get().item_list, &self.search_query)
    }

    /// No items stored at all (the search query does not affect this).
    pub fn is_empty(&self) -> bool {
        self.ui_state.get().item_list.is_empty()
    }

    pub fn period(&self) -> MonthOfYear {
        self.period
    }

    pub fn total_price_for_current_month(&self) -> f64 {
        self.total_for_month.get()
    }

    pub fn total_price_for_current_year(&self) -> f64 {
        self.total_for_year.get()
    }

    /// `Total price for Jul 2026: $20.00`
    pub fn month_total_label(&self) -> String {
        format!(
            "Total price for {} {}: {}",
            self.period.month_abbrev(),
            self.period.year_key(),
            format_price(self.total_price_for_current_month())
        )
    }

    /// `Total price for year 2026: $20.00`
    pub fn year_total_label(&self) -> String {
        format!(
            "Total price for year {}: {}",
            self.period.year_key(),
            format_price(self.total_price_for_current_year())
        )
    }

    /// Wait until the list or either total changes. Returns `false` once the
    /// store side has shut down.
    pub async fn changed(&mut self) -> bool {
        tokio::select! {
            alive = self.ui_state.changed() => alive,
            alive = self.total_for_month.changed() => alive,
            alive = self.total_for_year.changed() => alive,
        }
    }
}
