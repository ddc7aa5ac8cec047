//! Item entry screen: the "add item" form.

use chrono::Local;

use stocktrack_inventory::{Item, ItemDetails};

use crate::error::AppResult;
use crate::repository::ItemsRepository;

/// Form contents plus whether they can be saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUiState {
    pub item_details: ItemDetails,
    pub is_entry_valid: bool,
}

impl ItemUiState {
    pub fn new(item_details: ItemDetails) -> Self {
        let is_entry_valid = item_details.is_valid();
        Self {
            item_details,
            is_entry_valid,
        }
    }
}

pub struct ItemEntryViewModel {
    repository: ItemsRepository,
    item_ui_state: ItemUiState,
}

impl ItemEntryViewModel {
    pub fn new(repository: ItemsRepository) -> Self {
        Self {
            repository,
            item_ui_state: ItemUiState::default(),
        }
    }

    pub fn ui_state(&self) -> &ItemUiState {
        &self.item_ui_state
    }

    pub fn update_ui_state(&mut self, item_details: ItemDetails) {
        self.item_ui_state = ItemUiState::new(item_details);
    }

    /// Insert the form as a new item, stamped with the current time.
    pub async fn save_item(&self) -> AppResult<Item> {
        let new_item = self
            .item_ui_state
            .item_details
            .to_new_item(Local::now())?;
        let stored = self.repository.insert_item(new_item).await?;
        tracing::info!(id = %stored.id, name = %stored.name, "saved new item");
        Ok(stored)
    }
}
