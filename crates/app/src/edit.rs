//! Item edit screen.

use chrono::Local;

use stocktrack_core::{DomainError, ItemId};
use stocktrack_inventory::{Item, ItemDetails};

use crate::entry::ItemUiState;
use crate::error::AppResult;
use crate::repository::ItemsRepository;

pub struct ItemEditViewModel {
    repository: ItemsRepository,
    original: Item,
    item_ui_state: ItemUiState,
}

impl ItemEditViewModel {
    /// Load the item once; later writes elsewhere do not refresh the form.
    pub async fn new(repository: ItemsRepository, item_id: ItemId) -> AppResult<Self> {
        let original = repository
            .get_item(item_id)
            .await?
            .ok_or(DomainError::NotFound)?;
        let item_ui_state = ItemUiState::new(ItemDetails::from_item(&original));

        Ok(Self {
            repository,
            original,
            item_ui_state,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.original.id
    }

    pub fn ui_state(&self) -> &ItemUiState {
        &self.item_ui_state
    }

    pub fn update_ui_state(&mut self, item_details: ItemDetails) {
        self.item_ui_state = ItemUiState::new(item_details);
    }

    /// Write the form back; id and date added are kept, date updated is now.
    pub async fn update_item(&self) -> AppResult<Item> {
        let updated = self
            .item_ui_state
            .item_details
            .apply_to(&self.original, Local::now())?;
        self.repository.update_item(&updated).await?;
        tracing::info!(id = %updated.id, "edited item");
        Ok(updated)
    }
}
