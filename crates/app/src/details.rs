//! Item details screen: sell, add stock, delete.

use chrono::Local;

use stocktrack_core::{DomainError, ItemId};
use stocktrack_inventory::Item;
use stocktrack_store::{LiveQuery, StoreResult};

use crate::error::AppResult;
use crate::repository::ItemsRepository;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemDetailsUiState {
    pub out_of_stock: bool,
    /// `None` until the item has been loaded.
    pub item: Option<Item>,
}

impl ItemDetailsUiState {
    fn from_item(item: &Item) -> Self {
        Self {
            out_of_stock: item.is_out_of_stock(),
            item: Some(item.clone()),
        }
    }
}

/// Mutations act on the item currently held in the UI state; they do not
/// re-read storage first, so concurrent edits elsewhere are overwritten.
pub struct ItemDetailsViewModel {
    item_id: ItemId,
    repository: ItemsRepository,
    ui_state: LiveQuery<ItemDetailsUiState>,
}

impl ItemDetailsViewModel {
    pub async fn new(repository: ItemsRepository, item_id: ItemId) -> StoreResult<Self> {
        // A deleted row keeps showing the last known item.
        let ui_state = repository
            .item_stream(item_id)
            .await?
            .filter_map(ItemDetailsUiState::default(), |item| {
                item.as_ref().map(ItemDetailsUiState::from_item)
            });

        Ok(Self {
            item_id,
            repository,
            ui_state,
        })
    }

    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    pub fn ui_state(&self) -> ItemDetailsUiState {
        self.ui_state.get()
    }

    pub fn watch_ui_state(&self) -> LiveQuery<ItemDetailsUiState> {
        self.ui_state.clone()
    }

    fn current_item(&self) -> AppResult<Item> {
        self.ui_state
            .get()
            .item
            .ok_or_else(|| DomainError::not_found().into())
    }

    /// Sell one unit. Returns `false` (and writes nothing) when out of stock.
    pub async fn reduce_quantity_by_one(&self) -> AppResult<bool> {
        let current = self.current_item()?;
        match current.sell_one(Local::now()) {
            Some(sold) => {
                tracing::info!(id = %sold.id, quantity = sold.quantity, "sold one unit");
                self.repository.update_item(&sold).await?;
                Ok(true)
            }
            None => {
                tracing::debug!(id = %current.id, "sell ignored: out of stock");
                Ok(false)
            }
        }
    }

    /// Receive one unit of stock.
    pub async fn add_quantity_by_one(&self) -> AppResult<()> {
        let current = self.current_item()?;
        let restocked = current.restock_one(Local::now());
        tracing::info!(id = %restocked.id, quantity = restocked.quantity, "added one unit");
        self.repository.update_item(&restocked).await?;
        Ok(())
    }

    pub async fn delete_item(&self) -> AppResult<()> {
        let current = self.current_item()?;
        self.repository.delete_item(&current).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::{DateTime, TimeZone};
    use stocktrack_inventory::{NewItem, StockStatus};
    use stocktrack_store::InMemoryItemDao;

    use crate::error::AppError;

    const TIMEOUT: Duration = Duration::from_secs(2);

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    async fn details_for(quantity: i64) -> (ItemsRepository, ItemDetailsViewModel) {
        let repo = ItemsRepository::new(Arc::new(InMemoryItemDao::new()));
        let stored = repo
            .insert_item(NewItem {
                name: "Pen".to_string(),
                price: 2.5,
                quantity,
                date_added: at(2020, 1, 1),
                date_updated: at(2020, 1, 1),
                date_expire: at(2026, 7, 1),
            })
            .await
            .unwrap();
        let vm = ItemDetailsViewModel::new(repo.clone(), stored.id).await.unwrap();
        (repo, vm)
    }

    async fn quantity_becomes(vm: &ItemDetailsViewModel, expected: i64) -> ItemDetailsUiState {
        let mut state = vm.watch_ui_state();
        tokio::time::timeout(
            TIMEOUT,
            state.wait_for(|s| s.item.as_ref().map(|i| i.quantity) == Some(expected)),
        )
        .await
        .unwrap()
        .unwrap()
    }

    #[tokio::test]
    async fn sell_decrements_by_exactly_one_until_out_of_stock() {
        let (_repo, vm) = details_for(2).await;
        assert!(!vm.ui_state().out_of_stock);

        assert!(vm.reduce_quantity_by_one().await.unwrap());
        quantity_becomes(&vm, 1).await;

        assert!(vm.reduce_quantity_by_one().await.unwrap());
        let state = quantity_becomes(&vm, 0).await;
        assert!(state.out_of_stock);
        assert_eq!(state.item.unwrap().stock_status(), StockStatus::OutOfStock);

        assert!(!vm.reduce_quantity_by_one().await.unwrap());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(vm.ui_state().item.unwrap().quantity, 0);
    }

    #[tokio::test]
    async fn add_stock_increments_and_keeps_name_and_price() {
        let (repo, vm) = details_for(0).await;
        assert!(vm.ui_state().out_of_stock);

        vm.add_quantity_by_one().await.unwrap();
        let state = quantity_becomes(&vm, 1).await;
        assert!(!state.out_of_stock);

        let stored = repo.get_item(vm.item_id()).await.unwrap().unwrap();
        assert_eq!(stored.quantity, 1);
        assert_eq!(stored.name, "Pen");
        assert_eq!(stored.price, 2.5);
        assert!(stored.date_updated > stored.date_added);
    }

    #[tokio::test]
    async fn delete_removes_row_and_keeps_last_state() {
        let (repo, vm) = details_for(3).await;
        vm.delete_item().await.unwrap();

        assert_eq!(repo.get_item(vm.item_id()).await.unwrap(), None);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(vm.ui_state().item.unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn unknown_item_reports_not_found() {
        let repo = ItemsRepository::new(Arc::new(InMemoryItemDao::new()));
        let vm = ItemDetailsViewModel::new(repo, ItemId::from_raw(42)).await.unwrap();
        assert_eq!(vm.ui_state(), ItemDetailsUiState::default());

        match vm.add_quantity_by_one().await.unwrap_err() {
            AppError::Domain(DomainError::NotFound) => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }
}
