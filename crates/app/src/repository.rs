//! Repository facade over the item gateway.

use std::sync::Arc;

use futures::FutureExt;

use stocktrack_core::ItemId;
use stocktrack_inventory::{Item, MonthOfYear, NewItem};
use stocktrack_store::{ItemDao, LiveQuery, StoreResult};

/// Thin delegation layer between view-models and an [`ItemDao`].
///
/// No validation and no transactions: each call is one statement against the
/// store. Cheap to clone.
#[derive(Clone)]
pub struct ItemsRepository {
    dao: Arc<dyn ItemDao>,
}

impl ItemsRepository {
    pub fn new(dao: Arc<dyn ItemDao>) -> Self {
        Self { dao }
    }

    /// All items ordered by name, re-emitted on every change.
    pub async fn all_items_stream(&self) -> StoreResult<LiveQuery<Vec<Item>>> {
        LiveQuery::spawn(self.dao.clone(), "all_items", |dao| {
            async move { dao.get_all_items().await }.boxed()
        })
        .await
    }

    /// One item; `None` once the row is gone.
    pub async fn item_stream(&self, id: ItemId) -> StoreResult<LiveQuery<Option<Item>>> {
        LiveQuery::spawn(self.dao.clone(), "item", move |dao| {
            async move { dao.get_item(id).await }.boxed()
        })
        .await
    }

    pub async fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.dao.get_item(id).await
    }

    pub async fn insert_item(&self, item: NewItem) -> StoreResult<Item> {
        self.dao.insert(item).await
    }

    pub async fn update_item(&self, item: &Item) -> StoreResult<()> {
        self.dao.update(item).await
    }

    pub async fn delete_item(&self, item: &Item) -> StoreResult<()> {
        self.dao.delete(item).await
    }

    pub async fn total_price_for_month(&self, period: MonthOfYear) -> StoreResult<LiveQuery<f64>> {
        LiveQuery::spawn(self.dao.clone(), "total_price_for_month", move |dao| {
            async move { dao.total_price_for_month(period).await }.boxed()
        })
        .await
    }

    pub async fn total_price_for_year(&self, year: i32) -> StoreResult<LiveQuery<f64>> {
        LiveQuery::spawn(self.dao.clone(), "total_price_for_year", move |dao| {
            async move { dao.total_price_for_year(year).await }.boxed()
        })
        .await
    }
}
