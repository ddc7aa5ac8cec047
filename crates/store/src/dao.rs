//! Persistence gateway for the `items` table.

use async_trait::async_trait;
use tokio::sync::broadcast;

use stocktrack_core::ItemId;
use stocktrack_inventory::{Item, MonthOfYear, NewItem};

use crate::changes::ItemChange;
use crate::error::StoreResult;

/// Data-access contract every store implements.
///
/// Writes are single statements; there is no multi-row transaction. Updating
/// or deleting an id that no longer exists is a silent no-op. Every write that
/// touches a row publishes an [`ItemChange`] to [`ItemDao::subscribe`]rs.
#[async_trait]
pub trait ItemDao: Send + Sync {
    /// Store a new row; the returned item carries the assigned id.
    async fn insert(&self, item: NewItem) -> StoreResult<Item>;

    async fn update(&self, item: &Item) -> StoreResult<()>;

    async fn delete(&self, item: &Item) -> StoreResult<()>;

    async fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>>;

    /// All rows ordered by name ascending.
    async fn get_all_items(&self) -> StoreResult<Vec<Item>>;

    /// Sum of `price * quantity` for rows expiring in `period`; `0.0` when none match.
    async fn total_price_for_month(&self, period: MonthOfYear) -> StoreResult<f64>;

    /// Sum of `price * quantity` for rows expiring in `year`; `0.0` when none match.
    async fn total_price_for_year(&self, year: i32) -> StoreResult<f64>;

    fn subscribe(&self) -> broadcast::Receiver<ItemChange>;
}
