//! In-memory item store for tests/dev.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Datelike;
use tokio::sync::broadcast;

use stocktrack_core::ItemId;
use stocktrack_inventory::{Item, MonthOfYear, NewItem, stock_value};

use crate::changes::{ChangeBus, ItemChange};
use crate::dao::ItemDao;
use crate::error::StoreResult;

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<ItemId, Item>,
    last_id: i64,
}

/// `ItemDao` backed by a map; same ordering and change semantics as SQLite.
#[derive(Debug, Default)]
pub struct InMemoryItemDao {
    table: RwLock<Table>,
    changes: ChangeBus,
}

impl InMemoryItemDao {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(&self) -> Vec<Item> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.rows.values().cloned().collect()
    }
}

#[async_trait]
impl ItemDao for InMemoryItemDao {
    async fn insert(&self, item: NewItem) -> StoreResult<Item> {
        let stored = {
            let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
            table.last_id += 1;
            let stored = item.with_id(ItemId::from_raw(table.last_id));
            table.rows.insert(stored.id, stored.clone());
            stored
        };
        self.changes.publish(ItemChange::Inserted(stored.id));
        Ok(stored)
    }

    async fn update(&self, item: &Item) -> StoreResult<()> {
        let updated = {
            let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
            match table.rows.get_mut(&item.id) {
                Some(row) => {
                    *row = item.clone();
                    true
                }
                None => false,
            }
        };
        if updated {
            self.changes.publish(ItemChange::Updated(item.id));
        }
        Ok(())
    }

    async fn delete(&self, item: &Item) -> StoreResult<()> {
        let removed = {
            let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
            table.rows.remove(&item.id).is_some()
        };
        if removed {
            self.changes.publish(ItemChange::Deleted(item.id));
        }
        Ok(())
    }

    async fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        Ok(table.rows.get(&id).cloned())
    }

    async fn get_all_items(&self) -> StoreResult<Vec<Item>> {
        let mut items = self.snapshot();
        // SQLite's default BINARY collation compares bytes.
        items.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn total_price_for_month(&self, period: MonthOfYear) -> StoreResult<f64> {
        let items = self.snapshot();
        Ok(stock_value(&items, |i| period.contains(&i.date_expire)))
    }

    async fn total_price_for_year(&self, year: i32) -> StoreResult<f64> {
        let items = self.snapshot();
        Ok(stock_value(&items, |i| i.date_expire.year() == year))
    }

    fn subscribe(&self) -> broadcast::Receiver<ItemChange> {
        self.changes.subscribe()
    }
}
