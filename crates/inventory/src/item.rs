use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use stocktrack_core::ItemId;

use crate::format::{self, StockStatus};

/// A tracked inventory record.
///
/// `quantity` is not range-checked: storage and forms accept zero and negative
/// values, and anything `<= 0` renders as out of stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub date_added: DateTime<Local>,
    pub date_updated: DateTime<Local>,
    pub date_expire: DateTime<Local>,
}

/// An item that has not been stored yet (storage assigns the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
    pub date_added: DateTime<Local>,
    pub date_updated: DateTime<Local>,
    pub date_expire: DateTime<Local>,
}

impl NewItem {
    /// Attach the storage-assigned id.
    pub fn with_id(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            price: self.price,
            quantity: self.quantity,
            date_added: self.date_added,
            date_updated: self.date_updated,
            date_expire: self.date_expire,
        }
    }
}

impl Item {
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.quantity)
    }

    /// Price rendered in US currency format (`$1,234.50`).
    pub fn formatted_price(&self) -> String {
        format::format_price(self.price)
    }

    pub fn formatted_expiry(&self) -> String {
        format::format_date(&self.date_expire)
    }

    /// `price * quantity` for this row.
    pub fn stock_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// The item after selling one unit, or `None` when nothing is left to sell.
    pub fn sell_one(&self, now: DateTime<Local>) -> Option<Item> {
        if self.is_out_of_stock() {
            return None;
        }
        Some(Item {
            quantity: self.quantity - 1,
            date_updated: now,
            ..self.clone()
        })
    }

    /// The item after receiving one unit of stock.
    pub fn restock_one(&self, now: DateTime<Local>) -> Item {
        Item {
            quantity: self.quantity.saturating_add(1),
            date_updated: now,
            ..self.clone()
        }
    }

    /// Whether the details screen should show a separate "date updated" row.
    pub fn shows_updated_date(&self) -> bool {
        format::format_date(&self.date_added) != format::format_date(&self.date_updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn test_item(quantity: i64) -> Item {
        Item {
            id: ItemId::from_raw(1),
            name: "Pen".to_string(),
            price: 2.5,
            quantity,
            date_added: at(2026, 1, 10),
            date_updated: at(2026, 1, 10),
            date_expire: at(2026, 7, 1),
        }
    }

    #[test]
    fn sell_one_decrements_and_stamps_update() {
        let now = at(2026, 2, 1);
        let sold = test_item(3).sell_one(now).unwrap();
        assert_eq!(sold.quantity, 2);
        assert_eq!(sold.date_updated, now);
        assert_eq!(sold.date_added, at(2026, 1, 10));
    }

    #[test]
    fn sell_one_stops_at_out_of_stock() {
        let item = test_item(1);
        let sold = item.sell_one(at(2026, 2, 1)).unwrap();
        assert_eq!(sold.quantity, 0);
        assert_eq!(sold.stock_status(), StockStatus::OutOfStock);
        assert!(sold.sell_one(at(2026, 2, 2)).is_none());
        assert!(test_item(-4).sell_one(at(2026, 2, 2)).is_none());
    }

    #[test]
    fn shows_updated_date_only_when_changed() {
        let item = test_item(1);
        assert!(!item.shows_updated_date());
        let restocked = item.restock_one(at(2026, 3, 5));
        assert!(restocked.shows_updated_date());
    }

    #[test]
    fn stock_value_is_price_times_quantity() {
        let mut item = test_item(2);
        item.price = 10.0;
        assert_eq!(item.stock_value(), 20.0);
        item.quantity = 0;
        assert_eq!(item.stock_value(), 0.0);
    }

    proptest! {
        #[test]
        fn restock_adds_exactly_one_and_keeps_name_and_price(
            quantity in -1_000i64..1_000_000,
            price in 0.0f64..100_000.0,
            name in "[A-Za-z][A-Za-z0-9 ]{0,30}",
        ) {
            let mut item = test_item(quantity);
            item.price = price;
            item.name = name.clone();

            let restocked = item.restock_one(at(2026, 4, 1));
            prop_assert_eq!(restocked.quantity, quantity + 1);
            prop_assert_eq!(restocked.price, price);
            prop_assert_eq!(restocked.name, name);
            prop_assert_eq!(restocked.id, item.id);
        }

        #[test]
        fn sell_never_goes_below_zero(quantity in -1_000i64..1_000) {
            let item = test_item(quantity);
            match item.sell_one(at(2026, 4, 1)) {
                Some(sold) => {
                    prop_assert!(quantity > 0);
                    prop_assert_eq!(sold.quantity, quantity - 1);
                    prop_assert!(sold.quantity >= 0);
                }
                None => prop_assert!(quantity <= 0),
            }
        }
    }
}
