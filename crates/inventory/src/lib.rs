//! Inventory domain module.
//!
//! This crate contains the item model and the pure logic the screens derive
//! from it (formatting, search, stock mutations, period aggregates). No IO, no
//! storage.

pub mod details;
pub mod format;
pub mod item;
pub mod period;
pub mod search;

pub use details::ItemDetails;
pub use format::{StockStatus, format_date, format_price, format_quantity};
pub use item::{Item, NewItem};
pub use period::{MonthOfYear, stock_value};
pub use search::{filter_items, matches_query};
