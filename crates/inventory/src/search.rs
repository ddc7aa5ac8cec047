//! Client-side search over an already materialised item list.

use crate::item::Item;

/// Case-insensitive substring match against the name, formatted price, or
/// formatted expiry date. An empty query matches everything.
pub fn matches_query(item: &Item, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    item.name.to_lowercase().contains(&needle)
        || item.formatted_price().to_lowercase().contains(&needle)
        || item.formatted_expiry().to_lowercase().contains(&needle)
}

/// Single linear scan; preserves input order.
pub fn filter_items(items: &[Item], query: &str) -> Vec<Item> {
    items
        .iter()
        .filter(|item| matches_query(item, query))
        .cloned()
        .collect()
}
