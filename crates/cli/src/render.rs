//! Text and JSON rendering of the screens.

use serde::Serialize;

use stocktrack_app::HomeViewModel;
use stocktrack_inventory::{Item, format_date};

pub const NO_ITEMS: &str = "No items in inventory. Add one with `stocktrack add`.";
pub const NO_MATCHES: &str = "No items match the search.";

/// One rendering of the home screen.
#[derive(Debug, Clone, Serialize)]
pub struct HomeSnapshot {
    pub month_total_label: String,
    pub year_total_label: String,
    pub month_total: f64,
    pub year_total: f64,
    pub search: String,
    pub items: Vec<Item>,
    #[serde(skip)]
    pub store_empty: bool,
}

impl HomeSnapshot {
    pub fn capture(home: &HomeViewModel) -> Self {
        Self {
            month_total_label: home.month_total_label(),
            year_total_label: home.year_total_label(),
            month_total: home.total_price_for_current_month(),
            year_total: home.total_price_for_current_year(),
            search: home.search_query().to_string(),
            items: home.visible_items(),
            store_empty: home.is_empty(),
        }
    }
}

pub fn home_text(snapshot: &HomeSnapshot) -> String {
    let mut out = format!(
        "{}\n{}\n\n",
        snapshot.month_total_label, snapshot.year_total_label
    );

    if snapshot.store_empty {
        out.push_str(NO_ITEMS);
        return out;
    }
    if snapshot.items.is_empty() {
        out.push_str(NO_MATCHES);
        return out;
    }

    out.push_str(&format!(
        "{:>4}  {:<20} {:>12}  {:<20}  {}\n",
        "ID", "NAME", "PRICE", "STOCK", "EXPIRES"
    ));
    let rows: Vec<String> = snapshot.items.iter().map(item_row).collect();
    out.push_str(&rows.join("\n"));
    out
}

pub fn item_row(item: &Item) -> String {
    format!(
        "{:>4}  {:<20} {:>12}  {:<20}  {}",
        item.id.as_i64(),
        item.name,
        item.formatted_price(),
        item.stock_status().to_string(),
        item.formatted_expiry()
    )
}

/// The details screen. "Date updated" only appears when it differs from
/// "date added" at display precision.
pub fn details_text(item: &Item) -> String {
    let mut lines = vec![
        item.name.clone(),
        format!("  Id:            {}", item.id),
        format!("  Price:         {}", item.formatted_price()),
        format!("  Stock:         {}", item.stock_status()),
        format!("  Date added:    {}", format_date(&item.date_added)),
    ];
    if item.shows_updated_date() {
        lines.push(format!("  Date updated:  {}", format_date(&item.date_updated)));
    }
    lines.push(format!("  Expires:       {}", item.formatted_expiry()));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};
    use stocktrack_core::ItemId;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn item(id: i64, name: &str, quantity: i64) -> Item {
        Item {
            id: ItemId::from_raw(id),
            name: name.to_string(),
            price: 1234.5,
            quantity,
            date_added: at(2026, 1, 1, 9),
            date_updated: at(2026, 1, 1, 9),
            date_expire: at(2026, 7, 1, 0),
        }
    }

    fn snapshot(items: Vec<Item>, store_empty: bool) -> HomeSnapshot {
        HomeSnapshot {
            month_total_label: "Total price for Jul 2026: $20.00".to_string(),
            year_total_label: "Total price for year 2026: $26.00".to_string(),
            month_total: 20.0,
            year_total: 26.0,
            search: String::new(),
            items,
            store_empty,
        }
    }

    #[test]
    fn home_text_lists_rows_under_totals() {
        let text = home_text(&snapshot(vec![item(1, "Game", 200), item(2, "Pen", 0)], false));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Total price for Jul 2026: $20.00");
        assert_eq!(lines[1], "Total price for year 2026: $26.00");
        assert!(lines[3].contains("NAME"));
        assert!(lines[4].contains("Game"));
        assert!(lines[4].contains("$1,234.50"));
        assert!(lines[4].contains("200 items in stock"));
        assert!(lines[5].contains("Out of stock"));
        assert!(lines[5].contains("07/01/2026 12:00:00 AM"));
    }

    #[test]
    fn home_text_distinguishes_empty_store_from_no_matches() {
        assert!(home_text(&snapshot(vec![], true)).ends_with(NO_ITEMS));
        assert!(home_text(&snapshot(vec![], false)).ends_with(NO_MATCHES));
    }

    #[test]
    fn details_hide_unchanged_update_date() {
        let fresh = item(3, "Pen", 1);
        let text = details_text(&fresh);
        assert!(text.starts_with("Pen\n"));
        assert!(text.contains("1 item in stock"));
        assert!(text.contains("01/01/2026 09:00:00 AM"));
        assert!(!text.contains("Date updated"));

        let touched = Item {
            date_updated: at(2026, 2, 1, 15),
            ..fresh
        };
        assert!(details_text(&touched).contains("Date updated:  02/01/2026 03:00:00 PM"));
    }

    #[test]
    fn json_snapshot_omits_render_only_fields() {
        let value = serde_json::to_value(snapshot(vec![item(1, "Pen", 2)], false)).unwrap();
        assert_eq!(value["month_total"], 20.0);
        assert_eq!(value["items"][0]["name"], "Pen");
        assert_eq!(value["items"][0]["id"], 1);
        assert!(value.get("store_empty").is_none());
    }
}
