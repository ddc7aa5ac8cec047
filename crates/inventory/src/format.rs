//! Display formatting shared by every screen.

use chrono::{DateTime, TimeZone};

/// `MM/DD/YYYY hh:mm:ss AM`, matching what the list and details screens show.
pub const DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Quantity-derived stock label.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockStatus {
    OutOfStock,
    One,
    InStock(i64),
}

impl StockStatus {
    pub fn from_quantity(quantity: i64) -> Self {
        match quantity {
            q if q <= 0 => StockStatus::OutOfStock,
            1 => StockStatus::One,
            q => StockStatus::InStock(q),
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StockStatus::OutOfStock => f.write_str("Out of stock"),
            StockStatus::One => f.write_str("1 item in stock"),
            StockStatus::InStock(q) => write!(f, "{} items in stock", format_quantity(*q)),
        }
    }
}

/// US currency format: `$1,234.50`, `-$3.00`.
pub fn format_price(price: f64) -> String {
    let cents = (price.abs() * 100.0).round() as u64;
    let sign = if price.is_sign_negative() && cents > 0 { "-" } else { "" };
    format!("{sign}${}.{:02}", group_thousands(cents / 100), cents % 100)
}

/// Integer with thousands separators (`30,000`).
pub fn format_quantity(quantity: i64) -> String {
    let digits = group_thousands(quantity.unsigned_abs());
    if quantity < 0 {
        format!("-{digits}")
    } else {
        digits
    }
}

pub fn format_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: core::fmt::Display,
{
    date.format(DATE_FORMAT).to_string()
}

fn group_thousands(value: u64) -> String {
    let raw = value.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, ch) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn prices_use_currency_format() {
        assert_eq!(format_price(0.0), "$0.00");
        assert_eq!(format_price(10.0), "$10.00");
        assert_eq!(format_price(1234.5), "$1,234.50");
        assert_eq!(format_price(1_000_000.129), "$1,000,000.13");
        assert_eq!(format_price(-3.0), "-$3.00");
        assert_eq!(format_price(-0.001), "$0.00");
    }

    #[test]
    fn quantities_use_thousands_separators() {
        assert_eq!(format_quantity(0), "0");
        assert_eq!(format_quantity(999), "999");
        assert_eq!(format_quantity(30_000), "30,000");
        assert_eq!(format_quantity(1_234_567), "1,234,567");
        assert_eq!(format_quantity(-1_500), "-1,500");
    }

    #[test]
    fn stock_labels() {
        assert_eq!(StockStatus::from_quantity(-2).to_string(), "Out of stock");
        assert_eq!(StockStatus::from_quantity(0).to_string(), "Out of stock");
        assert_eq!(StockStatus::from_quantity(1).to_string(), "1 item in stock");
        assert_eq!(
            StockStatus::from_quantity(30_000).to_string(),
            "30,000 items in stock"
        );
    }

    #[test]
    fn dates_use_twelve_hour_clock() {
        let date = Utc.with_ymd_and_hms(2026, 7, 4, 15, 5, 9).unwrap();
        assert_eq!(format_date(&date), "07/04/2026 03:05:09 PM");
    }
}
