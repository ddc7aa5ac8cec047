//! Calendar periods used to key the stock-value aggregates.

use chrono::{DateTime, Datelike, TimeZone};

use stocktrack_core::{DomainError, DomainResult};

use crate::item::Item;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A (month, year) pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MonthOfYear {
    month: u32,
    year: i32,
}

impl MonthOfYear {
    pub fn new(month: u32, year: i32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be in 1..=12, got {month}"
            )));
        }
        Ok(Self { month, year })
    }

    /// The month the given date falls in.
    pub fn containing<D: Datelike>(date: &D) -> Self {
        Self {
            month: date.month(),
            year: date.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Two-digit month as stored in the expiry timestamp (`"07"`).
    pub fn month_key(&self) -> String {
        format!("{:02}", self.month)
    }

    /// Four-digit year as stored in the expiry timestamp (`"2026"`).
    pub fn year_key(&self) -> String {
        year_key(self.year)
    }

    pub fn month_abbrev(&self) -> &'static str {
        MONTH_ABBREVIATIONS[(self.month - 1) as usize]
    }

    pub fn contains<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> bool {
        date.month() == self.month && date.year() == self.year
    }
}

pub fn year_key(year: i32) -> String {
    format!("{year:04}")
}

/// Sum of `price * quantity` over the items accepted by `include`.
pub fn stock_value<'a, I, F>(items: I, mut include: F) -> f64
where
    I: IntoIterator<Item = &'a Item>,
    F: FnMut(&Item) -> bool,
{
    items
        .into_iter()
        .filter(|item| include(item))
        .map(Item::stock_value)
        .sum()
}
