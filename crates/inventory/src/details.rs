//! Editable item form used by the entry and edit screens.
//!
//! Every field is kept as the text the user typed; conversion to an [`Item`]
//! happens only on save, after validation.

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use stocktrack_core::{DomainError, DomainResult, ItemId};

use crate::item::{Item, NewItem};

/// Input format of the expiry field.
pub const EXPIRY_INPUT_FORMAT: &str = "%m/%d/%Y";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: Option<ItemId>,
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub date_expire: String,
}

impl ItemDetails {
    pub fn from_item(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            price: item.price.to_string(),
            quantity: item.quantity.to_string(),
            date_expire: item.date_expire.format(EXPIRY_INPUT_FORMAT).to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        self.parse_price()?;
        self.parse_quantity()?;
        self.parse_expiry()?;
        Ok(())
    }

    /// Build a new row stamped with `now` as both added and updated dates.
    pub fn to_new_item(&self, now: DateTime<Local>) -> DomainResult<NewItem> {
        self.validate()?;
        Ok(NewItem {
            name: self.name.trim().to_string(),
            price: self.parse_price()?,
            quantity: self.parse_quantity()?,
            date_added: now,
            date_updated: now,
            date_expire: self.parse_expiry()?,
        })
    }

    /// Apply the form onto a stored item, keeping its id and added date.
    pub fn apply_to(&self, item: &Item, now: DateTime<Local>) -> DomainResult<Item> {
        self.validate()?;
        Ok(Item {
            id: item.id,
            name: self.name.trim().to_string(),
            price: self.parse_price()?,
            quantity: self.parse_quantity()?,
            date_added: item.date_added,
            date_updated: now,
            date_expire: self.parse_expiry()?,
        })
    }

    fn parse_price(&self) -> DomainResult<f64> {
        let raw = self.price.trim();
        if raw.is_empty() {
            return Err(DomainError::validation("price cannot be empty"));
        }
        let price = raw
            .trim_start_matches('$')
            .replace(',', "")
            .parse::<f64>()
            .map_err(|_| DomainError::validation(format!("price is not a number: {raw}")))?;
        if !price.is_finite() {
            return Err(DomainError::validation("price must be finite"));
        }
        Ok(price)
    }

    fn parse_quantity(&self) -> DomainResult<i64> {
        let raw = self.quantity.trim();
        if raw.is_empty() {
            return Err(DomainError::validation("quantity cannot be empty"));
        }
        raw.replace(',', "")
            .parse::<i64>()
            .map_err(|_| DomainError::validation(format!("quantity is not an integer: {raw}")))
    }

    fn parse_expiry(&self) -> DomainResult<DateTime<Local>> {
        let raw = self.date_expire.trim();
        let date = NaiveDate::parse_from_str(raw, EXPIRY_INPUT_FORMAT).map_err(|_| {
            DomainError::validation(format!("expiry must be MM/DD/YYYY, got {raw:?}"))
        })?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| DomainError::validation("invalid expiry time"))?;
        // Ambiguous midnight (clocks set back) takes the earlier instant. Midnight
        // inside a DST gap does not exist, so the date starts an hour later.
        Local
            .from_local_datetime(&midnight)
            .earliest()
            .or_else(|| Local.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
            .ok_or_else(|| DomainError::validation(format!("expiry does not exist locally: {raw}")))
    }
}
