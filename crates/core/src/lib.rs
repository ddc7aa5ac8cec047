//! `stocktrack-core`
//!
//! Identifiers and the domain error model shared by every other crate. No
//! infrastructure concerns.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::ItemId;
