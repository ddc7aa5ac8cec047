//! `stocktrack-app`
//!
//! **Responsibility:** screen state holders over the item store.
//!
//! Each view-model owns the state one screen renders and turns user intents
//! (search, sell, add stock, save, delete) into repository calls. State that
//! derives from storage is a [`LiveQuery`](stocktrack_store::LiveQuery), so it
//! follows writes made from anywhere in the process.

pub mod details;
pub mod edit;
pub mod entry;
pub mod error;
pub mod home;
pub mod repository;

pub use details::{ItemDetailsUiState, ItemDetailsViewModel};
pub use edit::ItemEditViewModel;
pub use entry::{ItemEntryViewModel, ItemUiState};
pub use error::{AppError, AppResult};
pub use home::{HomeUiState, HomeViewModel};
pub use repository::ItemsRepository;
