//! Database location.

use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreResult};

/// Environment variable the CLI reads the database URL from.
pub const DATABASE_URL_ENV: &str = "STOCKTRACK_DATABASE_URL";

const IN_MEMORY_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    /// A private database that lives as long as its pool.
    pub fn in_memory() -> Self {
        Self::new(IN_MEMORY_URL)
    }

    pub fn for_path(path: &Path) -> Self {
        Self::new(format!("sqlite://{}", path.to_string_lossy()))
    }

    /// `{data_dir}/stocktrack/inventory.db`.
    pub fn default_location() -> StoreResult<Self> {
        let path = default_database_path()?;
        Ok(Self::for_path(&path))
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Filesystem path of the database, when it is file-backed.
    pub fn database_path(&self) -> Option<PathBuf> {
        if self.is_in_memory() {
            return None;
        }
        let raw = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = raw.split('?').next().unwrap_or(raw);
        (!path.is_empty()).then(|| PathBuf::from(path))
    }
}

fn default_database_path() -> StoreResult<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StoreError::Config(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share"
                    .to_string(),
            )
        })?;

    let mut path = base;
    path.push("stocktrack");
    path.push("inventory.db");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_has_no_path() {
        let config = StoreConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.database_path(), None);
    }

    #[test]
    fn file_urls_expose_their_path() {
        let config = StoreConfig::for_path(Path::new("/tmp/stock/inventory.db"));
        assert_eq!(config.database_url, "sqlite:///tmp/stock/inventory.db");
        assert_eq!(
            config.database_path(),
            Some(PathBuf::from("/tmp/stock/inventory.db"))
        );

        let with_query = StoreConfig::new("sqlite:data.db?mode=rwc");
        assert_eq!(with_query.database_path(), Some(PathBuf::from("data.db")));
    }

    #[test]
    fn default_location_ends_in_app_directory() {
        if let Ok(config) = StoreConfig::default_location() {
            let path = config.database_path().unwrap();
            assert!(path.ends_with("stocktrack/inventory.db"));
        }
    }
}
