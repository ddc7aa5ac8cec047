//! SQLite-backed item store.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqliteConnection, SqlitePool};
use tokio::sync::{Notify, broadcast};
use tokio::time::MissedTickBehavior;

use stocktrack_core::ItemId;
use stocktrack_inventory::{Item, MonthOfYear, NewItem, period};

use crate::changes::{ChangeBus, ItemChange};
use crate::config::StoreConfig;
use crate::dao::ItemDao;
use crate::error::{StoreError, StoreResult};

const ITEM_COLUMNS: &str = "id, name, price, quantity, date_added, date_updated, date_expire";

/// `ItemDao` over a single `items` table.
///
/// Timestamps are stored as RFC 3339 text in the writer's local offset, so the
/// year and month of `date_expire` are the fixed substrings `1..4` and `6..7`.
/// This struct is cheap to clone and is safe to share across threads.
#[derive(Debug, Clone)]
pub struct SqliteItemDao {
    pool: SqlitePool,
    changes: ChangeBus,
    file_backed: bool,
}

impl SqliteItemDao {
    /// Open (creating if missing) the database described by `config` and
    /// ensure the schema exists.
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        if let Some(path) = config.database_path() {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

        // An in-memory database exists per connection, so the pool must hold
        // exactly one and never recycle it.
        let pool = if config.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new().connect_with(options).await?
        };

        tracing::info!(database_url = %config.database_url, "opened item store");
        Self::with_pool(pool, !config.is_in_memory()).await
    }

    pub async fn in_memory() -> StoreResult<Self> {
        Self::connect(&StoreConfig::in_memory()).await
    }

    async fn with_pool(pool: SqlitePool, file_backed: bool) -> StoreResult<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                name          TEXT NOT NULL,
                price         REAL NOT NULL,
                quantity      INTEGER NOT NULL,
                date_added    TEXT NOT NULL,
                date_updated  TEXT NOT NULL,
                date_expire   TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self {
            pool,
            changes: ChangeBus::new(),
            file_backed,
        })
    }

    /// Poll for commits made by other connections (another process sharing
    /// the file) and publish them as [`ItemChange::External`].
    ///
    /// Holds one pooled connection for as long as the watcher lives. Commits
    /// from this process's other pooled connections also bump the version, so
    /// local writes are followed by a redundant `External`; live queries
    /// re-query once more and drop the unchanged result. An in-memory database
    /// has no other writers, so this is a config error.
    pub async fn watch_external_writes(&self, poll_every: Duration) -> StoreResult<ExternalWriteWatcher> {
        if !self.file_backed {
            return Err(StoreError::Config(
                "an in-memory database cannot be written by another process".to_string(),
            ));
        }

        let mut conn = self.pool.acquire().await?;
        let mut last_version = data_version(&mut conn).await?;
        let changes = self.changes.clone();
        let shutdown = Arc::new(Notify::new());
        let stop = shutdown.clone();

        tokio::spawn(async move {
            tracing::debug!(?poll_every, "external write watcher started");
            let mut ticker = tokio::time::interval(poll_every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = stop.notified() => break,
                    _ = ticker.tick() => {}
                }

                match data_version(&mut conn).await {
                    Ok(version) if version != last_version => {
                        last_version = version;
                        changes.publish(ItemChange::External);
                    }
                    Ok(_) => {}
                    Err(err) => tracing::warn!("failed to poll data_version: {err}"),
                }
            }
            tracing::debug!("external write watcher stopped");
        });

        Ok(ExternalWriteWatcher { shutdown })
    }

    async fn sum_where(&self, filter: &str, binds: &[String]) -> StoreResult<f64> {
        let sql = format!(
            "SELECT CAST(COALESCE(SUM(price * quantity), 0) AS REAL) AS total FROM items WHERE {filter}"
        );
        let mut query = sqlx::query(&sql);
        for value in binds {
            query = query.bind(value);
        }
        let row = query.fetch_one(&self.pool).await?;
        Ok(row.try_get::<f64, _>("total")?)
    }
}

#[async_trait]
impl ItemDao for SqliteItemDao {
    async fn insert(&self, item: NewItem) -> StoreResult<Item> {
        let result = sqlx::query(
            r#"
            INSERT INTO items (name, price, quantity, date_added, date_updated, date_expire)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(item.date_added.to_rfc3339())
        .bind(item.date_updated.to_rfc3339())
        .bind(item.date_expire.to_rfc3339())
        .execute(&self.pool)
        .await?;

        let id = ItemId::from_raw(result.last_insert_rowid());
        tracing::info!(%id, name = %item.name, "inserted item");
        self.changes.publish(ItemChange::Inserted(id));
        Ok(item.with_id(id))
    }

    async fn update(&self, item: &Item) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE items
            SET name = ?2,
                price = ?3,
                quantity = ?4,
                date_added = ?5,
                date_updated = ?6,
                date_expire = ?7
            WHERE id = ?1
            "#,
        )
        .bind(item.id.as_i64())
        .bind(&item.name)
        .bind(item.price)
        .bind(item.quantity)
        .bind(item.date_added.to_rfc3339())
        .bind(item.date_updated.to_rfc3339())
        .bind(item.date_expire.to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id = %item.id, "update matched no row");
            return Ok(());
        }
        tracing::info!(id = %item.id, quantity = item.quantity, "updated item");
        self.changes.publish(ItemChange::Updated(item.id));
        Ok(())
    }

    async fn delete(&self, item: &Item) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(item.id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            tracing::debug!(id = %item.id, "delete matched no row");
            return Ok(());
        }
        tracing::info!(id = %item.id, "deleted item");
        self.changes.publish(ItemChange::Deleted(item.id));
        Ok(())
    }

    async fn get_item(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn get_all_items(&self) -> StoreResult<Vec<Item>> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items ORDER BY name ASC");
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(row_to_item(row)?);
        }
        Ok(items)
    }

    async fn total_price_for_month(&self, period: MonthOfYear) -> StoreResult<f64> {
        self.sum_where(
            "substr(date_expire, 6, 2) = ?1 AND substr(date_expire, 1, 4) = ?2",
            &[period.month_key(), period.year_key()],
        )
        .await
    }

    async fn total_price_for_year(&self, year: i32) -> StoreResult<f64> {
        self.sum_where("substr(date_expire, 1, 4) = ?1", &[period::year_key(year)])
            .await
    }

    fn subscribe(&self) -> broadcast::Receiver<ItemChange> {
        self.changes.subscribe()
    }
}

/// Stops its polling task when dropped.
#[derive(Debug)]
pub struct ExternalWriteWatcher {
    shutdown: Arc<Notify>,
}

impl Drop for ExternalWriteWatcher {
    fn drop(&mut self) {
        self.shutdown.notify_one();
    }
}

/// Changes whenever a connection other than `conn` commits.
async fn data_version(conn: &mut SqliteConnection) -> StoreResult<i64> {
    Ok(sqlx::query_scalar::<_, i64>("PRAGMA data_version")
        .fetch_one(conn)
        .await?)
}

/// Map a database row into an `Item`.
fn row_to_item(row: &SqliteRow) -> StoreResult<Item> {
    let id: i64 = row.try_get("id")?;
    let name: String = row.try_get("name")?;
    let price: f64 = row.try_get("price")?;
    let quantity: i64 = row.try_get("quantity")?;
    let date_added: String = row.try_get("date_added")?;
    let date_updated: String = row.try_get("date_updated")?;
    let date_expire: String = row.try_get("date_expire")?;

    Ok(Item {
        id: ItemId::from_raw(id),
        name,
        price,
        quantity,
        date_added: parse_timestamp("date_added", &date_added)?,
        date_updated: parse_timestamp("date_updated", &date_updated)?,
        date_expire: parse_timestamp("date_expire", &date_expire)?,
    })
}

fn parse_timestamp(column: &str, raw: &str) -> StoreResult<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|e| StoreError::Corrupt {
            table: "items",
            reason: format!("invalid {column} {raw:?}: {e}"),
        })
}
