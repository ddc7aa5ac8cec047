use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use stocktrack_store::{DATABASE_URL_ENV, SqliteItemDao, StoreConfig};

mod commands;
mod render;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "stocktrack")]
#[command(version, about = "Track inventory items, stock levels, and stock value")]
#[command(long_about = r#"Track inventory items, stock levels, and stock value in a local SQLite database.

EXAMPLES:
    # Home screen: totals for this month and year, then every item
    stocktrack list

    # Case-insensitive search over name, price, and expiry date
    stocktrack list --search pen
    stocktrack list --format json | jq '.items[] | .name'

    # Add, edit, sell, restock, delete
    stocktrack add --name Pen --price 2.50 --quantity 100 --expires 07/01/2026
    stocktrack edit 3 --price 2.75
    stocktrack sell 3
    stocktrack restock 3
    stocktrack delete 3 --yes

    # Follow the home screen as other commands change the data
    stocktrack watch

DATABASE:
    --database, or $STOCKTRACK_DATABASE_URL, or {data_dir}/stocktrack/inventory.db.
    Accepts a sqlite: URL or a plain file path.

LOGGING:
    RUST_LOG sets the filter (default: info). STOCKTRACK_LOG_FORMAT=json
    writes JSON lines. Logs go to stderr.
"#)]
struct Cli {
    /// SQLite database URL or file path
    #[arg(long, global = true, value_name = "URL", env = DATABASE_URL_ENV)]
    database: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    stocktrack_observability::init();

    let cli = Cli::parse();
    let config = store_config(cli.database.as_deref())?;
    let dao = Arc::new(
        SqliteItemDao::connect(&config)
            .await
            .with_context(|| format!("failed to open database {}", config.database_url))?,
    );

    commands::run(cli.command, dao, &mut std::io::stdout().lock()).await
}

/// `--database` / `$STOCKTRACK_DATABASE_URL` if given, else the per-user default.
fn store_config(database: Option<&str>) -> Result<StoreConfig> {
    match database.map(str::trim).filter(|value| !value.is_empty()) {
        Some(url) if url.starts_with("sqlite:") => Ok(StoreConfig::new(url)),
        Some(path) => Ok(StoreConfig::for_path(Path::new(path))),
        None => StoreConfig::default_location().context("failed to resolve database location"),
    }
}
