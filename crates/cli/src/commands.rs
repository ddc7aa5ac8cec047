//! Subcommands and their execution against an open store.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Subcommand, ValueEnum};

use stocktrack_app::{
    HomeViewModel, ItemDetailsViewModel, ItemEditViewModel, ItemEntryViewModel, ItemsRepository,
};
use stocktrack_core::ItemId;
use stocktrack_inventory::{Item, ItemDetails, format_date};
use stocktrack_store::SqliteItemDao;

use crate::render::{self, HomeSnapshot};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List items with this month's and this year's stock value
    List {
        /// Case-insensitive filter on name, price, or expiry date
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show one item
    Show {
        id: ItemId,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Add a new item
    Add {
        #[arg(long)]
        name: String,

        /// Unit price, e.g. 2.50 or $1,234.50
        #[arg(long)]
        price: String,

        #[arg(long)]
        quantity: String,

        #[arg(long, value_name = "MM/DD/YYYY")]
        expires: String,
    },

    /// Change fields of an existing item
    Edit {
        id: ItemId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        quantity: Option<String>,

        #[arg(long, value_name = "MM/DD/YYYY")]
        expires: Option<String>,
    },

    /// Sell one unit
    Sell { id: ItemId },

    /// Receive one unit of stock
    Restock { id: ItemId },

    /// Delete an item
    Delete {
        id: ItemId,

        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Re-render the home screen whenever the data changes
    Watch {
        #[arg(short, long, value_name = "TEXT")]
        search: Option<String>,

        /// How often to check for writes from other processes
        #[arg(long, default_value = "500", value_name = "MS")]
        poll_ms: u64,

        /// Stop after this many renders
        #[arg(long, value_name = "N")]
        count: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub async fn run<W: Write>(command: Command, dao: Arc<SqliteItemDao>, out: &mut W) -> Result<()> {
    let repository = ItemsRepository::new(dao.clone());

    match command {
        Command::List { search, format } => {
            let home = open_home(&repository, search).await?;
            let snapshot = HomeSnapshot::capture(&home);
            match format {
                OutputFormat::Text => writeln!(out, "{}", render::home_text(&snapshot))?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&snapshot)?)?,
            }
        }
        Command::Show { id, format } => {
            let item = load(&repository, id).await?;
            match format {
                OutputFormat::Text => writeln!(out, "{}", render::details_text(&item))?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&item)?)?,
            }
        }
        Command::Add {
            name,
            price,
            quantity,
            expires,
        } => {
            let mut entry = ItemEntryViewModel::new(repository);
            entry.update_ui_state(ItemDetails {
                id: None,
                name,
                price,
                quantity,
                date_expire: expires,
            });
            let stored = entry.save_item().await.context("failed to add item")?;
            writeln!(out, "{}", render::details_text(&stored))?;
        }
        Command::Edit {
            id,
            name,
            price,
            quantity,
            expires,
        } => {
            let mut edit = ItemEditViewModel::new(repository, id)
                .await
                .with_context(|| format!("failed to load item {id}"))?;
            let mut details = edit.ui_state().item_details.clone();
            if let Some(name) = name {
                details.name = name;
            }
            if let Some(price) = price {
                details.price = price;
            }
            if let Some(quantity) = quantity {
                details.quantity = quantity;
            }
            if let Some(expires) = expires {
                details.date_expire = expires;
            }
            edit.update_ui_state(details);
            let updated = edit.update_item().await.context("failed to update item")?;
            writeln!(out, "{}", render::details_text(&updated))?;
        }
        Command::Sell { id } => {
            let details = open_details(&repository, id).await?;
            if details.reduce_quantity_by_one().await? {
                writeln!(out, "{}", render::details_text(&load(&repository, id).await?))?;
            } else {
                writeln!(out, "Item {id} is out of stock; nothing sold.")?;
            }
        }
        Command::Restock { id } => {
            let details = open_details(&repository, id).await?;
            details.add_quantity_by_one().await?;
            writeln!(out, "{}", render::details_text(&load(&repository, id).await?))?;
        }
        Command::Delete { id, yes } => {
            let details = open_details(&repository, id).await?;
            if !yes {
                bail!("refusing to delete item {id} without --yes");
            }
            details.delete_item().await?;
            writeln!(out, "Deleted item {id}.")?;
        }
        Command::Watch {
            search,
            poll_ms,
            count,
        } => {
            let _watcher = match dao.watch_external_writes(Duration::from_millis(poll_ms)).await {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    tracing::warn!("not watching for writes from other processes: {err}");
                    None
                }
            };

            let mut home = open_home(&repository, search).await?;
            let frames = watch(&mut home, out, count, interrupted()).await?;
            tracing::debug!(frames, "watch finished");
        }
    }

    Ok(())
}

/// Render `home`, then again after every change, until `count` renders, the
/// store shuts down, or `shutdown` resolves. Returns the number of renders.
pub async fn watch<W, S>(
    home: &mut HomeViewModel,
    out: &mut W,
    count: Option<usize>,
    shutdown: S,
) -> Result<usize>
where
    W: Write,
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut frames = 0;

    loop {
        writeln!(out, "--- {} ---", format_date(&Local::now()))?;
        writeln!(out, "{}\n", render::home_text(&HomeSnapshot::capture(home)))?;
        out.flush()?;
        frames += 1;

        if count.is_some_and(|limit| frames >= limit) {
            break;
        }

        tokio::select! {
            alive = home.changed() => {
                if !alive {
                    tracing::info!("item store closed; stopping watch");
                    break;
                }
            }
            _ = &mut shutdown => break,
        }
    }

    Ok(frames)
}

/// Resolves on Ctrl-C; never, if the handler cannot be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}

async fn open_home(repository: &ItemsRepository, search: Option<String>) -> Result<HomeViewModel> {
    let mut home = HomeViewModel::new(repository)
        .await
        .context("failed to load items")?;
    if let Some(query) = search {
        home.on_search_query_changed(query);
    }
    Ok(home)
}

async fn load(repository: &ItemsRepository, id: ItemId) -> Result<Item> {
    repository
        .get_item(id)
        .await
        .with_context(|| format!("failed to read item {id}"))?
        .with_context(|| format!("no item with id {id}"))
}

async fn open_details(repository: &ItemsRepository, id: ItemId) -> Result<ItemDetailsViewModel> {
    let details = ItemDetailsViewModel::new(repository.clone(), id)
        .await
        .with_context(|| format!("failed to read item {id}"))?;
    if details.ui_state().item.is_none() {
        bail!("no item with id {id}");
    }
    Ok(details)
}
