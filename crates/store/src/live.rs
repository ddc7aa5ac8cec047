//! Live query results.
//!
//! A [`LiveQuery`] holds the latest result of a query and a background task
//! that re-runs the query whenever the store publishes an [`ItemChange`]. The
//! task exits once every receiver (every clone of the `LiveQuery`) is dropped,
//! or once the store itself is dropped. The task does not keep the store alive.
//!
//! Unchanged results are not re-emitted. A failed refresh is logged and the
//! previous value is kept.
//!
//! All constructors spawn onto the current tokio runtime and must be called
//! from within one.
//!
//! [`ItemChange`]: crate::changes::ItemChange

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;

use crate::dao::ItemDao;
use crate::error::StoreResult;

#[derive(Debug)]
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
}

impl<T> Clone for LiveQuery<T> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
        }
    }
}

impl<T> LiveQuery<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Run `query` once for the initial value, then again after every change.
    ///
    /// The change subscription is taken before the initial query so a write
    /// racing with it still triggers a refresh.
    pub async fn spawn<Q>(dao: Arc<dyn ItemDao>, label: &'static str, query: Q) -> StoreResult<Self>
    where
        Q: Fn(Arc<dyn ItemDao>) -> BoxFuture<'static, StoreResult<T>> + Send + Sync + 'static,
    {
        let mut changes = dao.subscribe();
        let initial = query(dao.clone()).await?;
        let (tx, rx) = watch::channel(initial);
        let store = Arc::downgrade(&dao);
        drop(dao);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    change = changes.recv() => match change {
                        Ok(change) => {
                            tracing::trace!(query = label, id = ?change.item_id(), "refreshing after change");
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::debug!(query = label, skipped, "change subscriber lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                }

                let Some(dao) = store.upgrade() else { break };
                match query(dao).await {
                    Ok(value) => {
                        let emitted = publish_if_changed(&tx, value);
                        tracing::debug!(query = label, emitted, "refreshed live query");
                    }
                    Err(err) => {
                        tracing::error!(query = label, "failed to refresh live query: {err}");
                    }
                }
            }
            tracing::debug!(query = label, "live query closed");
        });

        Ok(Self { rx })
    }

    /// Current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait for the next emitted value. Returns `false` once the producer is gone.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the current value satisfies `predicate`.
    pub async fn wait_for<F>(&mut self, predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        self.rx.wait_for(predicate).await.ok().map(|v| v.clone())
    }

    /// Derived stream: `f` applied to every value.
    pub fn map<U, F>(self, mut f: F) -> LiveQuery<U>
    where
        U: Clone + PartialEq + Send + Sync + 'static,
        F: FnMut(&T) -> U + Send + 'static,
    {
        let first = f(&self.rx.borrow());
        self.filter_map(first, move |value| Some(f(value)))
    }

    /// Derived stream that skips values for which `f` returns `None`, keeping
    /// the last accepted one (`initial` until the first acceptance).
    pub fn filter_map<U, F>(self, initial: U, mut f: F) -> LiveQuery<U>
    where
        U: Clone + PartialEq + Send + Sync + 'static,
        F: FnMut(&T) -> Option<U> + Send + 'static,
    {
        let mut source = self.rx;
        let first = f(&source.borrow_and_update()).unwrap_or(initial);
        let (tx, rx) = watch::channel(first);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    changed = source.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }

                let next = f(&source.borrow_and_update());
                if let Some(value) = next {
                    publish_if_changed(&tx, value);
                }
            }
        });

        LiveQuery { rx }
    }
}

fn publish_if_changed<T: PartialEq>(tx: &watch::Sender<T>, value: T) -> bool {
    tx.send_if_modified(|current| {
        if *current == value {
            false
        } else {
            *current = value;
            true
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::{DateTime, Local, TimeZone};
    use futures::FutureExt;
    use stocktrack_inventory::NewItem;

    use crate::error::StoreError;
    use crate::memory::InMemoryItemDao;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn new_item(name: &str) -> NewItem {
        NewItem {
            name: name.to_string(),
            price: 1.0,
            quantity: 1,
            date_added: at(2026, 1, 1),
            date_updated: at(2026, 1, 1),
            date_expire: at(2026, 7, 1),
        }
    }

    async fn count_query(dao: Arc<dyn ItemDao>) -> LiveQuery<usize> {
        LiveQuery::spawn(dao, "count", |dao| {
            async move { Ok::<_, StoreError>(dao.get_all_items().await?.len()) }.boxed()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn re_emits_after_writes() {
        let dao: Arc<dyn ItemDao> = Arc::new(InMemoryItemDao::new());
        let mut live = count_query(dao.clone()).await;
        assert_eq!(live.get(), 0);

        dao.insert(new_item("Pen")).await.unwrap();
        let seen = tokio::time::timeout(Duration::from_secs(2), live.wait_for(|n| *n == 1))
            .await
            .unwrap();
        assert_eq!(seen, Some(1));
    }

    #[tokio::test]
    async fn derived_streams_follow_their_source() {
        let dao: Arc<dyn ItemDao> = Arc::new(InMemoryItemDao::new());
        let live = count_query(dao.clone()).await;
        let mut labels = live.map(|n| format!("{n} items"));
        assert_eq!(labels.get(), "0 items");

        dao.insert(new_item("Pen")).await.unwrap();
        dao.insert(new_item("Game")).await.unwrap();
        let seen = tokio::time::timeout(
            Duration::from_secs(2),
            labels.wait_for(|s| s == "2 items"),
        )
        .await
        .unwrap();
        assert_eq!(seen.as_deref(), Some("2 items"));
    }

    #[tokio::test]
    async fn filter_map_keeps_last_accepted_value() {
        let dao: Arc<dyn ItemDao> = Arc::new(InMemoryItemDao::new());
        let stored = dao.insert(new_item("Pen")).await.unwrap();
        let id = stored.id;

        let item = LiveQuery::spawn(dao.clone(), "item", move |dao| {
            async move { dao.get_item(id).await }.boxed()
        })
        .await
        .unwrap();
        let mut names = item.filter_map(String::new(), |item| item.as_ref().map(|i| i.name.clone()));
        assert_eq!(names.get(), "Pen");

        let mut renamed = stored.clone();
        renamed.name = "Marker".to_string();
        dao.update(&renamed).await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), names.wait_for(|n| n == "Marker"))
            .await
            .unwrap();

        dao.delete(&renamed).await.unwrap();
        dao.insert(new_item("Other")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(names.get(), "Marker");
    }

    #[tokio::test]
    async fn closes_when_store_is_dropped() {
        let dao: Arc<dyn ItemDao> = Arc::new(InMemoryItemDao::new());
        let mut live = count_query(dao.clone()).await;
        drop(dao);

        let alive = tokio::time::timeout(Duration::from_secs(2), live.changed())
            .await
            .unwrap();
        assert!(!alive);
    }
}
