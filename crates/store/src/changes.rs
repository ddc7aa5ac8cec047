//! Change notifications for live queries.

use tokio::sync::broadcast;

use stocktrack_core::ItemId;

const CHANNEL_CAPACITY: usize = 64;

/// What happened to the `items` table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ItemChange {
    Inserted(ItemId),
    Updated(ItemId),
    Deleted(ItemId),
    /// Another connection committed; which rows changed is unknown.
    External,
}

impl ItemChange {
    pub fn item_id(&self) -> Option<ItemId> {
        match self {
            ItemChange::Inserted(id) | ItemChange::Updated(id) | ItemChange::Deleted(id) => {
                Some(*id)
            }
            ItemChange::External => None,
        }
    }
}

/// Broadcast fan-out of [`ItemChange`]s.
///
/// - Best-effort: publishing with no subscribers is not an error
/// - Slow subscribers observe `Lagged` and are expected to re-query
#[derive(Debug, Clone)]
pub struct ChangeBus {
    sender: broadcast::Sender<ItemChange>,
}

impl ChangeBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, change: ItemChange) {
        let receivers = self.sender.send(change).unwrap_or(0);
        tracing::trace!(?change, receivers, "published item change");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ItemChange> {
        self.sender.subscribe()
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_published_changes() {
        let bus = ChangeBus::new();
        let mut rx = bus.subscribe();

        bus.publish(ItemChange::Inserted(ItemId::from_raw(1)));
        bus.publish(ItemChange::Deleted(ItemId::from_raw(1)));

        assert_eq!(rx.recv().await.unwrap(), ItemChange::Inserted(ItemId::from_raw(1)));
        assert_eq!(rx.recv().await.unwrap().item_id(), Some(ItemId::from_raw(1)));
    }

    #[test]
    fn external_changes_carry_no_id() {
        assert_eq!(ItemChange::External.item_id(), None);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = ChangeBus::new();
        bus.publish(ItemChange::Updated(ItemId::from_raw(7)));
    }
}
