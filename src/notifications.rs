use crate::errors::StoreError;
use crate::models::{Notification, NotificationDraft, NotificationStatus, RecordId, datasets};
use crate::storage::Persistence;
use crate::store::{EntityStore, Mutation};
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// The notifications page tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationTab {
    #[default]
    All,
    Unread,
    Urgent,
}

/// Notification list with read-state bookkeeping.
pub struct NotificationCenter {
    store: EntityStore<Notification>,
}

impl NotificationCenter {
    pub fn open(persistence: Persistence) -> Self {
        Self {
            store: EntityStore::open(persistence, datasets::NOTIFICATIONS),
        }
    }

    pub fn list(&self, tab: NotificationTab) -> Vec<Notification> {
        self.store
            .records()
            .iter()
            .filter(|note| match tab {
                NotificationTab::All => true,
                NotificationTab::Unread => note.status == NotificationStatus::Unread,
                NotificationTab::Urgent => note.status == NotificationStatus::Urgent,
            })
            .cloned()
            .collect()
    }

    /// Urgent notifications have not been read either.
    pub fn unread_count(&self) -> usize {
        self.store
            .records()
            .iter()
            .filter(|note| note.status != NotificationStatus::Read)
            .count()
    }

    pub fn receive(&mut self, draft: NotificationDraft) -> Result<Mutation<Notification>, StoreError> {
        self.store.create(draft)
    }

    /// Adopts a freshly fetched list, replacing what was stored.
    pub fn replace_all(&mut self, notifications: Vec<Notification>) -> Result<Mutation<usize>, StoreError> {
        self.store.replace_all(notifications)
    }

    pub fn mark_read(&mut self, id: RecordId) -> Result<Mutation<Notification>, StoreError> {
        self.store.modify(id, |note| note.status = NotificationStatus::Read)
    }

    pub fn mark_all_read(&mut self) -> Mutation<usize> {
        self.store.modify_all(|note| note.status = NotificationStatus::Read)
    }

    pub fn delete(&mut self, id: RecordId) -> Result<Mutation<Notification>, StoreError> {
        self.store.remove(id)
    }
}

pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Where the header badge reads its unread count from.
pub trait NotificationSource: Send + Sync + 'static {
    fn unread_count(&self) -> impl Future<Output = Result<usize, SourceError>> + Send;
}

/// Background task refreshing the unread count on a fixed interval.
/// Dropping the handle stops the task.
pub struct UnreadPoller {
    count: watch::Receiver<usize>,
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl UnreadPoller {
    pub fn spawn<S: NotificationSource>(source: S, every: Duration) -> Self {
        let (count_tx, count) = watch::channel(0);
        let (stop, mut stopped) = oneshot::channel();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => match source.unread_count().await {
                        Ok(unread) => {
                            count_tx.send_replace(unread);
                        }
                        Err(err) => warn!("failed to refresh unread notification count: {err}"),
                    },
                }
            }
            debug!("notification poller stopped");
        });

        Self { count, stop, task }
    }

    /// Most recently fetched count.
    pub fn current(&self) -> usize {
        *self.count.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.count.clone()
    }

    pub async fn stop(self) {
        let _ = self.stop.send(());
        let _ = self.task.await;
    }
}
