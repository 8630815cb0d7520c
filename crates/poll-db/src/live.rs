//! Background loops behind `PollDb` subscriptions.
//!
//! Each loop emits an initial snapshot, then waits for either an in-process
//! change notification or the revision check tick. A new snapshot is sent
//! only when the persisted revision differs from the last one sent, so
//! writes from other processes are noticed within one tick and duplicate
//! wake-ups are free.

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::{Interval, MissedTickBehavior};

use crate::store::{CollectionSnapshot, DocumentSnapshot, DocumentStore};
use crate::subscription::Subscription;
use crate::{PollDb, StoreChange};

async fn next_wake(
    changes: &mut broadcast::Receiver<StoreChange>,
    ticker: &mut Interval,
    matches: impl Fn(&StoreChange) -> bool,
) {
    loop {
        tokio::select! {
            received = changes.recv() => match received {
                Ok(change) if matches(&change) => return,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "change feed lagged; re-reading");
                    return;
                }
                // The sender lives as long as the store; fall back to ticks.
                Err(RecvError::Closed) => {
                    ticker.tick().await;
                    return;
                }
            },
            _ = ticker.tick() => return,
        }
    }
}

fn ticker(db: &PollDb) -> Interval {
    let mut ticker = tokio::time::interval(db.poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

pub(crate) fn watch_document(db: PollDb, path: String) -> Subscription<DocumentSnapshot> {
    let mut changes = db.changes();
    Subscription::spawn(move |tx| async move {
        let mut ticker = ticker(&db);
        let mut last_sent: Option<Option<i64>> = None;
        loop {
            let snapshot = match db.document_revision(&path).await {
                Ok(revision) if last_sent == Some(revision) => None,
                Ok(revision) => {
                    last_sent = Some(revision);
                    Some(db.get_document(&path).await)
                }
                Err(err) => Some(Err(err)),
            };
            if let Some(snapshot) = snapshot {
                if tx.send(snapshot).await.is_err() {
                    return;
                }
            }
            next_wake(&mut changes, &mut ticker, |change| is_document(change, &path)).await;
        }
    })
}

pub(crate) fn watch_collection(db: PollDb, collection: String) -> Subscription<CollectionSnapshot> {
    let mut changes = db.changes();
    Subscription::spawn(move |tx| async move {
        let mut ticker = ticker(&db);
        let mut last_sent: Option<Option<i64>> = None;
        loop {
            let snapshot = match db.collection_revision(&collection).await {
                Ok(revision) if last_sent == Some(revision) => None,
                Ok(revision) => {
                    last_sent = Some(revision);
                    Some(db.list_collection(&collection).await)
                }
                Err(err) => Some(Err(err)),
            };
            if let Some(snapshot) = snapshot {
                if tx.send(snapshot).await.is_err() {
                    return;
                }
            }
            next_wake(&mut changes, &mut ticker, |change| change.collection == collection).await;
        }
    })
}

fn is_document(change: &StoreChange, path: &str) -> bool {
    path.strip_prefix(change.collection.as_str())
        .and_then(|rest| rest.strip_prefix('/'))
        .is_some_and(|id| id == change.id)
}
