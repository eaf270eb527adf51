use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use storage::models::ResultBatch;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::Result;
use crate::adapter::ResultSourceAdapter;

struct Held {
    ticket: u64,
    batch: Arc<ResultBatch>,
}

/// Outcome of one fetch cycle.
#[derive(Debug, Clone)]
pub struct Refresh {
    pub batch: Arc<ResultBatch>,
    /// False when a newer cycle was started before this one finished. The
    /// batch is still returned to the caller but is not held.
    pub applied: bool,
}

/// Holds the batch produced by the most recently started fetch cycle.
///
/// Every cycle takes a ticket from a monotonically increasing counter and
/// only replaces the held batch if no newer ticket was issued meanwhile,
/// so a slow, stale response can never overwrite a newer one.
pub struct ResultsSession {
    adapter: ResultSourceAdapter,
    issued: AtomicU64,
    held: RwLock<Option<Held>>,
}

impl ResultsSession {
    pub fn new(adapter: ResultSourceAdapter) -> Self {
        Self {
            adapter,
            issued: AtomicU64::new(0),
            held: RwLock::new(None),
        }
    }

    pub fn adapter(&self) -> &ResultSourceAdapter {
        &self.adapter
    }

    pub async fn current(&self) -> Option<Arc<ResultBatch>> {
        self.held.read().await.as_ref().map(|held| held.batch.clone())
    }

    /// Fetch a fresh batch for `years`.
    pub async fn refresh(&self, years: &[i32]) -> Result<Refresh> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("Fetch cycle {} started for {:?}", ticket, years);

        let batch = Arc::new(self.adapter.fetch_batch(years).await?);

        let mut held = self.held.write().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if ticket != latest {
            warn!(
                "Fetch cycle {} finished after cycle {} started, dropping its results",
                ticket, latest
            );
            return Ok(Refresh {
                batch,
                applied: false,
            });
        }

        *held = Some(Held {
            ticket,
            batch: batch.clone(),
        });
        debug!("Fetch cycle {} applied ({} results)", ticket, batch.len());

        Ok(Refresh {
            batch,
            applied: true,
        })
    }

    /// The held batch when it already covers exactly `years`, otherwise a
    /// fresh one.
    pub async fn batch_for(&self, years: &[i32]) -> Result<Arc<ResultBatch>> {
        let mut wanted = years.to_vec();
        wanted.sort_unstable();
        wanted.dedup();

        if let Some(held) = self.held.read().await.as_ref()
            && held.batch.years == wanted
        {
            debug!("Reusing batch from cycle {}", held.ticket);
            return Ok(held.batch.clone());
        }

        Ok(self.refresh(&wanted).await?.batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeSnapshotStore, usaw_row};
    use std::time::Duration;

    fn session(snapshots: FakeSnapshotStore) -> ResultsSession {
        ResultsSession::new(ResultSourceAdapter::new(Arc::new(snapshots), None))
    }

    #[tokio::test]
    async fn test_refresh_holds_latest_batch() {
        let session = session(
            FakeSnapshotStore::default()
                .with_usaw(2024, vec![usaw_row(1, 1, "2024-01-01")])
                .with_iwf(2024, vec![]),
        );
        assert!(session.current().await.is_none());

        let refresh = session.refresh(&[2024]).await.unwrap();
        assert!(refresh.applied);
        assert_eq!(session.current().await.unwrap().usaw.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_cycle_does_not_overwrite_newer_one() {
        let session = session(
            FakeSnapshotStore::default()
                .with_usaw(2020, vec![usaw_row(1, 1, "2020-01-01")])
                .with_iwf(2020, vec![])
                .with_delay(2020, Duration::from_millis(200))
                .with_usaw(2024, vec![usaw_row(2, 2, "2024-01-01")])
                .with_iwf(2024, vec![]),
        );

        let slow = session.refresh(&[2020]);
        let fast = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            session.refresh(&[2024]).await
        };
        let (slow, fast) = tokio::join!(slow, fast);

        assert!(!slow.unwrap().applied);
        assert!(fast.unwrap().applied);
        assert_eq!(session.current().await.unwrap().years, vec![2024]);
    }

    #[tokio::test]
    async fn test_batch_for_reuses_matching_years() {
        let snapshots = Arc::new(
            FakeSnapshotStore::default()
                .with_usaw(2024, vec![])
                .with_iwf(2024, vec![]),
        );
        let session = ResultsSession::new(ResultSourceAdapter::new(snapshots.clone(), None));

        session.batch_for(&[2024]).await.unwrap();
        session.batch_for(&[2024, 2024]).await.unwrap();

        // one USAW and one IWF snapshot request
        assert_eq!(snapshots.calls.load(Ordering::SeqCst), 2);
    }
}
