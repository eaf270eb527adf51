use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use futures::future::join_all;
use storage::models::{AthleteResult, Federation, LifterMetadata, RawResult, ResultBatch};
use tracing::{info, warn};

use crate::live::{fetch_all_pages, year_bounds};
use crate::snapshot::load_snapshot;
use crate::traits::{LiveResultStore, SnapshotStore};
use crate::transformer::ResultTransformer;
use crate::{Result, SourceError};

/// Upper bound on lifter ids per metadata lookup.
pub const LIFTER_BATCH_SIZE: usize = 900;

/// Produces normalised results for a federation and a set of years,
/// preferring snapshots and falling back to the live database.
#[derive(Clone)]
pub struct ResultSourceAdapter {
    snapshots: Arc<dyn SnapshotStore>,
    live: Option<Arc<dyn LiveResultStore>>,
}

impl ResultSourceAdapter {
    pub fn new(snapshots: Arc<dyn SnapshotStore>, live: Option<Arc<dyn LiveResultStore>>) -> Self {
        Self { snapshots, live }
    }

    pub fn live(&self) -> Option<&dyn LiveResultStore> {
        self.live.as_deref()
    }

    /// Results for both federations, fetched concurrently.
    pub async fn fetch_batch(&self, years: &[i32]) -> Result<ResultBatch> {
        let (usaw, iwf) = tokio::join!(
            self.fetch_federation_results(Federation::Usaw, years),
            self.fetch_federation_results(Federation::Iwf, years),
        );
        Ok(ResultBatch::new(years.to_vec(), usaw?, iwf?))
    }

    pub async fn fetch_federation_results(
        &self,
        federation: Federation,
        years: &[i32],
    ) -> Result<Vec<AthleteResult>> {
        let requested: BTreeSet<i32> = years.iter().copied().collect();
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let coverage = federation.snapshot_years();
        let covered: Vec<i32> = requested
            .iter()
            .copied()
            .filter(|year| coverage.contains(year))
            .collect();

        if covered.is_empty() {
            info!(
                "{}: no snapshots cover {:?}, querying the database",
                federation.label(),
                requested
            );
            return self.fetch_live(federation, &requested).await;
        }

        match self.fetch_snapshots(federation, &covered).await {
            Ok(rows) => {
                info!(
                    "{}: loaded {} results from snapshots",
                    federation.label(),
                    rows.len()
                );
                Ok(ResultTransformer::new(&HashMap::new()).transform(rows))
            }
            Err(err) => {
                warn!(
                    "{}: snapshot load failed, falling back to the database: {}",
                    federation.label(),
                    err
                );
                self.fetch_live(federation, &requested).await
            }
        }
    }

    /// All covered years are requested at once. One failure fails the lot.
    async fn fetch_snapshots(&self, federation: Federation, years: &[i32]) -> Result<Vec<RawResult>> {
        let loads = years
            .iter()
            .map(|&year| load_snapshot(self.snapshots.as_ref(), federation, year));
        let documents = join_all(loads).await;

        let mut rows = Vec::new();
        for (year, document) in years.iter().zip(documents) {
            let document = document?;
            info!(
                "Loaded {} {} results for {}",
                document.len(),
                federation.label(),
                year
            );
            rows.extend(document);
        }
        Ok(rows)
    }

    async fn fetch_live(
        &self,
        federation: Federation,
        years: &BTreeSet<i32>,
    ) -> Result<Vec<AthleteResult>> {
        let live = self.live.as_deref().ok_or_else(|| {
            SourceError::LiveQuery(format!(
                "{} results need the database but none is configured",
                federation.label()
            ))
        })?;

        let (Some(&first), Some(&last)) = (years.first(), years.last()) else {
            return Ok(Vec::new());
        };
        let (start, end) = year_bounds(first, last)?;

        let rows = fetch_all_pages(live, federation, start, end).await?;
        info!(
            "{}: fetched {} results from the database",
            federation.label(),
            rows.len()
        );

        let lifters = match federation {
            Federation::Usaw => lookup_lifters(live, &rows).await,
            Federation::Iwf => HashMap::new(),
        };

        let results = ResultTransformer::new(&lifters)
            .transform(rows)
            .into_iter()
            .filter(|r| years.contains(&r.competition_year))
            .collect();
        Ok(results)
    }
}

/// Lifter metadata for every distinct lifter in `rows`. A failed batch is
/// logged and skipped; those lifters keep the fields on their result rows.
async fn lookup_lifters(
    live: &dyn LiveResultStore,
    rows: &[RawResult],
) -> HashMap<i64, LifterMetadata> {
    let ids: Vec<i64> = rows
        .iter()
        .filter_map(RawResult::lifter_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut lifters = HashMap::with_capacity(ids.len());
    for batch in ids.chunks(LIFTER_BATCH_SIZE) {
        match live.lifters(batch).await {
            Ok(found) => {
                lifters.extend(found.into_iter().map(|lifter| (lifter.lifter_id, lifter)));
            }
            Err(err) => {
                warn!(
                    "Lifter lookup failed for {} ids, keeping result row fields: {}",
                    batch.len(),
                    err
                );
            }
        }
    }
    lifters
}
