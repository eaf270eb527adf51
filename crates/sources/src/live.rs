use chrono::NaiveDate;
use sqlx::PgPool;
use storage::models::{
    Federation, IwfDetailedResult, IwfRawResult, LifterMetadata, RawResult, UsawDetailedResult,
    UsawLifterDetail, UsawRawResult,
};
use storage::repository::ResultsRepository;
use tracing::debug;

use crate::traits::LiveResultStore;
use crate::{Result, SourceError};

/// Rows requested per live query page. A shorter page ends the scan.
pub const RESULTS_PAGE_SIZE: i64 = 1000;

/// January 1st of `first` through December 31st of `last`.
pub fn year_bounds(first: i32, last: i32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(first, 1, 1)
        .ok_or_else(|| SourceError::LiveQuery(format!("year {} is out of range", first)))?;
    let end = NaiveDate::from_ymd_opt(last, 12, 31)
        .ok_or_else(|| SourceError::LiveQuery(format!("year {} is out of range", last)))?;
    Ok((start, end))
}

/// Every result dated within `[start, end]`, fetched one page at a time.
/// Pages are requested strictly in sequence.
pub async fn fetch_all_pages(
    live: &dyn LiveResultStore,
    federation: Federation,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<RawResult>> {
    let mut rows = Vec::new();
    let mut offset = 0;
    let mut pages = 0;

    loop {
        let page = live
            .results_page(federation, start, end, offset, RESULTS_PAGE_SIZE)
            .await
            .map_err(|err| {
                SourceError::LiveQuery(format!(
                    "{} results at offset {}: {}",
                    federation.label(),
                    offset,
                    err
                ))
            })?;

        pages += 1;
        let fetched = page.len();
        debug!(
            "{}: page {} returned {} rows (offset {})",
            federation.label(),
            pages,
            fetched,
            offset
        );
        rows.extend(page);

        if (fetched as i64) < RESULTS_PAGE_SIZE {
            break;
        }
        offset += RESULTS_PAGE_SIZE;
    }

    debug!(
        "{}: fetched {} rows in {} pages",
        federation.label(),
        rows.len(),
        pages
    );
    Ok(rows)
}

/// [`LiveResultStore`] over the Postgres results tables.
#[derive(Clone)]
pub struct PgLiveStore {
    pool: PgPool,
}

impl PgLiveStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> ResultsRepository<'_> {
        ResultsRepository::new(&self.pool)
    }
}

#[async_trait::async_trait]
impl LiveResultStore for PgLiveStore {
    async fn results_page(
        &self,
        federation: Federation,
        start: NaiveDate,
        end: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<RawResult>> {
        let repo = self.repository();
        let rows = match federation {
            Federation::Usaw => repo
                .usaw_results_page(start, end, offset, limit)
                .await?
                .into_iter()
                .map(|row| RawResult::Usaw(UsawRawResult::from(row)))
                .collect(),
            Federation::Iwf => repo
                .iwf_results_page(start, end, offset, limit)
                .await?
                .into_iter()
                .map(|row| RawResult::Iwf(IwfRawResult::from(row)))
                .collect(),
        };
        Ok(rows)
    }

    async fn lifters(&self, lifter_ids: &[i64]) -> Result<Vec<LifterMetadata>> {
        Ok(self.repository().lifters_by_ids(lifter_ids).await?)
    }

    async fn usaw_details(&self, result_ids: &[i64]) -> Result<Vec<UsawDetailedResult>> {
        Ok(self
            .repository()
            .usaw_details_by_result_ids(result_ids)
            .await?)
    }

    async fn usaw_lifter_details(&self, lifter_ids: &[i64]) -> Result<Vec<UsawLifterDetail>> {
        Ok(self.repository().usaw_lifter_details(lifter_ids).await?)
    }

    async fn iwf_details(&self, result_ids: &[i64]) -> Result<Vec<IwfDetailedResult>> {
        Ok(self
            .repository()
            .iwf_details_by_result_ids(result_ids)
            .await?)
    }
}
