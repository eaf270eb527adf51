use chrono::NaiveDate;
use storage::models::{
    Federation, IwfDetailedResult, LifterMetadata, RawResult, UsawDetailedResult,
    UsawLifterDetail,
};

use crate::Result;

/// Pre-built per-year result documents.
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// The snapshot document for one federation and year. The bytes may
    /// or may not still be gzip compressed. Any failure is reported as
    /// [`crate::SourceError::SnapshotUnavailable`].
    async fn fetch_snapshot(&self, federation: Federation, year: i32) -> Result<Vec<u8>>;
}

/// The results database, queried page by page.
#[async_trait::async_trait]
pub trait LiveResultStore: Send + Sync {
    /// Results dated within `[start, end]`, at most `limit` rows starting
    /// at `offset`.
    async fn results_page(
        &self,
        federation: Federation,
        start: NaiveDate,
        end: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<RawResult>>;

    async fn lifters(&self, lifter_ids: &[i64]) -> Result<Vec<LifterMetadata>>;

    async fn usaw_details(&self, result_ids: &[i64]) -> Result<Vec<UsawDetailedResult>>;

    async fn usaw_lifter_details(&self, lifter_ids: &[i64]) -> Result<Vec<UsawLifterDetail>>;

    async fn iwf_details(&self, result_ids: &[i64]) -> Result<Vec<IwfDetailedResult>>;
}
