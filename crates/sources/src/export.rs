use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use storage::models::{AthleteResult, DetailedExportRow, Federation, UsawLifterDetail};
use storage::services::export::{detailed_columns, detailed_file_name, to_csv};
use tracing::{info, warn};

use crate::traits::LiveResultStore;
use crate::{Result, SourceError};

/// Result ids per attempt-detail query.
pub const DETAIL_BATCH_SIZE: usize = 1000;

/// Builds the attempt-level export for an already filtered view by
/// re-reading each result from the database.
pub struct DetailedExporter<'a> {
    live: &'a dyn LiveResultStore,
}

impl<'a> DetailedExporter<'a> {
    pub fn new(live: &'a dyn LiveResultStore) -> Self {
        Self { live }
    }

    /// USAW rows first, then IWF rows.
    pub async fn rows(&self, records: &[AthleteResult]) -> Result<Vec<DetailedExportRow>> {
        let usaw_ids = result_ids(records, Federation::Usaw);
        let iwf_records: Vec<&AthleteResult> = records
            .iter()
            .filter(|r| r.federation() == Federation::Iwf)
            .collect();

        let mut rows = self.usaw_rows(&usaw_ids).await?;
        rows.extend(self.iwf_rows(&iwf_records).await);

        info!("Generated {} rows for export", rows.len());
        Ok(rows)
    }

    async fn usaw_rows(&self, result_ids: &[i64]) -> Result<Vec<DetailedExportRow>> {
        if result_ids.is_empty() {
            return Ok(Vec::new());
        }

        info!("Fetching details for {} USAW results", result_ids.len());
        let mut details = Vec::with_capacity(result_ids.len());
        for batch in result_ids.chunks(DETAIL_BATCH_SIZE) {
            let found = self.live.usaw_details(batch).await.map_err(|err| {
                SourceError::Export(format!("USAW result details: {}", err))
            })?;
            details.extend(found);
        }

        let lifter_ids: Vec<i64> = details
            .iter()
            .filter_map(|d| d.lifter_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut lifters: HashMap<i64, UsawLifterDetail> = HashMap::new();
        for batch in lifter_ids.chunks(DETAIL_BATCH_SIZE) {
            match self.live.usaw_lifter_details(batch).await {
                Ok(found) => lifters.extend(found.into_iter().map(|l| (l.lifter_id, l))),
                Err(err) => warn!("Lifter details unavailable, continuing without them: {}", err),
            }
        }

        Ok(details
            .iter()
            .map(|d| {
                let lifter = d.lifter_id.and_then(|id| lifters.get(&id));
                DetailedExportRow::from_usaw(d, lifter)
            })
            .collect())
    }

    /// Falls back to the in-memory summaries when detail rows cannot be
    /// read.
    async fn iwf_rows(&self, records: &[&AthleteResult]) -> Vec<DetailedExportRow> {
        if records.is_empty() {
            return Vec::new();
        }

        info!("Fetching details for {} IWF results", records.len());
        let ids: Vec<i64> = records
            .iter()
            .map(|r| r.result_id)
            .filter(|id| *id > 0)
            .collect();

        let mut details = Vec::with_capacity(ids.len());
        for batch in ids.chunks(DETAIL_BATCH_SIZE) {
            match self.live.iwf_details(batch).await {
                Ok(found) => details.extend(found),
                Err(err) => {
                    warn!(
                        "IWF details unavailable, exporting summary rows instead: {}",
                        err
                    );
                    return records
                        .iter()
                        .map(|r| DetailedExportRow::from_summary(r))
                        .collect();
                }
            }
        }

        details.iter().map(DetailedExportRow::from_iwf).collect()
    }

    pub async fn to_csv(&self, records: &[AthleteResult]) -> Result<String> {
        let rows = self.rows(records).await?;
        Ok(to_csv(&rows, &detailed_columns())?)
    }

    /// Write the export into `dir` under its dated file name.
    pub async fn write_to(
        &self,
        records: &[AthleteResult],
        dir: &Path,
        date: NaiveDate,
    ) -> Result<PathBuf> {
        let csv = self.to_csv(records).await?;
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(detailed_file_name(date));
        tokio::fs::write(&path, csv).await?;
        info!("Exported to {}", path.display());
        Ok(path)
    }
}

/// Distinct positive result ids of one federation, in view order.
fn result_ids(records: &[AthleteResult], federation: Federation) -> Vec<i64> {
    let mut seen = BTreeSet::new();
    records
        .iter()
        .filter(|r| r.federation() == federation && r.result_id > 0)
        .map(|r| r.result_id)
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeLiveStore;
    use std::sync::atomic::Ordering;
    use storage::models::{Affiliation, IwfDetailedResult, UsawDetailedResult};

    fn usaw_summary(result_id: i64) -> AthleteResult {
        AthleteResult {
            result_id,
            unique_id: format!("usaw-{}-0", result_id),
            ..Default::default()
        }
    }

    fn iwf_summary(result_id: i64) -> AthleteResult {
        AthleteResult {
            result_id,
            unique_id: format!("iwf-{}-0", result_id),
            lifter_name: "Summary Lifter".to_string(),
            best_total: 210.0,
            affiliation: Affiliation::Iwf {
                country_code: Some("CHN".to_string()),
                country_name: Some("China".to_string()),
                iwf_lifter_id: None,
            },
            ..Default::default()
        }
    }

    fn usaw_detail(result_id: i64, lifter_id: i64) -> UsawDetailedResult {
        UsawDetailedResult {
            result_id,
            lifter_id: Some(lifter_id),
            lifter_name: Some(format!("Detail {}", result_id)),
            snatch_lift_1: Some("80".to_string()),
            qpoints: Some("251.12345".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_usaw_rows_join_lifter_details() {
        let live = FakeLiveStore {
            usaw_details: vec![usaw_detail(1, 10), usaw_detail(2, 11)],
            usaw_lifter_details: vec![UsawLifterDetail {
                lifter_id: 10,
                membership_number: Some("555".to_string()),
                state: Some("TX".to_string()),
            }],
            ..Default::default()
        };

        let records = vec![usaw_summary(1), usaw_summary(2), usaw_summary(1)];
        let rows = DetailedExporter::new(&live).rows(&records).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].state, "TX");
        assert_eq!(rows[0].membership_number, "555");
        assert_eq!(rows[0].snatch_1, "80");
        assert_eq!(rows[0].q_points, "251.123");
        assert_eq!(rows[1].state, "");
    }

    #[tokio::test]
    async fn test_usaw_detail_failure_is_fatal() {
        let live = FakeLiveStore {
            fail_usaw_details: true,
            ..Default::default()
        };

        let err = DetailedExporter::new(&live)
            .rows(&[usaw_summary(1)])
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Export(_)));
    }

    #[tokio::test]
    async fn test_lifter_detail_failure_is_tolerated() {
        let live = FakeLiveStore {
            usaw_details: vec![usaw_detail(1, 10)],
            fail_lifter_details: true,
            ..Default::default()
        };

        let rows = DetailedExporter::new(&live)
            .rows(&[usaw_summary(1)])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, "");
    }

    #[tokio::test]
    async fn test_iwf_falls_back_to_summary_rows() {
        let live = FakeLiveStore {
            fail_iwf_details: true,
            ..Default::default()
        };

        let rows = DetailedExporter::new(&live)
            .rows(&[iwf_summary(7)])
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].source, "IWF");
        assert_eq!(rows[0].lifter_name, "Summary Lifter");
        assert_eq!(rows[0].country, "CHN");
        assert_eq!(rows[0].snatch_1, "");
    }

    #[tokio::test]
    async fn test_iwf_detail_rows() {
        let live = FakeLiveStore {
            iwf_details: vec![IwfDetailedResult {
                db_result_id: 7,
                lifter_name: Some("Detail Lifter".to_string()),
                snatch_1: Some("-95".to_string()),
                nation: Some("CHN".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let rows = DetailedExporter::new(&live)
            .rows(&[iwf_summary(7)])
            .await
            .unwrap();
        assert_eq!(rows[0].lifter_name, "Detail Lifter");
        assert_eq!(rows[0].snatch_1, "-95");
        assert_eq!(rows[0].country, "CHN");
    }

    #[tokio::test]
    async fn test_usaw_details_fetched_in_batches() {
        let live = FakeLiveStore::default();
        let records: Vec<AthleteResult> = (1..=2500).map(usaw_summary).collect();

        let rows = DetailedExporter::new(&live).rows(&records).await.unwrap();
        assert!(rows.is_empty());
        assert_eq!(live.detail_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_write_to_uses_dated_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let live = FakeLiveStore {
            usaw_details: vec![usaw_detail(1, 10)],
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();

        let path = DetailedExporter::new(&live)
            .write_to(&[usaw_summary(1)], dir.path(), date)
            .await
            .unwrap();

        assert!(path.ends_with("weightlifting-export-2025-03-04.csv"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("\"Source\","));
        assert!(content.contains("\"Detail 1\""));
    }
}
