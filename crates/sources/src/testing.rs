//! In-memory stores for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use storage::models::{
    Federation, IwfDetailedResult, IwfRawResult, LifterMetadata, RawResult, UsawDetailedResult,
    UsawLifterDetail, UsawRawResult, parse_result_date,
};

use crate::snapshot::encode_snapshot;
use crate::traits::{LiveResultStore, SnapshotStore};
use crate::{Result, SourceError};

pub fn usaw_row(result_id: i64, lifter_id: i64, date: &str) -> UsawRawResult {
    UsawRawResult {
        result_id: Some(result_id),
        lifter_id: Some(lifter_id),
        lifter_name: Some(format!("Lifter {}", lifter_id)),
        gender: Some("F".to_string()),
        date: Some(date.to_string()),
        total: 100.0 + result_id as f64,
        ..Default::default()
    }
}

#[derive(Default)]
pub struct FakeSnapshotStore {
    documents: HashMap<(Federation, i32), Vec<u8>>,
    delays: HashMap<i32, Duration>,
    pub calls: AtomicUsize,
}

impl FakeSnapshotStore {
    /// USAW documents are stored gzip compressed.
    pub fn with_usaw(mut self, year: i32, rows: Vec<UsawRawResult>) -> Self {
        let json = serde_json::to_vec(&rows).unwrap();
        self.documents
            .insert((Federation::Usaw, year), encode_snapshot(&json).unwrap());
        self
    }

    /// IWF documents are stored as plain JSON.
    pub fn with_iwf(mut self, year: i32, rows: Vec<IwfRawResult>) -> Self {
        let json = serde_json::to_vec(&rows).unwrap();
        self.documents.insert((Federation::Iwf, year), json);
        self
    }

    pub fn with_delay(mut self, year: i32, delay: Duration) -> Self {
        self.delays.insert(year, delay);
        self
    }
}

#[async_trait::async_trait]
impl SnapshotStore for FakeSnapshotStore {
    async fn fetch_snapshot(&self, federation: Federation, year: i32) -> Result<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delays.get(&year) {
            tokio::time::sleep(*delay).await;
        }
        self.documents
            .get(&(federation, year))
            .cloned()
            .ok_or_else(|| SourceError::snapshot_unavailable(federation, year, "not found"))
    }
}

#[derive(Default)]
pub struct FakeLiveStore {
    pub usaw: Vec<UsawRawResult>,
    pub iwf: Vec<IwfRawResult>,
    pub lifters: Vec<LifterMetadata>,
    pub usaw_details: Vec<UsawDetailedResult>,
    pub usaw_lifter_details: Vec<UsawLifterDetail>,
    pub iwf_details: Vec<IwfDetailedResult>,
    pub fail_results: bool,
    pub fail_lifters: bool,
    pub fail_usaw_details: bool,
    pub fail_lifter_details: bool,
    pub fail_iwf_details: bool,
    pub page_calls: AtomicUsize,
    pub lifter_calls: AtomicUsize,
    pub largest_lifter_batch: Mutex<usize>,
    pub detail_calls: AtomicUsize,
}

fn in_range(date: &Option<String>, start: NaiveDate, end: NaiveDate) -> bool {
    date.as_deref()
        .and_then(parse_result_date)
        .is_some_and(|d| d >= start && d <= end)
}

fn failure(what: &str) -> SourceError {
    SourceError::LiveQuery(format!("{} unavailable", what))
}

#[async_trait::async_trait]
impl LiveResultStore for FakeLiveStore {
    async fn results_page(
        &self,
        federation: Federation,
        start: NaiveDate,
        end: NaiveDate,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<RawResult>> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_results {
            return Err(failure("results"));
        }

        let matching: Vec<RawResult> = match federation {
            Federation::Usaw => self
                .usaw
                .iter()
                .filter(|row| in_range(&row.date, start, end))
                .cloned()
                .map(RawResult::Usaw)
                .collect(),
            Federation::Iwf => self
                .iwf
                .iter()
                .filter(|row| in_range(&row.date, start, end))
                .cloned()
                .map(RawResult::Iwf)
                .collect(),
        };

        Ok(matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn lifters(&self, lifter_ids: &[i64]) -> Result<Vec<LifterMetadata>> {
        self.lifter_calls.fetch_add(1, Ordering::SeqCst);
        {
            let mut largest = self.largest_lifter_batch.lock().unwrap();
            *largest = (*largest).max(lifter_ids.len());
        }
        if self.fail_lifters {
            return Err(failure("lifters"));
        }
        Ok(self
            .lifters
            .iter()
            .filter(|l| lifter_ids.contains(&l.lifter_id))
            .cloned()
            .collect())
    }

    async fn usaw_details(&self, result_ids: &[i64]) -> Result<Vec<UsawDetailedResult>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_usaw_details {
            return Err(failure("usaw details"));
        }
        Ok(self
            .usaw_details
            .iter()
            .filter(|d| result_ids.contains(&d.result_id))
            .cloned()
            .collect())
    }

    async fn usaw_lifter_details(&self, lifter_ids: &[i64]) -> Result<Vec<UsawLifterDetail>> {
        if self.fail_lifter_details {
            return Err(failure("lifter details"));
        }
        Ok(self
            .usaw_lifter_details
            .iter()
            .filter(|d| lifter_ids.contains(&d.lifter_id))
            .cloned()
            .collect())
    }

    async fn iwf_details(&self, result_ids: &[i64]) -> Result<Vec<IwfDetailedResult>> {
        if self.fail_iwf_details {
            return Err(failure("iwf details"));
        }
        Ok(self
            .iwf_details
            .iter()
            .filter(|d| result_ids.contains(&d.db_result_id))
            .cloned()
            .collect())
    }
}
