use std::io::{Read, Write};
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use storage::models::{Federation, RawResult};
use tracing::{debug, info};

use crate::live::{fetch_all_pages, year_bounds};
use crate::traits::{LiveResultStore, SnapshotStore};
use crate::{Result, SourceError};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Snapshot bytes as JSON. Documents still carrying a gzip header are
/// inflated; anything else is assumed to be decompressed already.
pub fn decode_snapshot(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes.to_vec());
    }

    let mut decoder = GzDecoder::new(bytes);
    let mut json = Vec::new();
    decoder.read_to_end(&mut json)?;
    Ok(json)
}

pub fn encode_snapshot(json: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(json)?;
    encoder.finish()
}

/// Fetch, decompress and parse one snapshot. Every failure along the way
/// counts as the snapshot being unavailable.
pub async fn load_snapshot(
    store: &dyn SnapshotStore,
    federation: Federation,
    year: i32,
) -> Result<Vec<RawResult>> {
    let bytes = store.fetch_snapshot(federation, year).await?;
    let json = decode_snapshot(&bytes)
        .map_err(|err| SourceError::snapshot_unavailable(federation, year, err))?;
    RawResult::parse_snapshot(federation, &json)
        .map_err(|err| SourceError::snapshot_unavailable(federation, year, err))
}

/// Snapshots published over HTTP under a common base URL.
pub struct HttpSnapshotStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSnapshotStore {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rankings/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, federation: Federation, year: i32) -> String {
        format!("{}/{}", self.base_url, federation.snapshot_file_name(year))
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait::async_trait]
impl SnapshotStore for HttpSnapshotStore {
    async fn fetch_snapshot(&self, federation: Federation, year: i32) -> Result<Vec<u8>> {
        let url = self.url(federation, year);
        debug!("Fetching snapshot {}", url);
        self.download(&url)
            .await
            .map_err(|err| SourceError::snapshot_unavailable(federation, year, err))
    }
}

/// Snapshots stored as files in one local directory.
pub struct DirectorySnapshotStore {
    root: PathBuf,
}

impl DirectorySnapshotStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, federation: Federation, year: i32) -> PathBuf {
        self.root.join(federation.snapshot_file_name(year))
    }
}

#[async_trait::async_trait]
impl SnapshotStore for DirectorySnapshotStore {
    async fn fetch_snapshot(&self, federation: Federation, year: i32) -> Result<Vec<u8>> {
        let path = self.path_for(federation, year);
        debug!("Reading snapshot {}", path.display());
        tokio::fs::read(&path)
            .await
            .map_err(|err| SourceError::snapshot_unavailable(federation, year, err))
    }
}

/// Regenerates snapshot files from the live database.
pub struct SnapshotWriter<'a> {
    live: &'a dyn LiveResultStore,
    output_dir: PathBuf,
}

impl<'a> SnapshotWriter<'a> {
    pub fn new(live: &'a dyn LiveResultStore, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            live,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write the snapshot for one year. Years without any results are
    /// skipped and return `None`.
    pub async fn write_year(&self, federation: Federation, year: i32) -> Result<Option<PathBuf>> {
        let (start, end) = year_bounds(year, year)?;
        let rows = fetch_all_pages(self.live, federation, start, end).await?;

        if rows.is_empty() {
            info!("{} {}: no results, skipping", federation.label(), year);
            return Ok(None);
        }

        let json = serde_json::to_vec(&rows)?;
        let compressed = encode_snapshot(&json)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.output_dir.join(federation.snapshot_file_name(year));
        tokio::fs::write(&path, compressed).await?;

        info!(
            "{} {}: wrote {} results to {}",
            federation.label(),
            year,
            rows.len(),
            path.display()
        );
        Ok(Some(path))
    }

    pub async fn write_years(
        &self,
        federation: Federation,
        years: RangeInclusive<i32>,
    ) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for year in years {
            if let Some(path) = self.write_year(federation, year).await? {
                written.push(path);
            }
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::testing::FakeLiveStore;
    use storage::models::UsawRawResult;

    fn usaw(result_id: i64, date: &str) -> UsawRawResult {
        UsawRawResult {
            result_id: Some(result_id),
            lifter_id: Some(result_id * 10),
            lifter_name: Some(format!("Lifter {}", result_id)),
            date: Some(date.to_string()),
            total: 150.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_handles_both_encodings() {
        let json = br#"[{"result_id": 1}]"#;
        let compressed = encode_snapshot(json).unwrap();

        assert_eq!(decode_snapshot(&compressed).unwrap(), json.to_vec());
        assert_eq!(decode_snapshot(json).unwrap(), json.to_vec());
    }

    #[test]
    fn test_truncated_gzip_is_an_error() {
        let compressed = encode_snapshot(b"[]").unwrap();
        assert!(decode_snapshot(&compressed[..6]).is_err());
    }

    #[tokio::test]
    async fn test_directory_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectorySnapshotStore::new(dir.path());

        let err = store.fetch_snapshot(Federation::Usaw, 2024).await.unwrap_err();
        assert!(err.is_snapshot_unavailable());
    }

    #[tokio::test]
    async fn test_load_snapshot_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = DirectorySnapshotStore::new(dir.path());
        std::fs::write(store.path_for(Federation::Iwf, 2001), b"not json").unwrap();

        let err = load_snapshot(&store, Federation::Iwf, 2001).await.unwrap_err();
        assert!(err.is_snapshot_unavailable());
    }

    #[tokio::test]
    async fn test_writer_round_trips_through_directory_store() {
        let dir = tempfile::tempdir().unwrap();
        let live = FakeLiveStore {
            usaw: vec![usaw(1, "2023-05-01"), usaw(2, "2023-11-20"), usaw(3, "2024-02-02")],
            ..Default::default()
        };

        let writer = SnapshotWriter::new(&live, dir.path());
        let written = writer.write_years(Federation::Usaw, 2022..=2023).await.unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("usaw-rankings-2023.json.gz"));

        let store = DirectorySnapshotStore::new(dir.path());
        let rows = load_snapshot(&store, Federation::Usaw, 2023).await.unwrap();
        let ids: Vec<Option<i64>> = rows
            .iter()
            .map(|row| match row {
                RawResult::Usaw(row) => row.result_id,
                RawResult::Iwf(row) => row.db_result_id,
            })
            .collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);

        let missing = store.fetch_snapshot(Federation::Usaw, 2022).await;
        assert!(missing.is_err());
    }

    #[tokio::test]
    async fn test_writer_keeps_membership_number() {
        let dir = tempfile::tempdir().unwrap();
        let live = FakeLiveStore {
            usaw: vec![UsawRawResult {
                membership_number: Some("12345".to_string()),
                ..usaw(7, "2024-03-09")
            }],
            ..Default::default()
        };

        SnapshotWriter::new(&live, dir.path())
            .write_year(Federation::Usaw, 2024)
            .await
            .unwrap();

        let store = DirectorySnapshotStore::new(dir.path());
        let rows = load_snapshot(&store, Federation::Usaw, 2024).await.unwrap();
        match rows.as_slice() {
            [RawResult::Usaw(row)] => {
                assert_eq!(row.membership_number.as_deref(), Some("12345"));
            }
            other => panic!("unexpected snapshot rows: {:?}", other),
        }

        let lifters = HashMap::new();
        let results = crate::transformer::ResultTransformer::new(&lifters).transform(rows);
        assert_eq!(results[0].membership_number(), Some("12345"));
    }
}
