use anyhow::{Context, Result};
use sources::DivisionSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotLocation {
    Url(String),
    Dir(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Without a database the API serves snapshot years only.
    pub database_url: Option<String>,
    pub snapshots: SnapshotLocation,
    pub divisions: Option<DivisionSource>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let snapshots = match (lookup("SNAPSHOT_DIR"), lookup("SNAPSHOT_BASE_URL")) {
            (Some(dir), _) => SnapshotLocation::Dir(dir),
            (None, Some(url)) => SnapshotLocation::Url(url),
            (None, None) => {
                anyhow::bail!("Either SNAPSHOT_DIR or SNAPSHOT_BASE_URL must be set")
            }
        };

        Ok(Self {
            host: lookup("HOST").context("Cannot load HOST env variable")?,
            port: lookup("PORT")
                .context("Cannot load PORT env variable")?
                .parse()
                .context("PORT must be a number")?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            snapshots,
            divisions: lookup("DIVISIONS_SOURCE")
                .filter(|source| !source.trim().is_empty())
                .and_then(|source| source.parse().ok()),
        })
    }
}
