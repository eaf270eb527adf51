use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use utoipa::ToSchema;

use crate::error::StorageError;

/// The two federations whose results are ranked side by side.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Federation {
    Usaw,
    Iwf,
}

impl Federation {
    pub const ALL: [Federation; 2] = [Self::Usaw, Self::Iwf];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usaw => "usaw",
            Self::Iwf => "iwf",
        }
    }

    /// Short label used in exported tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Usaw => "USAW",
            Self::Iwf => "IWF",
        }
    }

    /// Years for which a pre-built snapshot file is published.
    pub fn snapshot_years(&self) -> RangeInclusive<i32> {
        match self {
            Self::Usaw => 2012..=2025,
            Self::Iwf => 1998..=2025,
        }
    }

    pub fn snapshot_file_name(&self, year: i32) -> String {
        format!("{}-rankings-{}.json.gz", self.as_str(), year)
    }
}

impl std::str::FromStr for Federation {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "usaw" => Ok(Self::Usaw),
            "iwf" => Ok(Self::Iwf),
            other => Err(StorageError::InvalidData(format!(
                "Unknown federation '{}'. Expected 'usaw' or 'iwf'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for Federation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_file_name() {
        assert_eq!(
            Federation::Usaw.snapshot_file_name(2024),
            "usaw-rankings-2024.json.gz"
        );
        assert_eq!(
            Federation::Iwf.snapshot_file_name(1998),
            "iwf-rankings-1998.json.gz"
        );
    }

    #[test]
    fn test_snapshot_coverage() {
        assert!(Federation::Usaw.snapshot_years().contains(&2012));
        assert!(!Federation::Usaw.snapshot_years().contains(&2011));
        assert!(Federation::Iwf.snapshot_years().contains(&1998));
        assert!(!Federation::Iwf.snapshot_years().contains(&2026));
    }

    #[test]
    fn test_parse_federation() {
        assert_eq!("USAW".parse::<Federation>().unwrap(), Federation::Usaw);
        assert_eq!(" iwf ".parse::<Federation>().unwrap(), Federation::Iwf);
        assert!("ipf".parse::<Federation>().is_err());
    }
}
