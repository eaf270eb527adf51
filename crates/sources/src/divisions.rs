use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use storage::models::InactiveDivisions;
use tracing::{info, warn};

use crate::Result;

/// Where the division reference list is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DivisionSource {
    Url(String),
    Path(PathBuf),
}

impl FromStr for DivisionSource {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Ok(Self::Url(trimmed.to_string()))
        } else {
            Ok(Self::Path(PathBuf::from(trimmed)))
        }
    }
}

impl fmt::Display for DivisionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{}", url),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

async fn read_source(source: &DivisionSource) -> Result<String> {
    match source {
        DivisionSource::Url(url) => {
            let response = reqwest::get(url).await?.error_for_status()?;
            Ok(response.text().await?)
        }
        DivisionSource::Path(path) => Ok(tokio::fs::read_to_string(path).await?),
    }
}

/// Load the inactive division list. Without a source, or when the source
/// cannot be read, nothing is considered inactive.
pub async fn load_inactive_divisions(source: Option<&DivisionSource>) -> InactiveDivisions {
    let Some(source) = source else {
        return InactiveDivisions::empty();
    };

    match read_source(source).await {
        Ok(content) => {
            let divisions = InactiveDivisions::parse(&content);
            info!("Loaded {} inactive divisions from {}", divisions.len(), source);
            divisions
        }
        Err(err) => {
            warn!("Could not load divisions from {}: {}", source, err);
            InactiveDivisions::empty()
        }
    }
}
