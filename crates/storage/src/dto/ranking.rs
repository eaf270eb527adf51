use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::StorageError;
use crate::models::AthleteResult;

/// Numeric field a ranking is computed over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, ToSchema)]
pub enum RankingMetric {
    #[serde(rename = "best_snatch")]
    BestSnatch,
    #[serde(rename = "best_cj")]
    BestCleanJerk,
    #[default]
    #[serde(rename = "best_total")]
    BestTotal,
    #[serde(rename = "best_qpoints")]
    BestQScore,
    #[serde(rename = "qpoints")]
    QPoints,
    #[serde(rename = "q_youth")]
    QYouth,
    #[serde(rename = "q_masters")]
    QMasters,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 7] = [
        Self::BestSnatch,
        Self::BestCleanJerk,
        Self::BestTotal,
        Self::BestQScore,
        Self::QPoints,
        Self::QYouth,
        Self::QMasters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BestSnatch => "best_snatch",
            Self::BestCleanJerk => "best_cj",
            Self::BestTotal => "best_total",
            Self::BestQScore => "best_qpoints",
            Self::QPoints => "qpoints",
            Self::QYouth => "q_youth",
            Self::QMasters => "q_masters",
        }
    }

    /// Value of this metric on a record; absent scores count as zero.
    pub fn value(&self, result: &AthleteResult) -> f64 {
        match self {
            Self::BestSnatch => result.best_snatch,
            Self::BestCleanJerk => result.best_clean_jerk,
            Self::BestTotal => result.best_total,
            Self::BestQScore => result.best_q_score,
            Self::QPoints => result.q_points.unwrap_or(0.0),
            Self::QYouth => result.q_youth.unwrap_or(0.0),
            Self::QMasters => result.q_masters.unwrap_or(0.0),
        }
    }
}

impl std::str::FromStr for RankingMetric {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == trimmed)
            .ok_or_else(|| StorageError::InvalidData(format!("Unknown ranking metric '{}'", s)))
    }
}

impl std::fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(StorageError::InvalidData(format!(
                "Unknown sort order '{}'. Expected 'asc' or 'desc'",
                other
            ))),
        }
    }
}

/// Column a ranked table can be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "String", into = "String")]
pub enum SortKey {
    #[default]
    TrueRank,
    LifterName,
    Gender,
    LastMeetName,
    WeightClass,
    AgeCategory,
    BodyWeight,
    LastCompetition,
    CompetitionCount,
    Metric(RankingMetric),
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TrueRank => "true_rank",
            Self::LifterName => "lifter_name",
            Self::Gender => "gender",
            Self::LastMeetName => "last_meet_name",
            Self::WeightClass => "weight_class",
            Self::AgeCategory => "age_category",
            Self::BodyWeight => "body_weight",
            Self::LastCompetition => "last_competition",
            Self::CompetitionCount => "competition_count",
            Self::Metric(metric) => metric.as_str(),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.trim() {
            "true_rank" => Self::TrueRank,
            "lifter_name" => Self::LifterName,
            "gender" => Self::Gender,
            "last_meet_name" => Self::LastMeetName,
            "weight_class" => Self::WeightClass,
            "age_category" => Self::AgeCategory,
            "body_weight" => Self::BodyWeight,
            "last_competition" => Self::LastCompetition,
            "competition_count" => Self::CompetitionCount,
            other => Self::Metric(
                other
                    .parse()
                    .map_err(|_| StorageError::InvalidData(format!("Unknown sort key '{}'", s)))?,
            ),
        };
        Ok(key)
    }
}

impl TryFrom<String> for SortKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_values() {
        let result = AthleteResult {
            best_total: 200.0,
            q_youth: Some(150.0),
            ..Default::default()
        };
        assert_eq!(RankingMetric::BestTotal.value(&result), 200.0);
        assert_eq!(RankingMetric::QYouth.value(&result), 150.0);
        assert_eq!(RankingMetric::QMasters.value(&result), 0.0);
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(
            "best_cj".parse::<RankingMetric>().unwrap(),
            RankingMetric::BestCleanJerk
        );
        assert!("best_press".parse::<RankingMetric>().is_err());
        assert_eq!(RankingMetric::default(), RankingMetric::BestTotal);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("true_rank".parse::<SortKey>().unwrap(), SortKey::TrueRank);
        assert_eq!(
            "best_qpoints".parse::<SortKey>().unwrap(),
            SortKey::Metric(RankingMetric::BestQScore)
        );
        assert!("height".parse::<SortKey>().is_err());

        let key: SortKey = serde_json::from_str("\"weight_class\"").unwrap();
        assert_eq!(key, SortKey::WeightClass);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"weight_class\"");
    }
}
