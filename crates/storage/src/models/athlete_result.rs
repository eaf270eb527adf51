use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::age_category::AgeCategory;
use super::federation::Federation;

/// Federation specific affiliation fields. USAW records never carry
/// country data and IWF records never carry WSO, club or membership data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "federation", rename_all = "lowercase")]
pub enum Affiliation {
    Usaw {
        membership_number: Option<String>,
        wso: Option<String>,
        club_name: Option<String>,
    },
    Iwf {
        country_code: Option<String>,
        country_name: Option<String>,
        iwf_lifter_id: Option<i64>,
    },
}

impl Default for Affiliation {
    fn default() -> Self {
        Self::Usaw {
            membership_number: None,
            wso: None,
            club_name: None,
        }
    }
}

impl Affiliation {
    pub fn federation(&self) -> Federation {
        match self {
            Self::Usaw { .. } => Federation::Usaw,
            Self::Iwf { .. } => Federation::Iwf,
        }
    }
}

/// Which of the three Q scores supplies `best_q_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QScoreKind {
    QPoints,
    QYouth,
    QMasters,
    None,
}

/// One competition result, normalised from either federation's raw row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AthleteResult {
    pub lifter_id: String,
    /// `<federation>-<result id>-<position in batch>`; unique within one
    /// loaded batch only.
    pub unique_id: String,
    pub result_id: i64,
    pub meet_id: Option<i64>,
    pub lifter_name: String,
    pub gender: String,
    /// Year of the competition date, `0` when the date did not parse.
    pub competition_year: i32,
    pub weight_class: String,
    pub age_category: String,
    pub best_snatch: f64,
    pub best_clean_jerk: f64,
    pub best_total: f64,
    pub q_points: Option<f64>,
    pub q_youth: Option<f64>,
    pub q_masters: Option<f64>,
    pub best_q_score: f64,
    pub competition_count: u32,
    /// Date as it appeared in the source row.
    pub last_competition_date: String,
    pub competition_date: Option<NaiveDate>,
    pub last_meet_name: String,
    pub body_weight_kg: String,
    pub competition_age: Option<u32>,
    #[serde(flatten)]
    pub affiliation: Affiliation,
    pub true_rank: Option<u32>,
}

impl AthleteResult {
    pub fn federation(&self) -> Federation {
        self.affiliation.federation()
    }

    /// Country code used by the country filter. USAW results always count
    /// as `"USA"`.
    pub fn country_code(&self) -> Option<&str> {
        match &self.affiliation {
            Affiliation::Usaw { .. } => Some("USA"),
            Affiliation::Iwf { country_code, .. } => country_code.as_deref(),
        }
    }

    pub fn country_name(&self) -> Option<&str> {
        match &self.affiliation {
            Affiliation::Usaw { .. } => Some("United States of America"),
            Affiliation::Iwf { country_name, .. } => country_name.as_deref(),
        }
    }

    pub fn wso(&self) -> Option<&str> {
        match &self.affiliation {
            Affiliation::Usaw { wso, .. } => wso.as_deref(),
            Affiliation::Iwf { .. } => None,
        }
    }

    pub fn club_name(&self) -> Option<&str> {
        match &self.affiliation {
            Affiliation::Usaw { club_name, .. } => club_name.as_deref(),
            Affiliation::Iwf { .. } => None,
        }
    }

    pub fn membership_number(&self) -> Option<&str> {
        match &self.affiliation {
            Affiliation::Usaw {
                membership_number, ..
            } => membership_number.as_deref(),
            Affiliation::Iwf { .. } => None,
        }
    }

    /// Body weight in kilograms, or `None` when the stored string is not a
    /// finite number (optionally suffixed with "kg").
    pub fn body_weight(&self) -> Option<f64> {
        let trimmed = self.body_weight_kg.trim();
        let numeric = trimmed
            .strip_suffix("kg")
            .or_else(|| trimmed.strip_suffix("KG"))
            .unwrap_or(trimmed)
            .trim();
        numeric.parse::<f64>().ok().filter(|value| value.is_finite())
    }

    pub fn q_score_kind(&self) -> QScoreKind {
        let q_points = self.q_points.unwrap_or(0.0);
        let q_youth = self.q_youth.unwrap_or(0.0);
        let q_masters = self.q_masters.unwrap_or(0.0);

        if q_points > 0.0 && q_points >= q_youth && q_points >= q_masters {
            QScoreKind::QPoints
        } else if q_youth > 0.0 && q_youth >= q_masters {
            QScoreKind::QYouth
        } else if q_masters > 0.0 {
            QScoreKind::QMasters
        } else {
            QScoreKind::None
        }
    }

    /// Categories this result belongs to for filtering. A known
    /// competition age gives every matching category; otherwise the
    /// descriptive string yields at most one.
    pub fn age_categories(&self) -> Vec<AgeCategory> {
        match self.competition_age {
            Some(age) => AgeCategory::for_age(age),
            None => AgeCategory::classify(&self.age_category).into_iter().collect(),
        }
    }

    pub fn with_rank(&self, rank: Option<u32>) -> Self {
        Self {
            true_rank: rank,
            ..self.clone()
        }
    }
}

/// Parse a result date. USAW rows use ISO dates (sometimes with a time
/// part), IWF rows use `"Nov 10, 1998"`.
pub fn parse_result_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let iso = trimmed.get(..10).unwrap_or(trimmed);
    if let Ok(date) = NaiveDate::parse_from_str(iso, "%Y-%m-%d") {
        return Some(date);
    }

    ["%b %d, %Y", "%B %d, %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

/// Highest of the three Q scores, treating absent values as zero.
pub fn compute_best_q_score(
    q_points: Option<f64>,
    q_youth: Option<f64>,
    q_masters: Option<f64>,
) -> f64 {
    [q_points, q_youth, q_masters]
        .into_iter()
        .map(|score| score.unwrap_or(0.0))
        .fold(0.0, f64::max)
}
