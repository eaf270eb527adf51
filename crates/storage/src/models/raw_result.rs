use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::federation::Federation;
use super::lenient::{self, parse_number};

/// A USAW result row as stored in the yearly snapshot files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UsawRawResult {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub result_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub meet_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub lifter_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub membership_number: Option<String>,
    #[serde(default)]
    pub lifter_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub weight_class: Option<String>,
    #[serde(default)]
    pub age_category: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub meet_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub body_weight_kg: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub competition_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub best_snatch: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub best_cj: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub qpoints: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub q_youth: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub q_masters: Option<f64>,
    /// Denormalised copies from the time of the result; the live lifter
    /// record takes precedence when available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wso: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club_name: Option<String>,
}

/// An IWF result row as stored in the yearly snapshot files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IwfRawResult {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub db_result_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub db_meet_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub db_lifter_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub iwf_lifter_id: Option<i64>,
    #[serde(default)]
    pub lifter_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub weight_class: Option<String>,
    #[serde(default)]
    pub age_category: Option<String>,
    /// Formatted like `"Nov 10, 1998"`.
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub meet_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub body_weight_kg: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub competition_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub best_snatch: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub best_cj: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub qpoints: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub q_youth: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub q_masters: Option<f64>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
}

/// A raw row from either federation. Raw shapes never leave the source
/// adapter; everything downstream works on `AthleteResult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResult {
    Usaw(UsawRawResult),
    Iwf(IwfRawResult),
}

impl RawResult {
    pub fn federation(&self) -> Federation {
        match self {
            Self::Usaw(_) => Federation::Usaw,
            Self::Iwf(_) => Federation::Iwf,
        }
    }

    pub fn lifter_id(&self) -> Option<i64> {
        match self {
            Self::Usaw(row) => row.lifter_id,
            Self::Iwf(row) => row.db_lifter_id,
        }
    }

    /// Parse a decompressed snapshot document, a JSON array of rows in the
    /// federation's shape.
    pub fn parse_snapshot(federation: Federation, json: &[u8]) -> serde_json::Result<Vec<Self>> {
        match federation {
            Federation::Usaw => {
                let rows: Vec<UsawRawResult> = serde_json::from_slice(json)?;
                Ok(rows.into_iter().map(Self::Usaw).collect())
            }
            Federation::Iwf => {
                let rows: Vec<IwfRawResult> = serde_json::from_slice(json)?;
                Ok(rows.into_iter().map(Self::Iwf).collect())
            }
        }
    }
}

/// `meet_results` row as returned by the live query. Lift and score
/// columns are stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct UsawResultRow {
    pub result_id: i64,
    pub meet_id: Option<i64>,
    pub lifter_id: Option<i64>,
    pub membership_number: Option<String>,
    pub lifter_name: Option<String>,
    pub gender: Option<String>,
    pub weight_class: Option<String>,
    pub age_category: Option<String>,
    pub date: Option<String>,
    pub meet_name: Option<String>,
    pub body_weight_kg: Option<String>,
    pub competition_age: Option<i32>,
    pub best_snatch: Option<String>,
    pub best_cj: Option<String>,
    pub total: Option<String>,
    pub qpoints: Option<String>,
    pub q_youth: Option<String>,
    pub q_masters: Option<String>,
    pub wso: Option<String>,
    pub club_name: Option<String>,
}

/// `iwf_meet_results` row as returned by the live query.
#[derive(Debug, Clone, FromRow)]
pub struct IwfResultRow {
    pub db_result_id: i64,
    pub db_meet_id: Option<i64>,
    pub db_lifter_id: Option<i64>,
    pub iwf_lifter_id: Option<i64>,
    pub lifter_name: Option<String>,
    pub gender: Option<String>,
    pub weight_class: Option<String>,
    pub age_category: Option<String>,
    pub date: Option<String>,
    pub meet_name: Option<String>,
    pub body_weight_kg: Option<String>,
    pub competition_age: Option<i32>,
    pub best_snatch: Option<String>,
    pub best_cj: Option<String>,
    pub total: Option<String>,
    pub qpoints: Option<String>,
    pub q_youth: Option<String>,
    pub q_masters: Option<String>,
    pub country_code: Option<String>,
    pub country_name: Option<String>,
}

fn text_number(column: &Option<String>) -> Option<f64> {
    column.as_deref().and_then(parse_number)
}

fn non_empty(column: Option<String>) -> Option<String> {
    column.filter(|value| !value.trim().is_empty())
}

fn age(column: Option<i32>) -> Option<u32> {
    column.and_then(|value| u32::try_from(value).ok())
}

impl From<UsawResultRow> for UsawRawResult {
    fn from(row: UsawResultRow) -> Self {
        Self {
            result_id: Some(row.result_id),
            meet_id: row.meet_id,
            lifter_id: row.lifter_id,
            best_snatch: text_number(&row.best_snatch).unwrap_or(0.0),
            best_cj: text_number(&row.best_cj).unwrap_or(0.0),
            total: text_number(&row.total).unwrap_or(0.0),
            qpoints: text_number(&row.qpoints),
            q_youth: text_number(&row.q_youth),
            q_masters: text_number(&row.q_masters),
            membership_number: non_empty(row.membership_number),
            lifter_name: row.lifter_name,
            gender: row.gender,
            weight_class: row.weight_class,
            age_category: row.age_category,
            date: row.date,
            meet_name: row.meet_name,
            body_weight_kg: non_empty(row.body_weight_kg),
            competition_age: age(row.competition_age),
            wso: non_empty(row.wso),
            club_name: non_empty(row.club_name),
        }
    }
}

impl From<IwfResultRow> for IwfRawResult {
    fn from(row: IwfResultRow) -> Self {
        Self {
            db_result_id: Some(row.db_result_id),
            db_meet_id: row.db_meet_id,
            db_lifter_id: row.db_lifter_id,
            iwf_lifter_id: row.iwf_lifter_id,
            best_snatch: text_number(&row.best_snatch).unwrap_or(0.0),
            best_cj: text_number(&row.best_cj).unwrap_or(0.0),
            total: text_number(&row.total).unwrap_or(0.0),
            qpoints: text_number(&row.qpoints),
            q_youth: text_number(&row.q_youth),
            q_masters: text_number(&row.q_masters),
            lifter_name: row.lifter_name,
            gender: row.gender,
            weight_class: row.weight_class,
            age_category: row.age_category,
            date: row.date,
            meet_name: row.meet_name,
            body_weight_kg: non_empty(row.body_weight_kg),
            competition_age: age(row.competition_age),
            country_code: non_empty(row.country_code),
            country_name: non_empty(row.country_name),
        }
    }
}
