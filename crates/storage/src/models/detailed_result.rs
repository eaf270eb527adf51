use serde::Serialize;
use sqlx::FromRow;

use super::athlete_result::{AthleteResult, parse_result_date};
use super::lenient::parse_number;
use super::lifter::UsawLifterDetail;

/// Attempt-level USAW result used by the detailed export.
#[derive(Debug, Clone, Default, FromRow)]
pub struct UsawDetailedResult {
    pub result_id: i64,
    pub lifter_id: Option<i64>,
    pub lifter_name: Option<String>,
    pub membership_number: Option<String>,
    pub date: Option<String>,
    pub meet_name: Option<String>,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub age_category: Option<String>,
    pub weight_class: Option<String>,
    pub body_weight_kg: Option<String>,
    pub snatch_lift_1: Option<String>,
    pub snatch_lift_2: Option<String>,
    pub snatch_lift_3: Option<String>,
    pub best_snatch: Option<String>,
    pub cj_lift_1: Option<String>,
    pub cj_lift_2: Option<String>,
    pub cj_lift_3: Option<String>,
    pub best_cj: Option<String>,
    pub total: Option<String>,
    pub qpoints: Option<String>,
    pub q_youth: Option<String>,
    pub q_masters: Option<String>,
    pub competition_age: Option<i32>,
    pub wso: Option<String>,
    pub club_name: Option<String>,
}

/// Attempt-level IWF result used by the detailed export.
#[derive(Debug, Clone, Default, FromRow)]
pub struct IwfDetailedResult {
    pub db_result_id: i64,
    pub lifter_name: Option<String>,
    pub date: Option<String>,
    pub meet_name: Option<String>,
    pub gender: Option<String>,
    pub age_category: Option<String>,
    pub weight_class: Option<String>,
    pub body_weight_kg: Option<String>,
    pub snatch_1: Option<String>,
    pub snatch_2: Option<String>,
    pub snatch_3: Option<String>,
    pub best_snatch: Option<String>,
    pub cj_1: Option<String>,
    pub cj_2: Option<String>,
    pub cj_3: Option<String>,
    pub best_cj: Option<String>,
    pub total: Option<String>,
    pub qpoints: Option<String>,
    pub competition_age: Option<i32>,
    pub nation: Option<String>,
}

/// One flattened line of the detailed export. Every field is already
/// formatted for output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetailedExportRow {
    pub source: String,
    pub lifter_name: String,
    pub membership_number: String,
    pub state: String,
    pub date: String,
    pub meet_name: String,
    pub meet_location: String,
    pub gender: String,
    pub age_category: String,
    pub weight_class: String,
    pub body_weight: String,
    pub snatch_1: String,
    pub snatch_2: String,
    pub snatch_3: String,
    pub best_snatch: String,
    pub cj_1: String,
    pub cj_2: String,
    pub cj_3: String,
    pub best_cj: String,
    pub total: String,
    pub q_points: String,
    pub q_youth: String,
    pub q_masters: String,
    pub competition_age: String,
    pub wso: String,
    pub club: String,
    pub country: String,
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// `M/D/YYYY`, or the raw string when it does not parse.
pub fn format_export_date(raw: &str) -> String {
    match parse_result_date(raw) {
        Some(date) => date.format("%-m/%-d/%Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn format_q_score(value: Option<f64>) -> String {
    value.map(|v| format!("{:.3}", v)).unwrap_or_default()
}

fn format_q_column(value: &Option<String>) -> String {
    format_q_score(value.as_deref().and_then(parse_number))
}

fn format_age(age: Option<i32>) -> String {
    match age {
        Some(age) if age > 0 => age.to_string(),
        _ => String::new(),
    }
}

impl DetailedExportRow {
    pub fn from_usaw(result: &UsawDetailedResult, lifter: Option<&UsawLifterDetail>) -> Self {
        let membership_number = lifter
            .and_then(|l| l.membership_number.clone())
            .or_else(|| result.membership_number.clone())
            .unwrap_or_default();

        Self {
            source: "USAW".to_string(),
            lifter_name: text(&result.lifter_name),
            membership_number,
            state: lifter.and_then(|l| l.state.clone()).unwrap_or_default(),
            date: format_export_date(result.date.as_deref().unwrap_or_default()),
            meet_name: text(&result.meet_name),
            meet_location: text(&result.location),
            gender: text(&result.gender),
            age_category: text(&result.age_category),
            weight_class: text(&result.weight_class),
            body_weight: text(&result.body_weight_kg),
            snatch_1: text(&result.snatch_lift_1),
            snatch_2: text(&result.snatch_lift_2),
            snatch_3: text(&result.snatch_lift_3),
            best_snatch: text(&result.best_snatch),
            cj_1: text(&result.cj_lift_1),
            cj_2: text(&result.cj_lift_2),
            cj_3: text(&result.cj_lift_3),
            best_cj: text(&result.best_cj),
            total: text(&result.total),
            q_points: format_q_column(&result.qpoints),
            q_youth: format_q_column(&result.q_youth),
            q_masters: format_q_column(&result.q_masters),
            competition_age: format_age(result.competition_age),
            wso: text(&result.wso),
            club: text(&result.club_name),
            country: String::new(),
        }
    }

    pub fn from_iwf(result: &IwfDetailedResult) -> Self {
        Self {
            source: "IWF".to_string(),
            lifter_name: text(&result.lifter_name),
            date: format_export_date(result.date.as_deref().unwrap_or_default()),
            meet_name: text(&result.meet_name),
            gender: text(&result.gender),
            age_category: text(&result.age_category),
            weight_class: text(&result.weight_class),
            body_weight: text(&result.body_weight_kg),
            snatch_1: text(&result.snatch_1),
            snatch_2: text(&result.snatch_2),
            snatch_3: text(&result.snatch_3),
            best_snatch: text(&result.best_snatch),
            cj_1: text(&result.cj_1),
            cj_2: text(&result.cj_2),
            cj_3: text(&result.cj_3),
            best_cj: text(&result.best_cj),
            total: text(&result.total),
            q_points: format_q_column(&result.qpoints),
            competition_age: format_age(result.competition_age),
            country: text(&result.nation),
            ..Default::default()
        }
    }

    /// Row built from the in-memory summary when attempt detail is not
    /// available. Attempt columns stay empty.
    pub fn from_summary(result: &AthleteResult) -> Self {
        let age = result.competition_age.and_then(|a| i32::try_from(a).ok());
        let best_q = Some(result.best_q_score).filter(|q| *q > 0.0);

        Self {
            source: result.federation().label().to_string(),
            lifter_name: result.lifter_name.clone(),
            membership_number: result.membership_number().unwrap_or_default().to_string(),
            date: format_export_date(&result.last_competition_date),
            meet_name: result.last_meet_name.clone(),
            gender: result.gender.clone(),
            age_category: result.age_category.clone(),
            weight_class: result.weight_class.clone(),
            body_weight: result.body_weight_kg.clone(),
            best_snatch: result.best_snatch.to_string(),
            best_cj: result.best_clean_jerk.to_string(),
            total: result.best_total.to_string(),
            q_points: format_q_score(best_q),
            competition_age: format_age(age),
            wso: result.wso().unwrap_or_default().to_string(),
            club: result.club_name().unwrap_or_default().to_string(),
            country: result.country_code().unwrap_or_default().to_string(),
            ..Default::default()
        }
    }
}
