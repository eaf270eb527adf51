use std::collections::HashMap;

use chrono::Datelike;
use storage::models::{
    Affiliation, AthleteResult, IwfRawResult, LifterMetadata, RawResult, UsawRawResult,
    compute_best_q_score, parse_result_date,
};

const UNKNOWN_LIFTER: &str = "Unknown";

/// Turns raw federation rows into [`AthleteResult`]s. USAW rows prefer
/// the joined lifter record over the copy denormalised onto the result.
pub struct ResultTransformer<'a> {
    lifters: &'a HashMap<i64, LifterMetadata>,
}

impl<'a> ResultTransformer<'a> {
    pub fn new(lifters: &'a HashMap<i64, LifterMetadata>) -> Self {
        Self { lifters }
    }

    /// Normalise a federation's rows. The position of each row in `rows`
    /// becomes part of its `unique_id`.
    pub fn transform(&self, rows: Vec<RawResult>) -> Vec<AthleteResult> {
        rows.into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                RawResult::Usaw(row) => self.transform_usaw(row, index),
                RawResult::Iwf(row) => transform_iwf(row, index),
            })
            .collect()
    }

    fn transform_usaw(&self, row: UsawRawResult, index: usize) -> AthleteResult {
        let lifter = row.lifter_id.and_then(|id| self.lifters.get(&id));
        let dated = Dated::parse(row.date);

        let unique_id = match row.result_id {
            Some(result_id) => format!("usaw-{}-{}", result_id, index),
            None => format!("usaw-gen-{}-{}", dated.year, index),
        };

        let lifter_name = lifter
            .and_then(|l| present(l.athlete_name.clone()))
            .or_else(|| present(row.lifter_name))
            .unwrap_or_else(|| UNKNOWN_LIFTER.to_string());

        AthleteResult {
            lifter_id: row
                .lifter_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| unique_id.clone()),
            result_id: row.result_id.unwrap_or_default(),
            meet_id: row.meet_id,
            lifter_name,
            gender: row.gender.unwrap_or_default(),
            competition_year: dated.year,
            weight_class: row.weight_class.unwrap_or_default(),
            age_category: row.age_category.unwrap_or_default(),
            best_snatch: row.best_snatch,
            best_clean_jerk: row.best_cj,
            best_total: row.total,
            q_points: non_zero(row.qpoints),
            q_youth: non_zero(row.q_youth),
            q_masters: non_zero(row.q_masters),
            best_q_score: compute_best_q_score(row.qpoints, row.q_youth, row.q_masters),
            competition_count: 1,
            last_competition_date: dated.raw,
            competition_date: dated.date,
            last_meet_name: row.meet_name.unwrap_or_default(),
            body_weight_kg: row.body_weight_kg.unwrap_or_default(),
            competition_age: row.competition_age.filter(|age| *age > 0),
            affiliation: Affiliation::Usaw {
                membership_number: lifter
                    .and_then(|l| present(l.membership_number.clone()))
                    .or_else(|| present(row.membership_number)),
                wso: lifter
                    .and_then(|l| present(l.wso.clone()))
                    .or_else(|| present(row.wso)),
                club_name: lifter
                    .and_then(|l| present(l.club_name.clone()))
                    .or_else(|| present(row.club_name)),
            },
            unique_id,
            true_rank: None,
        }
    }
}

fn transform_iwf(row: IwfRawResult, index: usize) -> AthleteResult {
    let dated = Dated::parse(row.date);

    let unique_id = match row.db_result_id {
        Some(result_id) => format!("iwf-{}-{}", result_id, index),
        None => format!("iwf-gen-{}-{}", dated.year, index),
    };

    AthleteResult {
        lifter_id: row
            .db_lifter_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| unique_id.clone()),
        result_id: row.db_result_id.unwrap_or_default(),
        meet_id: row.db_meet_id,
        lifter_name: present(row.lifter_name).unwrap_or_else(|| UNKNOWN_LIFTER.to_string()),
        gender: row.gender.unwrap_or_default(),
        competition_year: dated.year,
        weight_class: row.weight_class.unwrap_or_default(),
        age_category: row.age_category.unwrap_or_default(),
        best_snatch: row.best_snatch,
        best_clean_jerk: row.best_cj,
        best_total: row.total,
        q_points: non_zero(row.qpoints),
        q_youth: non_zero(row.q_youth),
        q_masters: non_zero(row.q_masters),
        best_q_score: compute_best_q_score(row.qpoints, row.q_youth, row.q_masters),
        competition_count: 1,
        last_competition_date: dated.raw,
        competition_date: dated.date,
        last_meet_name: row.meet_name.unwrap_or_default(),
        body_weight_kg: row.body_weight_kg.unwrap_or_default(),
        competition_age: row.competition_age.filter(|age| *age > 0),
        affiliation: Affiliation::Iwf {
            country_code: present(row.country_code),
            country_name: present(row.country_name),
            iwf_lifter_id: row.iwf_lifter_id.filter(|id| *id != 0),
        },
        unique_id,
        true_rank: None,
    }
}

struct Dated {
    raw: String,
    date: Option<chrono::NaiveDate>,
    year: i32,
}

impl Dated {
    fn parse(raw: Option<String>) -> Self {
        let raw = raw.unwrap_or_default();
        let date = parse_result_date(&raw);
        let year = date.map(|d| d.year()).unwrap_or(0);
        Self { raw, date, year }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn non_zero(score: Option<f64>) -> Option<f64> {
    score.filter(|s| *s != 0.0 && s.is_finite())
}
