use std::cmp::Ordering;

use crate::models::weight_class::weight_class_numeric;
use crate::models::{AgeCategory, AthleteResult};

pub use crate::dto::ranking::{SortKey, SortOrder};

/// Body weight for sorting: digits and dots only, unparseable is zero.
fn sortable_body_weight(raw: &str) -> f64 {
    let digits: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(0.0)
}

/// Vocabulary position of a descriptive age category; unknown sorts last.
fn age_category_position(raw: &str) -> usize {
    AgeCategory::classify(raw)
        .and_then(|category| AgeCategory::ALL.iter().position(|c| *c == category))
        .unwrap_or(usize::MAX)
}

fn compare(a: &AthleteResult, b: &AthleteResult, key: SortKey) -> Ordering {
    match key {
        SortKey::TrueRank => a.true_rank.cmp(&b.true_rank),
        SortKey::LifterName => a.lifter_name.cmp(&b.lifter_name),
        SortKey::Gender => a.gender.cmp(&b.gender),
        SortKey::LastMeetName => a.last_meet_name.cmp(&b.last_meet_name),
        SortKey::WeightClass => {
            weight_class_numeric(&a.weight_class).total_cmp(&weight_class_numeric(&b.weight_class))
        }
        SortKey::AgeCategory => {
            age_category_position(&a.age_category).cmp(&age_category_position(&b.age_category))
        }
        SortKey::BodyWeight => sortable_body_weight(&a.body_weight_kg)
            .total_cmp(&sortable_body_weight(&b.body_weight_kg)),
        // absent dates compare as earliest
        SortKey::LastCompetition => a.competition_date.cmp(&b.competition_date),
        SortKey::CompetitionCount => a.competition_count.cmp(&b.competition_count),
        SortKey::Metric(metric) => metric.value(a).total_cmp(&metric.value(b)),
    }
}

/// A sorted copy of `records`. Sorting is stable. Under `TrueRank`,
/// unranked records go last whichever direction is chosen.
pub fn sort_results(records: &[AthleteResult], key: SortKey, order: SortOrder) -> Vec<AthleteResult> {
    let mut sorted = records.to_vec();

    sorted.sort_by(|a, b| {
        if key == SortKey::TrueRank {
            match (a.true_rank, b.true_rank) {
                (Some(_), None) => return Ordering::Less,
                (None, Some(_)) => return Ordering::Greater,
                (None, None) => return Ordering::Equal,
                (Some(_), Some(_)) => {}
            }
        }

        let ordering = compare(a, b, key);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    sorted
}
