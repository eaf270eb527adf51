use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dto::{FilterConfig, RankingMetric, SortKey, SortOrder};
use crate::error::{Result, StorageError};
use crate::models::{AthleteResult, Federation};
use crate::services::{filter, sorting};

/// Competition ranks keyed by `unique_id`.
///
/// Each athlete is ranked once, on their best record for `metric`; their
/// other records get no entry. Athletes are identified per federation,
/// since USAW and IWF lifter ids are separate id spaces. Records whose metric is not positive are
/// never ranked. Equal values share a rank, and the next distinct value is
/// ranked one past the number of athletes ranked so far, so
/// `[100, 100, 90]` ranks as `[1, 1, 3]`.
pub fn rank(records: &[AthleteResult], metric: RankingMetric) -> HashMap<String, u32> {
    let mut ordered: Vec<&AthleteResult> = records.iter().collect();
    // stable: equal values keep input order
    ordered.sort_by(|a, b| metric.value(b).total_cmp(&metric.value(a)));

    let mut ranks = HashMap::new();
    let mut ranked_lifters: HashSet<(Federation, &str)> = HashSet::new();
    let mut previous: Option<(f64, u32)> = None;

    for record in ordered {
        let value = metric.value(record);
        let athlete = (record.federation(), record.lifter_id.as_str());
        if value <= 0.0 || ranked_lifters.contains(&athlete) {
            continue;
        }

        let position = match previous {
            Some((previous_value, previous_rank)) if previous_value == value => previous_rank,
            _ => ranked_lifters.len() as u32 + 1,
        };

        ranked_lifters.insert(athlete);
        ranks.insert(record.unique_id.clone(), position);
        previous = Some((value, position));
    }

    debug!(
        "Ranked {} athletes out of {} records by {}",
        ranks.len(),
        records.len(),
        metric
    );
    ranks
}

/// New records carrying their rank, or `None` when unranked.
pub fn apply_ranks(records: &[AthleteResult], ranks: &HashMap<String, u32>) -> Vec<AthleteResult> {
    records
        .iter()
        .map(|record| record.with_rank(ranks.get(&record.unique_id).copied()))
        .collect()
}

/// USAW records followed by IWF records. A `unique_id` appearing twice
/// means the batch was assembled wrongly and is rejected.
pub fn merge_federations(
    usaw: &[AthleteResult],
    iwf: &[AthleteResult],
) -> Result<Vec<AthleteResult>> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(usaw.len() + iwf.len());
    for record in usaw.iter().chain(iwf) {
        if !seen.insert(record.unique_id.as_str()) {
            return Err(StorageError::InvalidData(format!(
                "Duplicate unique_id '{}' in merged batch",
                record.unique_id
            )));
        }
    }

    Ok(usaw.iter().chain(iwf).cloned().collect())
}

/// Keep the single best record per country code. Ties go to the most
/// recent competition, then to the earlier record. Records without a
/// country code are dropped.
pub fn best_per_country(records: &[AthleteResult], metric: RankingMetric) -> Vec<AthleteResult> {
    let mut best: HashMap<&str, usize> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        let Some(country) = record.country_code() else {
            continue;
        };

        match best.get(country) {
            Some(&current) => {
                let incumbent = &records[current];
                let value = metric.value(record);
                let incumbent_value = metric.value(incumbent);
                let better = value > incumbent_value
                    || (value == incumbent_value
                        && record.competition_date > incumbent.competition_date);
                if better {
                    best.insert(country, index);
                }
            }
            None => {
                best.insert(country, index);
            }
        }
    }

    let mut keep: Vec<usize> = best.into_values().collect();
    keep.sort_unstable();
    keep.into_iter().map(|index| records[index].clone()).collect()
}

/// Filter, rank by the configured metric, attach ranks and sort. This is
/// the view both the CLI and the HTTP API present.
pub fn ranked_view(
    records: &[AthleteResult],
    config: &FilterConfig,
    sort_key: SortKey,
    order: SortOrder,
) -> Vec<AthleteResult> {
    let filtered = filter::apply_filters(records, config);
    let ranks = rank(&filtered, config.rank_by);
    let ranked = apply_ranks(&filtered, &ranks);
    sorting::sort_results(&ranked, sort_key, order)
}
