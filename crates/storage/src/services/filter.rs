use std::collections::HashSet;

use tracing::debug;

use crate::dto::{FederationFilter, FilterConfig};
use crate::models::{AthleteResult, Federation, normalize_weight_class};
use crate::services::ranking::best_per_country;
use crate::services::search::matches_athlete_name;

/// A weight class selection, optionally scoped to one gender by a
/// `"Women's "` / `"Men's "` prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WeightClassTarget {
    gender: Option<&'static str>,
    class: String,
}

impl WeightClassTarget {
    fn parse(selection: &str) -> Self {
        let lowered = selection.trim().to_lowercase();
        let lowered = lowered
            .strip_prefix("(inactive)")
            .map(str::trim_start)
            .unwrap_or(&lowered);

        let prefixes = [
            ("women's ", "F"),
            ("womens ", "F"),
            ("men's ", "M"),
            ("mens ", "M"),
        ];
        for (prefix, gender) in prefixes {
            if let Some(rest) = lowered.strip_prefix(prefix) {
                return Self {
                    gender: Some(gender),
                    class: normalize_weight_class(rest),
                };
            }
        }

        Self {
            gender: None,
            class: normalize_weight_class(lowered),
        }
    }

    fn matches(&self, record: &AthleteResult) -> bool {
        self.gender.is_none_or(|gender| record.gender == gender)
            && normalize_weight_class(&record.weight_class) == self.class
    }
}

fn folded(values: &[String]) -> HashSet<String> {
    values.iter().map(|v| v.trim().to_lowercase()).collect()
}

fn stage<F>(name: &str, records: Vec<AthleteResult>, keep: F) -> Vec<AthleteResult>
where
    F: Fn(&AthleteResult) -> bool,
{
    let before = records.len();
    let kept: Vec<AthleteResult> = records.into_iter().filter(|r| keep(r)).collect();
    debug!("Filter {}: {} -> {}", name, before, kept.len());
    kept
}

/// Run every active filter over `records` and return the survivors as a
/// new collection.
///
/// The federation selector runs first and the positive-metric check runs
/// last, so zero scores never reach ranking. In one-per-country mode the
/// survivors are then reduced to each country's best record.
pub fn apply_filters(records: &[AthleteResult], config: &FilterConfig) -> Vec<AthleteResult> {
    let config = config.normalized();

    let mut current: Vec<AthleteResult> = match config.federation {
        FederationFilter::All => records.to_vec(),
        FederationFilter::Usaw => records
            .iter()
            .filter(|r| r.federation() == Federation::Usaw)
            .cloned()
            .collect(),
        FederationFilter::Iwf | FederationFilter::IwfOnePerCountry => records
            .iter()
            .filter(|r| r.federation() == Federation::Iwf)
            .cloned()
            .collect(),
    };
    debug!(
        "Filter federation {:?}: {} -> {}",
        config.federation,
        records.len(),
        current.len()
    );

    if let Some(query) = config.search.as_deref().filter(|q| !q.trim().is_empty()) {
        current = stage("search", current, |r| matches_athlete_name(&r.lifter_name, query));
    }

    if let Some(gender) = config.gender.as_deref().filter(|g| !g.is_empty()) {
        current = stage("gender", current, |r| r.gender == gender);
    }

    if !config.weight_classes.is_empty() {
        let targets: Vec<WeightClassTarget> = config
            .weight_classes
            .iter()
            .map(|s| WeightClassTarget::parse(s))
            .collect();
        current = stage("weight class", current, |r| {
            targets.iter().any(|target| target.matches(r))
        });
    }

    if let Some(category) = config.age_category {
        current = stage("age category", current, |r| {
            r.age_categories().contains(&category)
        });
    }

    if config.body_weight.is_active() {
        let range = config.body_weight;
        current = stage("body weight", current, |r| {
            r.body_weight().is_some_and(|w| range.contains(w))
        });
    }

    if config.has_date_range() {
        current = stage("date range", current, |r| {
            r.competition_date.is_some_and(|d| config.date_in_range(d))
        });
    } else if !config.years.is_empty() {
        current = stage("years", current, |r| config.years.contains(&r.competition_year));
    }

    if !config.countries.is_empty() {
        let countries: HashSet<&str> = config.countries.iter().map(|c| c.trim()).collect();
        current = stage("country", current, |r| {
            r.country_code().is_some_and(|code| countries.contains(code))
        });
    }

    if !config.wsos.is_empty() {
        let wsos = folded(&config.wsos);
        current = stage("wso", current, |r| {
            r.wso().is_some_and(|w| wsos.contains(&w.trim().to_lowercase()))
        });
    }

    if !config.clubs.is_empty() {
        let clubs = folded(&config.clubs);
        current = stage("club", current, |r| {
            r.club_name()
                .is_some_and(|c| clubs.contains(&c.trim().to_lowercase()))
        });
    }

    if config.require_positive_metric {
        let metric = config.rank_by;
        current = stage("positive metric", current, |r| metric.value(r) > 0.0);
    }

    if config.federation == FederationFilter::IwfOnePerCountry {
        let before = current.len();
        current = best_per_country(&current, config.rank_by);
        debug!("Filter one per country: {} -> {}", before, current.len());
    }

    current
}
