use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{
    AgeCategory, AthleteResult, InactiveDivisions, ResultBatch, compare_weight_class_labels,
};

const INACTIVE_PREFIX: &str = "(Inactive) ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CountryOption {
    pub code: String,
    pub name: String,
}

/// Selectable values for the filter controls, derived from a loaded
/// batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct FilterOptions {
    /// `"Women's 71kg"` style labels, active first, then
    /// `"(Inactive) "` prefixed ones.
    pub weight_classes: Vec<String>,
    pub age_categories: Vec<AgeCategory>,
    pub wsos: Vec<String>,
    pub clubs: Vec<String>,
    pub countries: Vec<CountryOption>,
}

fn gender_marker(age_category: &str) -> Option<&'static str> {
    if age_category.contains("Women's") {
        Some("Women's")
    } else if age_category.contains("Men's") {
        Some("Men's")
    } else {
        None
    }
}

/// Gender and weight class combinations seen in USAW results, split by
/// whether the division is still contested.
pub fn weight_class_options(usaw: &[AthleteResult], inactive: &InactiveDivisions) -> Vec<String> {
    let combinations: HashSet<String> = usaw
        .iter()
        .filter(|r| !r.weight_class.is_empty())
        .filter_map(|r| {
            gender_marker(&r.age_category).map(|gender| format!("{} {}", gender, r.weight_class))
        })
        .collect();

    let (mut retired, mut active): (Vec<String>, Vec<String>) = combinations
        .into_iter()
        .partition(|label| inactive.contains(label));

    active.sort_by(|a, b| compare_weight_class_labels(a, b));
    retired.sort_by(|a, b| compare_weight_class_labels(a, b));

    active
        .into_iter()
        .chain(retired.into_iter().map(|label| format!("{}{}", INACTIVE_PREFIX, label)))
        .collect()
}

pub fn extract_filter_options(batch: &ResultBatch, inactive: &InactiveDivisions) -> FilterOptions {
    let weight_classes = weight_class_options(&batch.usaw, inactive);

    let age_categories: BTreeSet<AgeCategory> = batch
        .usaw
        .iter()
        .filter_map(|r| AgeCategory::classify(&r.age_category))
        .collect();

    let mut wsos = BTreeSet::new();
    let mut clubs = BTreeSet::new();
    let mut countries: BTreeMap<String, String> = BTreeMap::new();

    for record in batch.usaw.iter().chain(&batch.iwf) {
        if let Some(wso) = record.wso().filter(|w| !w.is_empty()) {
            wsos.insert(wso.to_string());
        }
        if let Some(club) = record.club_name().filter(|c| !c.is_empty()) {
            clubs.insert(club.to_string());
        }
        if let Some(code) = record.country_code().filter(|c| !c.is_empty() && *c != "USA") {
            let name = record.country_name().unwrap_or(code);
            countries.insert(code.to_string(), name.to_string());
        }
    }

    let mut countries: Vec<CountryOption> = countries
        .into_iter()
        .map(|(code, name)| CountryOption { code, name })
        .collect();
    countries.sort_by(|a, b| a.name.cmp(&b.name));

    FilterOptions {
        weight_classes,
        age_categories: age_categories.into_iter().collect(),
        wsos: wsos.into_iter().collect(),
        clubs: clubs.into_iter().collect(),
        countries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Affiliation;

    fn usaw(age_category: &str, weight_class: &str, wso: &str, club: &str) -> AthleteResult {
        AthleteResult {
            age_category: age_category.to_string(),
            weight_class: weight_class.to_string(),
            affiliation: Affiliation::Usaw {
                membership_number: None,
                wso: Some(wso.to_string()),
                club_name: Some(club.to_string()),
            },
            ..Default::default()
        }
    }

    fn iwf(code: &str, name: Option<&str>) -> AthleteResult {
        AthleteResult {
            affiliation: Affiliation::Iwf {
                country_code: Some(code.to_string()),
                country_name: name.map(str::to_string),
                iwf_lifter_id: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_weight_class_options_split_and_sorted() {
        let records = vec![
            usaw("Open Men's 89kg", "89kg", "Texas", "B"),
            usaw("Open Women's 71kg", "71kg", "Florida", "A"),
            usaw("Open Women's 64kg", "64kg", "Florida", "A"),
            usaw("Open Men's 61kg", "61kg", "Texas", "B"),
            usaw("Youth", "55kg", "Texas", "B"),
        ];
        let inactive = InactiveDivisions::parse("header\n(Inactive) Open Women's 64kg\n");
        assert_eq!(
            weight_class_options(&records, &inactive),
            vec![
                "Women's 71kg",
                "Men's 61kg",
                "Men's 89kg",
                "(Inactive) Women's 64kg",
            ]
        );
    }

    #[test]
    fn test_extract_options() {
        let batch = ResultBatch::new(
            vec![2024],
            vec![
                usaw("Junior Women's 64kg", "64kg", "Florida", "Iron"),
                usaw("Masters (40-44) Men's 89kg", "89kg", "Alabama", "Anvil"),
                usaw("Open Men's 89kg", "89kg", "Florida", ""),
            ],
            vec![
                iwf("THA", Some("Thailand")),
                iwf("CHN", Some("China")),
                iwf("USA", Some("United States")),
                iwf("XYZ", None),
            ],
        );
        let options = extract_filter_options(&batch, &InactiveDivisions::empty());

        assert_eq!(
            options.age_categories,
            vec![AgeCategory::Junior, AgeCategory::Open, AgeCategory::Masters40]
        );
        assert_eq!(options.wsos, vec!["Alabama", "Florida"]);
        assert_eq!(options.clubs, vec!["Anvil", "Iron"]);
        let codes: Vec<&str> = options.countries.iter().map(|c| c.code.as_str()).collect();
        assert_eq!(codes, vec!["CHN", "THA", "XYZ"]);
    }
}
