use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ranking::RankingMetric;
use crate::error::StorageError;
use crate::models::AgeCategory;

/// Lower bound of the year list implied by an open-ended date range.
pub const EARLIEST_RESULT_YEAR: i32 = 1998;

/// Which base collection the filter pipeline starts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FederationFilter {
    #[default]
    All,
    Usaw,
    Iwf,
    /// IWF results reduced to the single best result per country.
    IwfOnePerCountry,
}

impl std::str::FromStr for FederationFilter {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "usaw" => Ok(Self::Usaw),
            "iwf" => Ok(Self::Iwf),
            "iwf_one_per_country" => Ok(Self::IwfOnePerCountry),
            other => Err(StorageError::InvalidData(format!(
                "Unknown federation filter '{}'. Expected one of: all, usaw, iwf, iwf_one_per_country",
                other
            ))),
        }
    }
}

/// Weight class selections, one list per catalogue era. The filter
/// matches the union of all three.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WeightClassSelection {
    pub current: Vec<String>,
    pub historical_2018: Vec<String>,
    pub historical_1998: Vec<String>,
}

impl WeightClassSelection {
    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.current
            .iter()
            .chain(&self.historical_2018)
            .chain(&self.historical_1998)
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.historical_2018.is_empty() && self.historical_1998.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BodyWeightRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl BodyWeightRange {
    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn contains(&self, weight: f64) -> bool {
        self.min.is_none_or(|min| weight >= min) && self.max.is_none_or(|max| weight <= max)
    }
}

/// Every filter dimension the ranking view supports. Inactive dimensions
/// (`None` or empty) pass everything through.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    pub federation: FederationFilter,
    pub gender: Option<String>,
    pub weight_classes: WeightClassSelection,
    pub age_category: Option<AgeCategory>,
    pub body_weight: BodyWeightRange,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub years: Vec<i32>,
    /// IWF country codes.
    pub countries: Vec<String>,
    /// USAW regional organisations.
    pub wsos: Vec<String>,
    pub clubs: Vec<String>,
    pub search: Option<String>,
    pub rank_by: RankingMetric,
    /// Drop records whose ranking metric is not positive, so they never
    /// occupy a rank slot.
    pub require_positive_metric: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            federation: FederationFilter::All,
            gender: None,
            weight_classes: WeightClassSelection::default(),
            age_category: None,
            body_weight: BodyWeightRange::default(),
            start_date: None,
            end_date: None,
            years: Vec::new(),
            countries: Vec::new(),
            wsos: Vec::new(),
            clubs: Vec::new(),
            search: None,
            rank_by: RankingMetric::default(),
            require_positive_metric: true,
        }
    }
}

impl FilterConfig {
    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Apply the cross-field rules tied to the federation selector: a USAW
    /// view is always the USA, an IWF view has no WSOs or clubs.
    pub fn normalized(&self) -> Self {
        let mut config = self.clone();
        match config.federation {
            FederationFilter::Usaw => {
                config.countries = vec!["USA".to_string()];
            }
            FederationFilter::Iwf | FederationFilter::IwfOnePerCountry => {
                config.wsos.clear();
                config.clubs.clear();
            }
            FederationFilter::All => {}
        }
        config
    }

    /// Years the view covers. A date range, when either bound is set,
    /// replaces the explicit year list.
    pub fn effective_years(&self) -> Vec<i32> {
        self.effective_years_at(Local::now().year())
    }

    pub fn effective_years_at(&self, current_year: i32) -> Vec<i32> {
        if !self.has_date_range() {
            let mut years = self.years.clone();
            years.sort_unstable();
            years.dedup();
            return years;
        }

        let first = self
            .start_date
            .map(|d| d.year())
            .unwrap_or(EARLIEST_RESULT_YEAR);
        let last = self.end_date.map(|d| d.year()).unwrap_or(current_year);
        (first..=last).collect()
    }

    /// Years to hand to the source adapter for this view.
    pub fn years_to_fetch(&self) -> Vec<i32> {
        self.effective_years()
    }

    /// Whether a date passes the active date range. Only meaningful when
    /// [`FilterConfig::has_date_range`] is true.
    pub fn date_in_range(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }
}
