use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::{Validate, ValidationError};

use super::common::{MAX_PAGE_SIZE, PaginationParams};
use super::filter::{BodyWeightRange, FederationFilter, FilterConfig, WeightClassSelection};
use super::ranking::{RankingMetric, SortKey, SortOrder};
use crate::error::{Result, StorageError};
use crate::models::AgeCategory;

/// Query string of the ranking endpoints. List valued fields are comma
/// separated.
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RankingsQuery {
    /// Competition years, e.g. `2024,2025`. Ignored when a date bound is set.
    pub years: Option<String>,
    pub federation: Option<FederationFilter>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    /// Weight classes, optionally gender scoped: `Women's 71kg,+109kg`.
    pub weight_classes: Option<String>,
    pub age_category: Option<AgeCategory>,
    #[validate(length(max = 100, message = "Search must be at most 100 characters"))]
    pub search: Option<String>,
    pub rank_by: Option<RankingMetric>,
    #[param(value_type = Option<String>, example = "true_rank")]
    pub sort_by: Option<SortKey>,
    pub order: Option<SortOrder>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "Body weight must be positive"))]
    pub min_bw: Option<f64>,
    #[validate(range(min = 0.0, message = "Body weight must be positive"))]
    pub max_bw: Option<f64>,
    pub countries: Option<String>,
    pub wsos: Option<String>,
    pub clubs: Option<String>,
    /// Export columns to include, by key. All columns when absent.
    pub columns: Option<String>,
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<u32>,
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    pub page_size: Option<u32>,
}

fn validate_gender(gender: &str) -> std::result::Result<(), ValidationError> {
    const VALID_GENDERS: &[&str] = &["M", "F"];

    if VALID_GENDERS.contains(&gender) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_gender"))
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

impl RankingsQuery {
    pub fn parse_years(&self) -> Result<Vec<i32>> {
        split_list(self.years.as_deref())
            .iter()
            .map(|year| {
                year.parse::<i32>()
                    .map_err(|_| StorageError::InvalidData(format!("Invalid year '{}'", year)))
            })
            .collect()
    }

    pub fn filter_config(&self) -> Result<FilterConfig> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date)
            && start > end
        {
            return Err(StorageError::InvalidData(
                "start_date must not be after end_date".to_string(),
            ));
        }

        Ok(FilterConfig {
            federation: self.federation.unwrap_or_default(),
            gender: self.gender.clone(),
            weight_classes: WeightClassSelection {
                current: split_list(self.weight_classes.as_deref()),
                ..Default::default()
            },
            age_category: self.age_category,
            body_weight: BodyWeightRange {
                min: self.min_bw,
                max: self.max_bw,
            },
            start_date: self.start_date,
            end_date: self.end_date,
            years: self.parse_years()?,
            countries: split_list(self.countries.as_deref()),
            wsos: split_list(self.wsos.as_deref()),
            clubs: split_list(self.clubs.as_deref()),
            search: self.search.clone().filter(|s| !s.trim().is_empty()),
            rank_by: self.rank_by.unwrap_or_default(),
            ..Default::default()
        })
    }

    pub fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            page_size: self
                .page_size
                .unwrap_or(defaults.page_size)
                .min(MAX_PAGE_SIZE),
        }
    }

    pub fn column_keys(&self) -> Vec<String> {
        split_list(self.columns.as_deref())
    }

    /// Rank order, best first, unless asked otherwise.
    pub fn sort(&self) -> (SortKey, SortOrder) {
        (
            self.sort_by.unwrap_or_default(),
            self.order.unwrap_or(SortOrder::Asc),
        )
    }
}
