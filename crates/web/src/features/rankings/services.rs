use std::sync::Arc;

use storage::dto::{FilterConfig, RankingsQuery};
use storage::models::{AthleteResult, ResultBatch};
use storage::services::filter_options::{FilterOptions, extract_filter_options};
use storage::services::ranking::ranked_view;
use validator::Validate;

use crate::error::{ApiResult, WebError};
use crate::state::AppState;

/// Validate the query and turn it into a filter configuration.
pub fn filter_config(query: &RankingsQuery) -> ApiResult<FilterConfig> {
    query.validate()?;
    query
        .filter_config()
        .map_err(|e| WebError::BadRequest(e.to_string()))
}

async fn load_records(state: &AppState, config: &FilterConfig) -> ApiResult<Vec<AthleteResult>> {
    let years = config.years_to_fetch();
    let batch = state.session.batch_for(&years).await?;
    tracing::debug!("Serving {} results for {:?}", batch.len(), batch.years);
    Ok(batch.merged()?)
}

/// The full ranked and sorted view for a query.
pub async fn ranked_results(
    state: &AppState,
    query: &RankingsQuery,
) -> ApiResult<Vec<AthleteResult>> {
    let config = filter_config(query)?;
    let records = load_records(state, &config).await?;
    let (sort_key, order) = query.sort();
    Ok(ranked_view(&records, &config, sort_key, order))
}

/// Options for the given years, or for the batch currently held when no
/// years are given.
pub async fn filter_options(state: &AppState, query: &RankingsQuery) -> ApiResult<FilterOptions> {
    let years = query
        .parse_years()
        .map_err(|e| WebError::BadRequest(e.to_string()))?;

    let batch = if years.is_empty() {
        state
            .session
            .current()
            .await
            .unwrap_or_else(|| Arc::new(ResultBatch::default()))
    } else {
        state.session.batch_for(&years).await?
    };

    Ok(extract_filter_options(&batch, &state.inactive))
}
