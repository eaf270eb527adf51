use axum::{Router, routing::get};

use super::handlers::{export_rankings_csv, get_filter_options, list_rankings, print_rankings};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rankings))
        .route("/export.csv", get(export_rankings_csv))
        .route("/print", get(print_rankings))
        .route("/options", get(get_filter_options))
}
