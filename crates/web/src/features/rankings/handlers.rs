use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use chrono::Local;
use storage::dto::{PaginatedResponse, RankingsQuery};
use storage::models::AthleteResult;
use storage::services::export::{
    print_columns, rankings_file_name, summary_columns, to_csv, to_print_html,
};
use storage::services::filter_options::FilterOptions;

use crate::error::{ApiResult, WebError};
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/rankings",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Ranked results, one page", body = PaginatedResponse<AthleteResult>),
        (status = 400, description = "Invalid query parameters"),
        (status = 502, description = "Live results query failed, retry later")
    ),
    tag = "rankings"
)]
pub async fn list_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> ApiResult<Response> {
    let pagination = query.pagination();
    pagination.validate().map_err(WebError::BadRequest)?;

    let view = services::ranked_results(&state, &query).await?;
    let response = PaginatedResponse::from_items(view, &pagination);

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/export.csv",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Summary CSV of the whole ranked view", body = String, content_type = "text/csv"),
        (status = 400, description = "Invalid query parameters"),
        (status = 502, description = "Live results query failed, retry later")
    ),
    tag = "rankings"
)]
pub async fn export_rankings_csv(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> ApiResult<Response> {
    let view = services::ranked_results(&state, &query).await?;
    let keys = query.column_keys();
    let columns = if keys.is_empty() {
        summary_columns()
    } else {
        let keys: Vec<&str> = keys.iter().map(String::as_str).collect();
        summary_columns().only(&keys)
    };
    let csv = to_csv(&view, &columns)?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        rankings_file_name(Local::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/print",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Printable HTML table of the ranked view", body = String, content_type = "text/html"),
        (status = 400, description = "Invalid query parameters"),
        (status = 502, description = "Live results query failed, retry later")
    ),
    tag = "rankings"
)]
pub async fn print_rankings(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> ApiResult<Response> {
    let view = services::ranked_results(&state, &query).await?;
    let document = to_print_html(
        &view,
        &print_columns(),
        "Weightlifting Rankings",
        Local::now().date_naive(),
    );
    if document.truncated {
        tracing::warn!("Print view truncated, {} rows requested", document.total_rows);
    }

    Ok(Html(document.html).into_response())
}

#[utoipa::path(
    get,
    path = "/api/rankings/options",
    params(RankingsQuery),
    responses(
        (status = 200, description = "Selectable filter values for the given years", body = FilterOptions),
        (status = 400, description = "Invalid year list")
    ),
    tag = "rankings"
)]
pub async fn get_filter_options(
    State(state): State<AppState>,
    Query(query): Query<RankingsQuery>,
) -> ApiResult<Json<FilterOptions>> {
    let options = services::filter_options(&state, &query).await?;

    Ok(Json(options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::rankings::routes;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use sources::{ResultSourceAdapter, ResultsSession, SnapshotStore, SourceError};
    use std::collections::HashMap;
    use std::sync::Arc;
    use storage::models::{Federation, InactiveDivisions, IwfRawResult, UsawRawResult};
    use tower::ServiceExt;

    #[derive(Default)]
    struct FixtureSnapshots {
        documents: HashMap<(Federation, i32), Vec<u8>>,
    }

    impl FixtureSnapshots {
        fn with_usaw(mut self, year: i32, rows: Vec<UsawRawResult>) -> Self {
            self.documents
                .insert((Federation::Usaw, year), serde_json::to_vec(&rows).unwrap());
            self
        }

        fn with_iwf(mut self, year: i32, rows: Vec<IwfRawResult>) -> Self {
            self.documents
                .insert((Federation::Iwf, year), serde_json::to_vec(&rows).unwrap());
            self
        }
    }

    #[async_trait::async_trait]
    impl SnapshotStore for FixtureSnapshots {
        async fn fetch_snapshot(
            &self,
            federation: Federation,
            year: i32,
        ) -> sources::Result<Vec<u8>> {
            self.documents
                .get(&(federation, year))
                .cloned()
                .ok_or_else(|| SourceError::snapshot_unavailable(federation, year, "not found"))
        }
    }

    fn usaw(result_id: i64, name: &str, gender: &str, total: f64) -> UsawRawResult {
        UsawRawResult {
            result_id: Some(result_id),
            lifter_id: Some(result_id),
            lifter_name: Some(name.to_string()),
            gender: Some(gender.to_string()),
            weight_class: Some("71kg".to_string()),
            age_category: Some("Open Women's 71kg".to_string()),
            date: Some("2024-03-02".to_string()),
            meet_name: Some("Spring Open".to_string()),
            best_snatch: total * 0.45,
            best_cj: total * 0.55,
            total,
            wso: Some("Texas-Oklahoma".to_string()),
            ..Default::default()
        }
    }

    fn iwf(result_id: i64, name: &str, total: f64) -> IwfRawResult {
        IwfRawResult {
            db_result_id: Some(result_id),
            db_lifter_id: Some(1000 + result_id),
            lifter_name: Some(name.to_string()),
            gender: Some("F".to_string()),
            weight_class: Some("71kg".to_string()),
            date: Some("Apr 10, 2024".to_string()),
            meet_name: Some("World Cup".to_string()),
            total,
            country_code: Some("CHN".to_string()),
            country_name: Some("China".to_string()),
            ..Default::default()
        }
    }

    fn app() -> Router {
        let snapshots = FixtureSnapshots::default()
            .with_usaw(
                2024,
                vec![
                    usaw(1, "Alice Smith", "F", 200.0),
                    usaw(2, "Beth Jones", "F", 220.0),
                    usaw(3, "Carl Brown", "M", 300.0),
                ],
            )
            .with_iwf(2024, vec![iwf(7, "Li Wen", 260.0)]);
        let session = ResultsSession::new(ResultSourceAdapter::new(Arc::new(snapshots), None));
        let state = AppState::new(session, InactiveDivisions::empty());

        Router::new()
            .nest("/api/rankings", routes())
            .with_state(state)
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = get(uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_list_rankings_ranks_and_paginates() {
        let (status, body) = get_json("/api/rankings?years=2024&gender=F&page_size=2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 3);
        assert_eq!(body["pagination"]["total_pages"], 2);

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["lifter_name"], "Li Wen");
        assert_eq!(data[0]["true_rank"], 1);
        assert_eq!(data[1]["lifter_name"], "Beth Jones");
        assert_eq!(data[1]["true_rank"], 2);
    }

    #[tokio::test]
    async fn test_list_rankings_federation_filter() {
        let (status, body) = get_json("/api/rankings?years=2024&federation=usaw&gender=F").await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["lifter_name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Beth Jones", "Alice Smith"]);
    }

    #[tokio::test]
    async fn test_no_years_is_an_empty_page() {
        let (status, body) = get_json("/api/rankings").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total_items"], 0);
    }

    #[tokio::test]
    async fn test_invalid_queries_are_bad_requests() {
        let (status, body) = get_json("/api/rankings?years=2024&page_size=500").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation failed");

        let (status, _) = get_json("/api/rankings?years=20x4").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/api/rankings?years=2024&page=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_snapshot_without_database_is_bad_gateway() {
        let (status, body) = get_json("/api/rankings?years=2023").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["retry"], true);
    }

    #[tokio::test]
    async fn test_export_csv() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/rankings/export.csv?years=2024&gender=M")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.contains("weightlifting-rankings-"));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("Carl Brown"));
    }

    #[tokio::test]
    async fn test_export_csv_selected_columns() {
        let (status, body) =
            get("/api/rankings/export.csv?years=2024&gender=M&columns=rank,lifter_name").await;

        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(body).unwrap();
        assert_eq!(csv, "\"Rank\",\"Athlete Name\"\n\"1\",\"Carl Brown\"\n");
    }

    #[tokio::test]
    async fn test_print_view() {
        let (status, body) = get("/api/rankings/print?years=2024").await;

        assert_eq!(status, StatusCode::OK);
        let html = String::from_utf8(body).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Alice Smith"));
    }

    #[tokio::test]
    async fn test_filter_options() {
        let (status, body) = get_json("/api/rankings/options?years=2024").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["weight_classes"][0], "Women's 71kg");
        assert_eq!(body["wsos"][0], "Texas-Oklahoma");
        assert_eq!(body["countries"][0]["code"], "CHN");

        let (status, body) = get_json("/api/rankings/options").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["wsos"].as_array().unwrap().is_empty());
    }
}
