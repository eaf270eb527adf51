use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sources::{
    DirectorySnapshotStore, HttpSnapshotStore, LiveResultStore, PgLiveStore, ResultSourceAdapter,
    ResultsSession, SnapshotStore, load_inactive_divisions,
};
use storage::Database;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod state;

use config::{Config, SnapshotLocation};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::rankings::handlers::list_rankings,
        features::rankings::handlers::export_rankings_csv,
        features::rankings::handlers::print_rankings,
        features::rankings::handlers::get_filter_options,
    ),
    components(
        schemas(
            storage::dto::PaginationMeta,
            storage::dto::FederationFilter,
            storage::dto::RankingMetric,
            storage::dto::SortOrder,
            storage::models::AthleteResult,
            storage::models::Affiliation,
            storage::models::AgeCategory,
            storage::models::Federation,
            storage::services::filter_options::FilterOptions,
            storage::services::filter_options::CountryOption,
        )
    ),
    tags(
        (name = "rankings", description = "Ranked, filtered and exported weightlifting results"),
    )
)]
struct ApiDoc;

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api/rankings", features::rankings::routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state)
}

async fn connect_live(config: &Config) -> anyhow::Result<Option<Arc<dyn LiveResultStore>>> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, serving snapshot years only");
        return Ok(None);
    };

    tracing::info!(
        "Connecting to database at: {}",
        database_url.split('@').next_back().unwrap_or("unknown")
    );
    let db = Database::new(database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    Ok(Some(Arc::new(PgLiveStore::new(db.pool().clone()))))
}

fn snapshot_store(location: &SnapshotLocation) -> anyhow::Result<Arc<dyn SnapshotStore>> {
    Ok(match location {
        SnapshotLocation::Dir(dir) => {
            tracing::info!("Reading snapshots from {}", dir);
            Arc::new(DirectorySnapshotStore::new(dir))
        }
        SnapshotLocation::Url(url) => {
            tracing::info!("Fetching snapshots from {}", url);
            Arc::new(HttpSnapshotStore::new(url.as_str()).context("Failed to build HTTP client")?)
        }
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting weightlifting rankings API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    let live = connect_live(&config).await?;
    let snapshots = snapshot_store(&config.snapshots)?;
    let inactive = load_inactive_divisions(config.divisions.as_ref()).await;

    let session = ResultsSession::new(ResultSourceAdapter::new(snapshots, live));
    let state = AppState::new(session, inactive);

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use storage::models::InactiveDivisions;
    use tower::ServiceExt;

    fn empty_state() -> AppState {
        let dir = std::env::temp_dir().join("rankings-api-no-snapshots");
        let session = ResultsSession::new(ResultSourceAdapter::new(
            Arc::new(DirectorySnapshotStore::new(dir)),
            None,
        ));
        AppState::new(session, InactiveDivisions::empty())
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = app(empty_state())
            .oneshot(
                Request::builder()
                    .uri("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rankings_are_mounted() {
        let response = app(empty_state())
            .oneshot(
                Request::builder()
                    .uri("/api/rankings/options")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
