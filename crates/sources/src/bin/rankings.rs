use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use sources::{
    DetailedExporter, DirectorySnapshotStore, DivisionSource, HttpSnapshotStore, LiveResultStore,
    PgLiveStore, ResultSourceAdapter, SnapshotStore, SnapshotWriter, load_inactive_divisions,
};
use std::path::PathBuf;
use std::sync::Arc;
use storage::Database;
use storage::dto::{
    BodyWeightRange, FederationFilter, FilterConfig, RankingMetric, SortKey, SortOrder,
    WeightClassSelection,
};
use storage::models::{AgeCategory, AthleteResult, Federation};
use storage::services::export::{
    print_columns, rankings_file_name, summary_columns, to_csv, to_print_html,
};
use storage::services::filter::apply_filters;
use storage::services::filter_options::extract_filter_options;
use storage::services::ranking::ranked_view;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rankings")]
#[command(about = "Weightlifting rankings: rank, export and snapshot results", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Needed for the live query fallback, detailed exports and snapshots.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "SNAPSHOT_BASE_URL")]
    snapshot_url: Option<String>,

    #[arg(long, env = "SNAPSHOT_DIR", conflicts_with = "snapshot_url")]
    snapshot_dir: Option<PathBuf>,

    /// Inactive division list, as a URL or a file path.
    #[arg(long, env = "DIVISIONS_SOURCE")]
    divisions: Option<DivisionSource>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print, or write as CSV or printable HTML, the ranked view.
    Rank {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value = "true_rank")]
        sort_by: SortKey,

        #[arg(long, default_value = "asc")]
        order: SortOrder,

        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long)]
        html: Option<PathBuf>,

        /// Rows printed to the terminal.
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Attempt-level CSV of the filtered view.
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, default_value = "./exports")]
        output: PathBuf,
    },
    /// Regenerate per-year snapshot files from the database.
    Snapshot {
        #[arg(long)]
        federation: Federation,

        #[arg(long)]
        from: i32,

        #[arg(long)]
        to: i32,

        #[arg(long, default_value = "./snapshots")]
        output: PathBuf,
    },
    /// Print the filter values available for the given years as JSON.
    Options {
        #[arg(long, value_delimiter = ',', required = true)]
        years: Vec<i32>,
    },
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long, value_delimiter = ',')]
    years: Vec<i32>,

    #[arg(long, default_value = "all")]
    federation: FederationFilter,

    #[arg(long)]
    gender: Option<String>,

    #[arg(long = "weight-class")]
    weight_classes: Vec<String>,

    #[arg(long)]
    age_category: Option<AgeCategory>,

    #[arg(long)]
    search: Option<String>,

    #[arg(long, default_value = "best_total")]
    rank_by: RankingMetric,

    #[arg(long)]
    start_date: Option<NaiveDate>,

    #[arg(long)]
    end_date: Option<NaiveDate>,

    #[arg(long)]
    min_bw: Option<f64>,

    #[arg(long)]
    max_bw: Option<f64>,

    #[arg(long = "country")]
    countries: Vec<String>,

    #[arg(long = "wso")]
    wsos: Vec<String>,

    #[arg(long = "club")]
    clubs: Vec<String>,
}

impl FilterArgs {
    fn to_config(&self) -> FilterConfig {
        FilterConfig {
            federation: self.federation,
            gender: self.gender.clone(),
            weight_classes: WeightClassSelection {
                current: self.weight_classes.clone(),
                ..Default::default()
            },
            age_category: self.age_category,
            body_weight: BodyWeightRange {
                min: self.min_bw,
                max: self.max_bw,
            },
            start_date: self.start_date,
            end_date: self.end_date,
            years: self.years.clone(),
            countries: self.countries.clone(),
            wsos: self.wsos.clone(),
            clubs: self.clubs.clone(),
            search: self.search.clone(),
            rank_by: self.rank_by,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "rankings={},sources={},storage={}",
                    log_level, log_level, log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let live = connect_live(cli.database_url.as_deref()).await?;

    match &cli.command {
        Commands::Rank {
            filters,
            sort_by,
            order,
            csv,
            html,
            limit,
        } => {
            let adapter = build_adapter(&cli, live)?;
            let config = filters.to_config();
            let records = load_records(&adapter, &config).await?;
            let view = ranked_view(&records, &config, *sort_by, *order);

            handle_rank_output(&view, csv.as_ref(), html.as_ref(), *limit).await?;
        }
        Commands::Export { filters, output } => {
            let live = live.ok_or("Detailed export needs --database-url")?;
            let adapter = build_adapter(&cli, Some(live.clone()))?;
            let config = filters.to_config();
            let records = load_records(&adapter, &config).await?;
            let filtered = apply_filters(&records, &config);

            tracing::info!("Exporting {} filtered results", filtered.len());
            let path = DetailedExporter::new(live.as_ref())
                .write_to(&filtered, output, Local::now().date_naive())
                .await?;
            tracing::info!("✓ Export written to {}", path.display());
        }
        Commands::Snapshot {
            federation,
            from,
            to,
            output,
        } => {
            let live = live.ok_or("Snapshot generation needs --database-url")?;
            let writer = SnapshotWriter::new(live.as_ref(), output);
            let written = writer.write_years(*federation, *from..=*to).await?;
            tracing::info!(
                "✓ Wrote {} {} snapshot(s) to {}",
                written.len(),
                federation.label(),
                writer.output_dir().display()
            );
        }
        Commands::Options { years } => {
            let adapter = build_adapter(&cli, live)?;
            let batch = adapter.fetch_batch(years).await?;
            let inactive = load_inactive_divisions(cli.divisions.as_ref()).await;
            let options = extract_filter_options(&batch, &inactive);
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }

    Ok(())
}

async fn connect_live(
    database_url: Option<&str>,
) -> Result<Option<Arc<dyn LiveResultStore>>, Box<dyn std::error::Error>> {
    let Some(url) = database_url else {
        tracing::debug!("No database configured, live fallback disabled");
        return Ok(None);
    };

    tracing::info!("Connecting to database...");
    let database = Database::new(url).await?;
    Ok(Some(Arc::new(PgLiveStore::new(database.pool().clone()))))
}

fn build_adapter(
    cli: &Cli,
    live: Option<Arc<dyn LiveResultStore>>,
) -> Result<ResultSourceAdapter, Box<dyn std::error::Error>> {
    let snapshots: Arc<dyn SnapshotStore> = match (&cli.snapshot_dir, &cli.snapshot_url) {
        (Some(dir), _) => Arc::new(DirectorySnapshotStore::new(dir)),
        (None, Some(url)) => Arc::new(HttpSnapshotStore::new(url.as_str())?),
        (None, None) => Arc::new(DirectorySnapshotStore::new("./snapshots")),
    };
    Ok(ResultSourceAdapter::new(snapshots, live))
}

async fn load_records(
    adapter: &ResultSourceAdapter,
    config: &FilterConfig,
) -> Result<Vec<AthleteResult>, Box<dyn std::error::Error>> {
    let years = config.years_to_fetch();
    if years.is_empty() {
        tracing::warn!("No years selected, nothing to load");
    }

    let batch = adapter.fetch_batch(&years).await?;
    tracing::info!(
        "Loaded {} USAW and {} IWF results for {:?}",
        batch.usaw.len(),
        batch.iwf.len(),
        batch.years
    );
    Ok(batch.merged()?)
}

async fn handle_rank_output(
    view: &[AthleteResult],
    csv: Option<&PathBuf>,
    html: Option<&PathBuf>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();

    if let Some(path) = csv {
        let path = if path.is_dir() {
            path.join(rankings_file_name(today))
        } else {
            path.clone()
        };
        tokio::fs::write(&path, to_csv(view, &summary_columns())?).await?;
        tracing::info!("✓ Wrote {} rows to {}", view.len(), path.display());
    }

    if let Some(path) = html {
        let document = to_print_html(view, &print_columns(), "Weightlifting Rankings", today);
        if document.truncated {
            tracing::warn!(
                "Print view truncated to the first rows of {}",
                document.total_rows
            );
        }
        tokio::fs::write(path, document.html).await?;
        tracing::info!("✓ Wrote print view to {}", path.display());
    }

    if csv.is_none() && html.is_none() {
        print_table(view, limit);
    }

    Ok(())
}

fn print_table(view: &[AthleteResult], limit: usize) {
    println!(
        "{:>5}  {:<32} {:<5} {:<3} {:<8} {:>7} {:>7} {:>7} {:>8}",
        "Rank", "Athlete", "Fed", "G", "Class", "Snatch", "C&J", "Total", "Q"
    );
    for result in view.iter().take(limit) {
        let rank = result
            .true_rank
            .map(|r| r.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>5}  {:<32} {:<5} {:<3} {:<8} {:>7} {:>7} {:>7} {:>8.2}",
            rank,
            result.lifter_name,
            result.federation().label(),
            result.gender,
            result.weight_class,
            result.best_snatch,
            result.best_clean_jerk,
            result.best_total,
            result.best_q_score
        );
    }
    if view.len() > limit {
        println!("... {} more", view.len() - limit);
    }
}
