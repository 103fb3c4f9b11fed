//! cinebrowse - terminal browser for a movie and TV catalog.

/// Application configuration (TOML).
mod config;
/// Non-interactive commands.
mod headless;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, log_path, resolve_config_path};
use cinebrowse_api::catalog::{MediaType, TimeWindow};
use cinebrowse_api::tmdb::TmdbClient;

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse the catalog in the terminal UI.
    Browse(BrowseArgs),
    /// List trending movies and TV shows.
    Trending(TrendingArgs),
    /// List a discover catalog page by page.
    Discover(DiscoverArgs),
    /// Search movies and TV shows.
    Search(SearchArgs),
    /// Show details, credits and related titles for one item.
    Details(DetailsArgs),
    /// Write the default configuration file.
    Init,
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Address to open (e.g. "/", "/movie", "/tv/1399", "/search?query=dune").
    #[arg(long, default_value = "/")]
    route: String,
}

/// Trending window accepted on the command line.
#[derive(Clone, Copy, clap::ValueEnum)]
enum WindowArg {
    /// Last 24 hours.
    Day,
    /// Last 7 days.
    Week,
}

impl From<WindowArg> for TimeWindow {
    fn from(window: WindowArg) -> Self {
        match window {
            WindowArg::Day => Self::Day,
            WindowArg::Week => Self::Week,
        }
    }
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Trending window (default: from config).
    #[arg(long, value_enum)]
    window: Option<WindowArg>,
    /// Maximum number of items to print.
    #[arg(long, default_value_t = 20)]
    limit: usize,
}

/// Arguments for the `discover` subcommand.
#[derive(clap::Args)]
struct DiscoverArgs {
    /// Media type ("movie" or "tv").
    media_type: MediaType,
    /// Number of pages to load.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query.
    query: String,
    /// Number of pages to load.
    #[arg(long, default_value_t = 1)]
    pages: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Media type ("movie" or "tv").
    media_type: MediaType,
    /// Catalog ID.
    id: u64,
    /// Also look up a trailer.
    #[arg(long)]
    video: bool,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: clap_complete::Shell,
}

/// Builds a `TmdbClient` from the config and the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .base_url(config.base_url()?)
        .language(config.api.language.clone())
        .min_interval(config.min_interval())
        .build()
        .context("failed to build TMDB client")
}

/// Installs the global subscriber writing to `writer`.
fn init_tracing(writer: BoxMakeWriter, ansi: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(writer);

    #[cfg(feature = "otel")]
    let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .ok()
        .and_then(|_| {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_http()
                .build()
                .ok()?;

            let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                .with_simple_exporter(exporter)
                .build();

            let tracer = opentelemetry::trace::TracerProvider::tracer(
                &tracer_provider,
                env!("CARGO_PKG_NAME"),
            );
            opentelemetry::global::set_tracer_provider(tracer_provider);

            Some(tracing_opentelemetry::layer().with_tracer(tracer))
        });

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);
    #[cfg(feature = "otel")]
    registry.with(otel_layer).init();
    #[cfg(not(feature = "otel"))]
    registry.init();
}

/// Opens the log file used while the terminal UI owns the screen.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created.
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Logs each output line.
fn emit(lines: &[String]) {
    for line in lines {
        tracing::info!("{line}");
    }
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the terminal fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    let client = Arc::new(build_tmdb_client(config)?);
    cinebrowse_tui::run_browser(client, config.settings(), &args.route)
        .await
        .context("terminal UI failed")
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or trending fails to load.
#[instrument(skip_all)]
async fn run_trending(args: &TrendingArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let window = args
        .window
        .map_or(config.home.trending_window, TimeWindow::from);
    let lines = headless::trending(&client, config.settings(), window, args.limit).await?;
    emit(&lines);
    Ok(())
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the first page fails to load.
#[instrument(skip_all)]
async fn run_discover(args: &DiscoverArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let lines =
        headless::discover(&client, config.settings(), args.media_type, args.pages).await?;
    emit(&lines);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the first page fails to load.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let lines = headless::search(&client, config.settings(), &args.query, args.pages).await?;
    emit(&lines);
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or no details are available.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let lines = headless::details(
        &client,
        config.settings(),
        args.media_type,
        args.id,
        args.video,
    )
    .await?;
    emit(&lines);
    Ok(())
}

/// Runs the `init` subcommand.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
fn run_init(config_path: &Path, config: &AppConfig) -> Result<()> {
    if config_path.exists() {
        tracing::info!("Config already exists: {}", config_path.display());
        return Ok(());
    }
    config.save(config_path)?;
    tracing::info!("Wrote {}", config_path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Completions(args) = &cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(args.shell, &mut cmd, "cinebrowse", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = resolve_config_path(cli.dir.as_ref())?;
    if matches!(cli.command, Commands::Browse(_)) {
        let file = open_log_file(&log_path(&config_path))?;
        init_tracing(BoxMakeWriter::new(Mutex::new(file)), false);
    } else {
        init_tracing(BoxMakeWriter::new(std::io::stdout), true);
    }

    let config = AppConfig::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    match &cli.command {
        Commands::Browse(args) => run_browse(args, &config).await,
        Commands::Trending(args) => run_trending(args, &config).await,
        Commands::Discover(args) => run_discover(args, &config).await,
        Commands::Search(args) => run_search(args, &config).await,
        Commands::Details(args) => run_details(args, &config).await,
        Commands::Init => run_init(&config_path, &config),
        Commands::Completions(_) => Ok(()),
    }
}
