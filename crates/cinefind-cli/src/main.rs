//! cinefind - movie search CLI and terminal browser for TMDB.

/// Application configuration (TOML).
mod config;
/// Query state and fetch orchestration.
mod search;
/// Terminal UI components.
mod tui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbConfig, resolve_config_path};
use crate::search::{LogNotifier, NO_RESULTS_MESSAGE, Notification, Notifier, normalize_query};
use crate::tui::run_browser;
use cinefind_api::tmdb::{CatalogApi, SearchMovieParams, TmdbClient};

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "cinefind", about, version)]
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
    /// Browse movies interactively via TUI.
    Browse(BrowseArgs),
    /// Search movies once and print the result page.
    Search(SearchArgs),
    /// Manage the config file.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Search submitted on start.
    #[arg(long)]
    query: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "batman").
    #[arg(long, required = true)]
    query: String,
    /// Result page, starting at 1.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
    /// Response language. Falls back to the config value.
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default settings.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the effective config.
    Show,
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: clap_complete::Shell,
}

/// Loads the config from `--dir` or the default location.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// # Errors
///
/// Returns an error if `TMDB_API_TOKEN` is not set, the configured base URL
/// is invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &TmdbConfig) -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN")
        .context("TMDB_API_TOKEN environment variable is required")?;

    let mut builder = TmdbClient::builder().api_token(api_token).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(url) = config.base_url()? {
        tracing::debug!(base_url = %url, "using TMDB base URL override");
        builder = builder.base_url(url);
    }
    builder.build().context("failed to build TMDB client")
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if config loading, client setup, or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;

    run_browser(
        Arc::new(client),
        config.tmdb.search_options(),
        args.query,
    )
    .await
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the query is blank, the TMDB client fails to build,
/// or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let query = normalize_query(&args.query)?;
    let config = load_config(dir)?;
    let client = build_tmdb_client(&config.tmdb)?;

    let language = args
        .language
        .clone()
        .unwrap_or_else(|| config.tmdb.language.clone());
    let params = SearchMovieParams::new(query)
        .page(args.page)
        .language(language)
        .include_adult(config.tmdb.include_adult);

    let response = client
        .search_movie(&params)
        .await
        .context("TMDB search/movie request failed")?;

    if response.results.is_empty() {
        LogNotifier.notify(Notification::error(NO_RESULTS_MESSAGE));
        return Ok(());
    }

    tracing::info!(
        "Total results: {} (page {}/{})",
        response.total_results,
        response.page,
        response.total_pages
    );
    tracing::info!("ID\tYear\tRating\tVotes\tLang\tTitle");
    for movie in &response.results {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}\t{}\t{}",
            movie.id,
            movie
                .release_year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            movie.vote_average,
            movie.vote_count,
            movie.original_language,
            movie.title,
        );
    }

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists without `--force` or cannot be written.
#[instrument(skip_all)]
fn run_config_init(force: bool, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    AppConfig::default()
        .save(&config_path)
        .context("failed to save config")?;
    tracing::info!("Wrote {}", config_path.display());

    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded or rendered.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    for line in config.to_toml()?.lines() {
        tracing::info!("{line}");
    }

    Ok(())
}

/// Writes completions for `shell` to stdout.
fn run_completions(args: &CompletionsArgs) {
    let mut command = Cli::command();
    let name = command.get_name().to_owned();
    clap_complete::generate(args.shell, &mut command, name, &mut io::stdout());
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse(args) => run_browse(args, cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Config(cfg) => match cfg.command {
            ConfigSubcommands::Init { force } => run_config_init(force, cli.dir.as_ref()),
            ConfigSubcommands::Show => run_config_show(cli.dir.as_ref()),
        },
        Commands::Completions(args) => {
            run_completions(&args);
            Ok(())
        }
    }
}
