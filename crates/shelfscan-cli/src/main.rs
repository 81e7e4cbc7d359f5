use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use shelfscan_core::{AppConfig, FetchStrategy};
use shelfscan_scraper::{build_fetcher, CatalogWalker, RunResult, Throttle, MAX_PAGE_BUDGET};
use tracing_subscriber::EnvFilter;

mod export;
mod progress;

use export::ExportFormat;
use progress::ConsoleProgress;

#[derive(Debug, Parser)]
#[command(name = "shelfscan")]
#[command(about = "Export a storefront category listing to a spreadsheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Walk a category listing page by page and export every product card.
    Scrape(ScrapeArgs),
}

#[derive(Debug, Args)]
struct ScrapeArgs {
    /// Category listing URL, without paging parameters.
    #[arg(long, env = "SHELFSCAN_URL", value_parser = non_blank_url)]
    url: String,

    /// Maximum number of listing pages to request.
    #[arg(
        long,
        default_value_t = 5,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_BUDGET))
    )]
    max_pages: u32,

    /// Fetch strategy; overrides SHELFSCAN_FETCH_STRATEGY.
    #[arg(long)]
    strategy: Option<FetchStrategy>,

    /// Output file. Defaults to a timestamped file in SHELFSCAN_OUTPUT_DIR.
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    format: ExportFormat,
}

fn non_blank_url(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err("URL must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log filter {:?}", config.log_level))?;
    // Progress lines own stdout.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config =
        shelfscan_core::load_app_config_from_env().context("failed to load configuration")?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Scrape(args) => run_scrape(&config, args).await,
    }
}

async fn run_scrape(config: &AppConfig, args: ScrapeArgs) -> anyhow::Result<()> {
    // One timestamp for the whole run; every exported row carries it.
    let scraped_at = Local::now();
    let strategy = args.strategy.unwrap_or(config.fetch_strategy);

    let fetcher = build_fetcher(strategy, config)
        .await
        .with_context(|| format!("failed to set up the {strategy} fetcher"))?;

    println!(
        "scraping {} with the {} fetcher (up to {} pages)",
        args.url,
        fetcher.strategy(),
        args.max_pages
    );

    let mut progress = ConsoleProgress::stdout();
    let result = CatalogWalker::new(fetcher, scraped_at)
        .with_throttle(Throttle::from_config(config))
        .with_page_timeout(Duration::from_secs(config.request_timeout_secs))
        .run_with_observer(&args.url, args.max_pages, &mut progress)
        .await?;

    if result.is_empty() {
        tracing::warn!(
            pages_requested = result.pages_requested,
            failed_pages = result.failed_pages.len(),
            "no products collected"
        );
        eprintln!("warning: no products found; the page markup may have changed");
        return Ok(());
    }

    let output = args.output.unwrap_or_else(|| {
        export::default_output_path(&config.output_dir, scraped_at, args.format)
    });
    export::write_records(&output, args.format, &result.records)
        .with_context(|| format!("failed to write {}", output.display()))?;

    println!("{}", summary_line(&result, &output));
    Ok(())
}

fn summary_line(result: &RunResult, output: &Path) -> String {
    let on_promotion = result.records.iter().filter(|r| r.is_on_promotion()).count();
    let without_barcode = result.records.iter().filter(|r| !r.has_barcode()).count();
    format!(
        "done: {} records ({on_promotion} on promotion, {without_barcode} without barcode) \
         from {} pages ({} failed) → {}",
        result.len(),
        result.pages_requested,
        result.failed_pages.len(),
        output.display()
    )
}
