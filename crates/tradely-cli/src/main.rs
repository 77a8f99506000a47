//! Command-line front-end for the Tradely analysis service
//!
//! # Usage
//!
//! ```bash
//! # Point at the backend (defaults to http://localhost:8000)
//! export TRADELY_API_BASE="http://localhost:8000"
//!
//! # Stream an analysis and save it as PDF and JSON
//! tradely analyze AAPL --export pdf --export json --out ./exports
//!
//! # Page through ticker news interactively
//! tradely news AAPL --interactive
//! ```

mod render;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing::info;
use tradely::api::{DEFAULT_PERIOD, normalize_ticker};
use tradely::carousel::{KeyValueStore, MemoryStore};
use tradely::reveal::{EMPTY_MESSAGE, split_units};
use tradely::{
    AnalysisResult, BackendClient, Carousel, CarouselState, DirectorySink, ExportFormat,
    ExportPipeline, FeedIdentity, RevealEngine, RevealedUnit, TradelyConfig,
};
use tradely_utils::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "tradely")]
#[command(about = "Stock analysis, news, and exports from the Tradely backend", long_about = None)]
struct Cli {
    /// Backend base URL (overrides TRADELY_API_BASE)
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch an analysis, reveal it line by line, and optionally export it
    Analyze(AnalyzeArgs),
    /// Show a page of ticker or live news
    News(NewsArgs),
    /// Show company metadata and recent closing prices
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Ticker symbol, e.g. AAPL
    ticker: String,

    /// Export formats (txt, csv, json, pdf); repeatable
    #[arg(long = "export", short = 'e')]
    exports: Vec<ExportFormat>,

    /// Directory receiving exported files
    #[arg(long, default_value = ".")]
    out: PathBuf,

    /// Print the whole analysis at once
    #[arg(long)]
    no_reveal: bool,
}

#[derive(Args, Debug)]
struct NewsArgs {
    /// Ticker symbol; live market news when omitted
    ticker: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Page with n/p/<number>, reload with r, quit with q
    #[arg(long, short = 'i')]
    interactive: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Ticker symbol
    ticker: String,

    /// History period understood by the backend
    #[arg(long, default_value = DEFAULT_PERIOD)]
    period: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Pretty };
    tradely_utils::init_tracing_with("warn,tradely=info", format);

    let mut builder = TradelyConfig::builder().with_env();
    if let Some(base) = cli.api_base {
        builder = builder.api_base_url(base);
    }
    let config = builder.build()?;
    let client = Arc::new(BackendClient::new(&config)?);
    info!(api = %client.base_url(), "Starting tradely");

    match cli.command {
        Command::Analyze(args) => analyze(&client, &config, args).await,
        Command::News(args) => news(client, &config, args).await,
        Command::Info(args) => show_info(&client, args).await,
    }
}

async fn analyze(client: &BackendClient, config: &TradelyConfig, args: AnalyzeArgs) -> anyhow::Result<()> {
    let label = normalize_ticker(&args.ticker)?;
    println!("Analyzing {label}...\n");
    let analysis = client.fetch_analysis(&label).await?;

    if args.no_reveal {
        print_all(&analysis);
    } else {
        reveal(&analysis, config).await?;
    }

    if args.exports.is_empty() {
        return Ok(());
    }

    println!();
    let pipeline = ExportPipeline::new(DirectorySink::new(&args.out));
    for format in args.exports {
        match pipeline.export(format, &analysis, Some(label.as_str()))? {
            Some(path) => println!("Saved {}", path.display()),
            None => println!("Nothing to export as {format}"),
        }
    }
    Ok(())
}

fn print_all(analysis: &AnalysisResult) {
    let units = split_units(analysis.narrative().unwrap_or_default());
    if units.is_empty() {
        println!("{EMPTY_MESSAGE}");
    }
    for unit in units {
        println!("{}", render::format_unit(&RevealedUnit::new(unit)));
    }
}

/// Print units as the engine discloses them; Ctrl-C stops and resets
async fn reveal(analysis: &AnalysisResult, config: &TradelyConfig) -> anyhow::Result<()> {
    let mut engine = RevealEngine::from_config(config)?;
    let mut progress = engine.subscribe();

    let total = engine.start_analysis(analysis);
    if total == 0 {
        println!("{EMPTY_MESSAGE}");
        return Ok(());
    }

    let mut printed = 0;
    while printed < total {
        tokio::select! {
            changed = progress.changed() => {
                if changed.is_err() {
                    break;
                }
                let units = engine.visible_units();
                for unit in units.iter().skip(printed) {
                    println!("{}", render::format_unit(unit));
                }
                printed = printed.max(units.len());
            }
            _ = tokio::signal::ctrl_c() => {
                engine.stop();
                println!("\nReveal stopped.");
                break;
            }
        }
    }
    Ok(())
}

async fn news(client: Arc<BackendClient>, config: &TradelyConfig, args: NewsArgs) -> anyhow::Result<()> {
    let identity = match &args.ticker {
        Some(ticker) => FeedIdentity::Ticker(normalize_ticker(ticker)?),
        None => FeedIdentity::Live,
    };

    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let mut carousel = Carousel::from_config(identity, client, store, config);
    carousel.mount().await;
    carousel.jump_to(args.page.saturating_sub(1));
    print_page(&carousel);

    if !args.interactive || carousel.state() != &CarouselState::Ready {
        return Ok(());
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("[n]ext [p]rev [1-{}] [r]eload [q]uit > ", carousel.page_count());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        match input.trim() {
            "n" => carousel.next(),
            "p" => carousel.prev(),
            "r" => carousel.mount().await,
            "q" => break,
            other => match other.parse::<usize>() {
                Ok(page) if page > 0 => carousel.jump_to(page - 1),
                _ => {
                    println!("Unknown command: {other}");
                    continue;
                }
            },
        }
        print_page(&carousel);
    }
    Ok(())
}

fn print_page(carousel: &Carousel) {
    if let Some(message) = carousel.state().message() {
        println!("{message}");
        return;
    }

    println!("News: {}", carousel.identity());
    println!(
        "{}",
        render::articles_table(carousel.current_page(), carousel.start_index() + 1)
    );
    println!("{}", render::page_dots(&carousel.page_indicators()));
}

async fn show_info(client: &BackendClient, args: InfoArgs) -> anyhow::Result<()> {
    let metadata = client.fetch_metadata(&args.ticker).await?;
    println!("{metadata:#}");

    let points = client.fetch_historical(&args.ticker, &args.period).await?;
    if points.is_empty() {
        println!("No price history available");
    } else {
        println!("{}", render::prices_table(&points));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_exports() {
        let cli = Cli::parse_from([
            "tradely", "analyze", "aapl", "-e", "pdf", "--export", "json", "--out", "/tmp/x",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        assert_eq!(args.ticker, "aapl");
        assert_eq!(args.exports, [ExportFormat::Pdf, ExportFormat::Json]);
        assert_eq!(args.out, PathBuf::from("/tmp/x"));
        assert!(!args.no_reveal);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["tradely", "analyze", "AAPL", "-e", "xlsx"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_news_defaults_to_live() {
        let cli = Cli::parse_from(["tradely", "--api-base", "http://h:1", "news"]);
        assert_eq!(cli.api_base.as_deref(), Some("http://h:1"));
        let Command::News(args) = cli.command else {
            panic!("expected news");
        };
        assert_eq!(args.ticker, None);
        assert_eq!(args.page, 1);
    }
}
