//! breedview CLI
//!
//! Launches the interactive catalog viewer, or fetches and searches the
//! breed listing from the command line.

use breedview::{
    logging, AppConfig, BreedRecord, BreedSource, BreedViewError, Catalog, Command,
    HttpBreedSource, Rating,
};
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// breedview - browse the breed catalog from your terminal
///
/// Pages are fetched on demand as you scroll; typing filters the
/// breeds already loaded.
#[derive(Parser)]
#[command(name = "breedview")]
#[command(author = "breedview Contributors")]
#[command(version)]
#[command(about = "Terminal breed catalog viewer", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/breedview/config.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the breed listing endpoint
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Override the log file location
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive viewer (default)
    Browse,

    /// Fetch pages and print the breeds
    Fetch {
        /// Number of pages to fetch (capped at the page ceiling)
        #[arg(short, long)]
        pages: Option<u32>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Fetch pages, then filter them like the viewer's search box
    Search {
        /// Text to match against every field, case-insensitively
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Number of pages to search (capped at the page ceiling)
        #[arg(short, long)]
        pages: Option<u32>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> breedview::Result<()> {
    let mut config = AppConfig::discover(cli.config.as_deref())?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(log_file) = cli.log_file {
        config.log_path = Some(log_file);
    }

    match logging::init(&config.log_file())? {
        Some(path) => {
            logging::info("MAIN", &format!("breedview {} starting up", breedview::VERSION));
            logging::info("MAIN", &format!("Logging to {}", path.display()));
        }
        None => eprintln!(
            "{} could not open {} or {}, running without a log file",
            style("warning:").yellow().bold(),
            config.log_file().display(),
            logging::fallback_log_path().display()
        ),
    }
    logging::info("MAIN", &format!("Endpoint: {}", config.endpoint));

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => cmd_browse(&config),
        Commands::Fetch { pages, output } => cmd_fetch(&config, pages, &output),
        Commands::Search { query, pages } => cmd_search(&config, &query, pages),
    }
}

/// Interactive viewer
fn cmd_browse(config: &AppConfig) -> breedview::Result<()> {
    if !std::io::stdout().is_terminal() {
        return Err(BreedViewError::Terminal(
            "the viewer requires an interactive terminal".to_string(),
        ));
    }
    let source: Arc<dyn BreedSource> = Arc::new(HttpBreedSource::new(config)?);
    breedview::tui::run(source, config.limits())
}

/// Fetch command implementation
fn cmd_fetch(config: &AppConfig, pages: Option<u32>, output: &str) -> breedview::Result<()> {
    let source = HttpBreedSource::new(config)?;
    let mut catalog = Catalog::new(config.limits());
    let start = Instant::now();

    let fetched = fetch_pages(&source, &mut catalog, pages, output != "json")?;

    if output == "json" {
        println!("{}", serde_json::to_string_pretty(catalog.records())?);
        return Ok(());
    }

    println!();
    println!(
        "{} Fetched {} breeds from {} pages in {}",
        style("✓").green().bold(),
        style(catalog.records().len()).cyan(),
        fetched,
        style(HumanDuration(start.elapsed())).cyan()
    );
    println!();
    for (i, record) in catalog.records().iter().enumerate() {
        print_record(i, record);
    }

    Ok(())
}

/// Search command implementation
fn cmd_search(config: &AppConfig, query: &str, pages: Option<u32>) -> breedview::Result<()> {
    let source = HttpBreedSource::new(config)?;
    let mut catalog = Catalog::new(config.limits());

    println!(
        "{} Searching for '{}'",
        style("→").cyan().bold(),
        style(query.trim()).yellow()
    );

    fetch_pages(&source, &mut catalog, pages, true)?;
    catalog.on_query_change(query);

    println!();
    if catalog.query().is_empty() {
        println!("Empty query: nothing to match.");
        return Ok(());
    }
    if catalog.filtered_len() == 0 {
        println!(
            "No matches among {} breeds.",
            style(catalog.records().len()).cyan()
        );
        return Ok(());
    }

    let shown = catalog.visible();
    println!(
        "Found {} matches, showing {}:",
        style(catalog.filtered_len()).green(),
        shown.len()
    );
    println!();
    for (i, record) in shown.iter().enumerate() {
        print_record(i, record);
    }

    Ok(())
}

/// Drive the catalog's page cursor until `limit` pages, the ceiling or a failure.
///
/// Returns the number of pages applied. A recoverable failure ends the run
/// early with the pages fetched so far; any other error is returned.
fn fetch_pages(
    source: &dyn BreedSource,
    catalog: &mut Catalog,
    limit: Option<u32>,
    show_progress: bool,
) -> breedview::Result<u32> {
    let ceiling = catalog.limits().page_ceiling;
    let wanted = limit.unwrap_or(ceiling).min(ceiling);

    let progress = if show_progress {
        let pb = ProgressBar::new(wanted as u64);
        if let Ok(progress_style) = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] page {pos}/{len} {msg}")
        {
            pb.set_style(progress_style.progress_chars("=> "));
        }
        Some(pb)
    } else {
        None
    };

    let mut fetched = 0;
    while fetched < wanted {
        let Some(Command::FetchPage { page, limit }) = catalog.load_next_page() else {
            break;
        };
        match source.fetch_page(page, limit) {
            Ok(items) => {
                catalog.apply_page(page, &items);
                fetched += 1;
                if let Some(pb) = &progress {
                    pb.set_position(fetched as u64);
                    pb.set_message(format!("{} breeds", catalog.records().len()));
                }
            }
            Err(e) => {
                catalog.fail_page(page, &e);
                if !e.is_recoverable() {
                    if let Some(pb) = progress {
                        pb.finish_and_clear();
                    }
                    return Err(e);
                }
                if let Some(pb) = &progress {
                    pb.println(format!(
                        "{} page {}: {}",
                        style("warning:").yellow().bold(),
                        page,
                        e
                    ));
                }
                break;
            }
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(fetched)
}

fn print_record(index: usize, record: &BreedRecord) {
    println!(
        "  {} {} {}",
        style(format!("{:3}.", index + 1)).dim(),
        style(&record.name).cyan().bold(),
        style(format!("({})", record.origin)).dim()
    );
    for (label, value) in record.scores() {
        let stars = Rating::new(value)
            .map(|rating| rating.to_string())
            .unwrap_or_else(|_| "n/a".to_string());
        println!("      {} {}", style(format!("{:<18}", label)).dim(), style(stars).yellow());
    }
}
