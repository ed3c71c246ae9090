//! zot2nsf - NSF collaborator list from Zotero
//!
//! Builds the collaborators-and-other-affiliations list from the "My
//! Publications" section of a Zotero library.
//!
//! The first run produces a CSV with empty institutions, which have to be
//! filled in by hand. Later runs pick up the previous CSV (or `--input_csv`)
//! and carry those institutions forward wherever the name still matches.
//!
//! ## Usage
//!
//! ```bash
//! export ZOTERO_USER_ID=1234567 ZOTERO_API_KEY=...
//! zot2nsf --year 2022 --input_csv collabs_20250101.csv
//! ```

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};
use zoter::{
    cache::{PublicationCache, DEFAULT_CACHE_FILE},
    collaborators,
    config::ZoteroConfig,
    report,
    zotero::ZoteroClient,
};

/// Generate and update NSF collaborator lists from Zotero
#[derive(Parser)]
#[command(name = "zot2nsf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Year from which to update. Defaults to current year - 4 (the usual NSF 48-month window)
    #[arg(short, long)]
    year: Option<i32>,

    /// Prior CSV with institutions. Defaults to the latest collabs_*.csv here
    #[arg(short, long = "input_csv", alias = "input-csv")]
    input_csv: Option<PathBuf>,

    /// Publication cache file
    #[arg(long, default_value = DEFAULT_CACHE_FILE)]
    cache_file: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .init();

    run(cli).await
}

async fn run(cli: Cli) -> Result<()> {
    let today = Local::now().date_naive();
    let start_year = cli.year.unwrap_or(today.year() - 4);

    let cache = PublicationCache::new(&cli.cache_file);
    let items = cache
        .get_publications(|| async {
            println!("Loading publications via Zotero API. This may take a few mins...");
            let config = ZoteroConfig::from_env()?;
            let client = ZoteroClient::new(config)?;
            client.fetch_all_publications().await
        })
        .await
        .context("Failed to load publications")?;
    info!("{} items loaded!", items.len());

    let authors = collaborators::extract(&items, start_year)?;

    let (input_path, institutions) = report::load_prior(cli.input_csv.as_deref(), Path::new("."))
        .context("Failed to read prior collaborators")?;
    let rows = report::merge(&authors, &institutions);

    let new_fname = report::report_file_name(today);
    let output = Path::new(&new_fname);
    report::ensure_not_input(output, input_path.as_deref())?;
    report::write_report(output, &rows)
        .with_context(|| format!("Failed to write {}", new_fname))?;

    println!(
        "{} collaborators written to {} with start year = {}.",
        rows.len(),
        new_fname,
        start_year
    );
    Ok(())
}
