// src/main.rs

use anyhow::Result;
use clap::Parser;
use pydocs_scraper::{
    fetch::{CachedSession, ResponseCache},
    logging, output, Config, Mode, OutputFormat, Outcome,
};
use std::path::PathBuf;
use tracing::{error, info};

/// Scraper for the Python documentation and PEP index.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Scraping mode
    #[arg(value_enum)]
    mode: Mode,

    /// Clear the HTTP response cache before running
    #[arg(short, long)]
    clear_cache: bool,

    /// Additional output: aligned table or CSV file
    #[arg(short, long, value_enum)]
    output: Option<OutputFormat>,

    /// Directory holding logs/, downloads/, results/ and cache/
    #[arg(long, env = "PYDOCS_SCRAPER_DIR", default_value = ".")]
    base_dir: PathBuf,
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let session = CachedSession::new(ResponseCache::new(config.cache_dir())?)?;
    if args.clear_cache {
        session.clear_cache()?;
    }

    match args.mode.run(&session, config)? {
        Outcome::Table(results) => output::render(&results, args.output, args.mode, config)?,
        Outcome::Downloaded(_) | Outcome::Empty => {}
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::new(&args.base_dir)?;
    logging::init(&config)?;
    info!(mode = %args.mode, "parser started");

    if let Err(e) = run(&args, &config) {
        error!("{} failed: {:#}", args.mode, e);
        return Err(e);
    }

    info!("parser finished");
    Ok(())
}
