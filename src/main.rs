use anyhow::{Context, Result};
use chrono::{Local, NaiveTime};
use clap::{Parser, Subcommand};
use roster_scraper::schedule::{parse_time_of_day, run_and_save, until_next_run};
use roster_scraper::{write_snapshot, RosterScraper, ScraperConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scrape the team roster and recruiting classes into a JSON snapshot.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape once, save the snapshot and print a summary (default).
    Once,
    /// Scrape now, then again every day at the given local time.
    Daily {
        /// Time of day to run, as HH:MM.
        #[arg(long, default_value = "02:00", value_parser = parse_time_of_day)]
        at: NaiveTime,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ScraperConfig::from_env().context("invalid scraper configuration")?;
    let scraper = RosterScraper::new(config).context("failed to set up http client")?;

    match cli.command.unwrap_or(Command::Once) {
        Command::Once => scrape_once(&scraper).await,
        Command::Daily { at } => scrape_daily(&scraper, at).await,
    }
}

async fn scrape_once(scraper: &RosterScraper) -> Result<()> {
    info!("starting roster and recruiting scrape");
    let snapshot = scraper.run().await;

    let path = &scraper.config().output_path;
    write_snapshot(path, &snapshot)
        .with_context(|| format!("failed to save snapshot to {}", path.display()))?;

    println!("Scraping complete. Data saved to {}", path.display());
    println!("{}", snapshot.summary());
    Ok(())
}

async fn scrape_daily(scraper: &RosterScraper, at: NaiveTime) -> Result<()> {
    loop {
        info!("running scheduled update");
        run_and_save(scraper).await;

        let wait = until_next_run(Local::now().naive_local(), at);
        info!(next_run_in_secs = wait.as_secs(), "waiting for next scheduled run");
        tokio::time::sleep(wait).await;
    }
}
