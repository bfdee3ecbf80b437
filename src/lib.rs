//! Scrapes a college hockey team's roster and recruiting pages from
//! eliteprospects.com into a [`RosterSnapshot`].

pub use client::RosterScraper;
pub use config::ScraperConfig;
pub use error::{Result, RosterError};
pub use model::*;
pub use output::write_snapshot;
pub use season::{season_of, season_url, UNKNOWN_SEASON};

mod client;
pub mod config;
mod error;
pub mod fetch;
mod model;
pub mod output;
pub mod schedule;
pub(crate) mod scraper;
pub mod season;

/// Scrape once with `config` and return the snapshot. Unreachable pages and
/// malformed rows degrade to empty data rather than failing the run.
pub async fn run(config: &ScraperConfig) -> Result<RosterSnapshot> {
    let scraper = RosterScraper::new(config.clone())?;
    Ok(scraper.run().await)
}
