use std::time::Duration;

use chrono::{Days, NaiveDateTime, NaiveTime};
use tracing::{error, info, instrument};

use crate::client::RosterScraper;
use crate::fetch::Transport;
use crate::output::write_snapshot;

/// The first time-of-day `at` strictly after `now`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        now.date()
            .checked_add_days(Days::new(1))
            .map(|tomorrow| tomorrow.and_time(at))
            .unwrap_or(today)
    }
}

/// How long to sleep from `now` until the next run at `at`.
pub fn until_next_run(now: NaiveDateTime, at: NaiveTime) -> Duration {
    (next_run_after(now, at) - now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// One scheduled update: scrape, then save the snapshot to the configured
/// output path. A failed write is logged and reported as `false` so the
/// schedule keeps running.
#[instrument(skip_all)]
pub async fn run_and_save<T: Transport>(scraper: &RosterScraper<T>) -> bool {
    let snapshot = scraper.run().await;
    let path = &scraper.config().output_path;
    match write_snapshot(path, &snapshot) {
        Ok(()) => {
            info!(summary = %snapshot.summary(), "update complete");
            true
        }
        Err(err) => {
            error!(error = %err, "failed to save snapshot");
            false
        }
    }
}

/// Parse an `HH:MM` time of day.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
}
