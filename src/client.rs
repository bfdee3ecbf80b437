use ::scraper::Html;
use chrono::Utc;
use indexmap::IndexMap;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::config::ScraperConfig;
use crate::error::Result;
use crate::fetch::{fetch_with_retry, FetchOutcome, HttpTransport, RateLimiter, Transport};
use crate::model::{PlayerList, RosterSnapshot};
use crate::scraper::roster;
use crate::season::{season_of, season_url};

/// The main entry point for scraping a team's roster and recruiting pages.
///
/// `RosterScraper` owns the run configuration and a [`Transport`]; requests
/// are issued strictly one after another.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> roster_scraper::Result<()> {
/// use roster_scraper::{RosterScraper, ScraperConfig};
///
/// let scraper = RosterScraper::new(ScraperConfig::from_env()?)?;
/// let snapshot = scraper.run().await;
/// println!("Found {} players", snapshot.roster.len());
/// # Ok(())
/// # }
/// ```
pub struct RosterScraper<T = HttpTransport> {
    transport: T,
    config: ScraperConfig,
    rate_limiter: RateLimiter,
}

impl RosterScraper<HttpTransport> {
    /// Create a scraper that talks HTTP using the configured timeout and
    /// user agent.
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> RosterScraper<T> {
    /// Create a scraper on top of any [`Transport`].
    pub fn with_transport(config: ScraperConfig, transport: T) -> Self {
        let rate_limiter = RateLimiter::new(config.request_delay);
        Self {
            transport,
            config,
            rate_limiter,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of the current-season roster page.
    pub fn roster_url(&self) -> String {
        season_url(&self.config.base_url, &self.config.current_season)
    }

    /// URLs of the recruiting pages, in configured season order.
    pub fn recruiting_urls(&self) -> Vec<String> {
        self.config
            .future_seasons
            .iter()
            .map(|season| season_url(&self.config.base_url, season))
            .collect_vec()
    }

    /// Fetch and parse one roster page. Any failure is logged and yields an
    /// empty list.
    #[instrument(skip(self))]
    pub async fn fetch_players(&self, url: &str) -> PlayerList {
        let season = season_of(url);
        let policy = self.config.retry_policy();

        let body = match fetch_with_retry(&self.transport, url, &policy).await {
            FetchOutcome::Success(body) => body,
            FetchOutcome::Permanent(err) => {
                warn!(url, season = %season, error = %err, "error fetching page");
                return Vec::new();
            }
            FetchOutcome::Exhausted { attempts, last } => {
                warn!(url, season = %season, attempts, error = %last, "giving up on page");
                return Vec::new();
            }
        };

        let document = Html::parse_document(&body);
        match roster::parse_roster(&document, &self.config.site_origin) {
            Ok(players) => {
                debug!(url, season = %season, count = players.len(), "parsed roster page");
                players
            }
            Err(err) => {
                warn!(url, season = %season, error = %err, "error parsing page");
                Vec::new()
            }
        }
    }

    /// Scrape the current-season roster.
    pub async fn scrape_roster(&self) -> PlayerList {
        let url = self.roster_url();
        info!(url = %url, "scraping main roster");
        self.fetch_players(&url).await
    }

    /// Scrape every configured future season in order, pausing after each
    /// request. Every season gets an entry, even when nothing was found.
    pub async fn scrape_recruits(&self) -> IndexMap<String, PlayerList> {
        let mut recruits = IndexMap::new();
        for url in self.recruiting_urls() {
            let season = season_of(&url);
            info!(url = %url, season = %season, "scraping recruits");

            let players = self.fetch_players(&url).await;
            if players.is_empty() {
                info!(url = %url, season = %season, "no recruits found or page could not be fetched");
            }
            recruits.insert(season, players);

            self.rate_limiter.delay().await;
        }
        recruits
    }

    /// Scrape the roster and all recruiting seasons into a fresh snapshot.
    #[instrument(skip(self), fields(season = %self.config.current_season))]
    pub async fn run(&self) -> RosterSnapshot {
        let roster = self.scrape_roster().await;
        let recruiting = self.scrape_recruits().await;

        let snapshot = RosterSnapshot {
            last_updated: Utc::now(),
            roster,
            recruiting,
        };
        if snapshot.is_empty() {
            warn!("no roster or recruiting data was scraped, check selectors and site structure");
        }
        snapshot
    }
}
