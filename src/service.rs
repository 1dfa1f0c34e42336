use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregator::{EventInput, MatchAggregator, TeamInput};
use crate::api::{CricbuzzClient, EspnClient};
use crate::config::{Config, RateConfig};
use crate::error::ServiceError;
use crate::extract::{match_id_from_locator, DetailExtractor, PageSnapshot};
use crate::indexer::MatchIndex;
use crate::models::{MatchIndexEntry, MatchRecord};
use crate::parse::{innings_length, parse_score};
use crate::stats::{compute_rates, RateSummary};

/// A listing entry together with its detail snapshot, when the page could be read
#[derive(Debug, Clone, Serialize)]
pub struct MatchLookup {
    #[serde(flatten)]
    pub entry: MatchIndexEntry,

    /// `None` when the detail page could not be fetched
    pub details: Option<MatchRecord>,
}

/// Entry points used by the HTTP layer. Every call works on freshly fetched
/// data and keeps nothing between calls.
pub struct LiveScoreService {
    cricbuzz: CricbuzzClient,
    espn: EspnClient,
    extractor: DetailExtractor,
    aggregator: MatchAggregator,
}

impl LiveScoreService {
    pub fn new(cricbuzz: CricbuzzClient, espn: EspnClient, rates: RateConfig) -> Self {
        Self {
            cricbuzz,
            espn,
            extractor: DetailExtractor::new(),
            aggregator: MatchAggregator::new(rates),
        }
    }

    /// Build clients from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let cricbuzz = CricbuzzClient::new(
            &config.cricbuzz_base_url,
            &config.user_agent,
            config.http_timeout,
        )?;
        let espn = EspnClient::new(
            &config.espn_scoreboard_url,
            &config.espn_cricket_sport_id,
            config.http_timeout,
        )?;

        Ok(Self::new(cricbuzz, espn, config.rate_config()))
    }

    /// Number the matches on the current listing page
    pub async fn list_matches(&self) -> Result<Vec<MatchIndexEntry>, ServiceError> {
        let candidates = self.cricbuzz.fetch_listing().await?;
        Ok(MatchIndex::from_candidates(candidates).into_entries())
    }

    /// Resolve an ordinal (or locator) against a fresh listing and read its page.
    ///
    /// The ordinal is matched against the listing fetched by this call, not
    /// whatever listing the caller saw earlier.
    pub async fn get_match(&self, query: &str) -> Result<MatchLookup, ServiceError> {
        let candidates = self.cricbuzz.fetch_listing().await?;
        let index = MatchIndex::from_candidates(candidates);
        let entry = index.resolve_any(query)?.clone();

        info!("Resolved {:?} to {} ({})", query, entry.name, entry.locator);

        let details = match self.cricbuzz.fetch_match_page(&entry.locator).await {
            Ok(page) => Some(self.detail_record(&entry, &page)),
            Err(e) => {
                warn!("Details not available for {}: {:#}", entry.locator, e);
                None
            }
        };

        Ok(MatchLookup { entry, details })
    }

    /// In-progress matches from the scoreboard feed
    pub async fn live_scoreboard(&self) -> Result<Vec<MatchRecord>, ServiceError> {
        let events = self.espn.fetch_live_events().await?;
        Ok(events
            .into_iter()
            .map(|event| self.aggregator.aggregate(event))
            .collect())
    }

    /// Rates for a free-standing score string
    pub fn compute_rates(
        &self,
        score_text: &str,
        target: Option<u32>,
        total_overs: Option<u32>,
    ) -> RateSummary {
        let score = parse_score(score_text);
        let total_overs = total_overs.or_else(|| innings_length(score_text));
        compute_rates(&score, target, total_overs, self.aggregator.rates())
    }

    /// Snapshot of a detail page
    pub fn detail_record(&self, entry: &MatchIndexEntry, page: &PageSnapshot) -> MatchRecord {
        detail_record(&self.extractor, &self.aggregator, entry, page)
    }
}

/// Combine a listing entry and its detail page into a record.
///
/// The page only shows the side at the crease, so the record carries at most
/// one team and is flagged incomplete.
pub fn detail_record(
    extractor: &DetailExtractor,
    aggregator: &MatchAggregator,
    entry: &MatchIndexEntry,
    page: &PageSnapshot,
) -> MatchRecord {
    let details = extractor.extract(page);

    let teams = if details.score_summary.is_empty() {
        Vec::new()
    } else {
        vec![TeamInput {
            id: String::new(),
            name: details.batting_team.clone(),
            short_name: details.batting_team.clone(),
            score_text: details.score_summary.clone(),
        }]
    };

    let name = if details.title.is_empty() {
        entry.name.clone()
    } else {
        details.title.clone()
    };

    let event = EventInput {
        id: match_id_from_locator(&entry.locator)
            .unwrap_or(&entry.locator)
            .to_string(),
        name,
        short_name: String::new(),
        venue: None,
        status: String::new(),
        teams,
    };

    aggregator.aggregate_with_details(event, details)
}
