use chrono::Utc;
use tracing::{debug, warn};

use crate::config::RateConfig;
use crate::models::{ChaseInfo, MatchDetails, MatchRecord, TeamState};
use crate::parse::{innings_length, read_score};
use crate::stats::{current_run_rate, required_run_rate};

/// Which listed side batted first and which is chasing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InningsOrder {
    pub batted_first: usize,
    pub chasing: usize,
}

/// Decides innings order for a two-team listing.
///
/// Sources rarely carry an explicit innings marker, so this is a policy
/// rather than a fact about the data.
pub trait InningsPolicy: Send + Sync {
    fn innings_order(&self, teams: &[TeamState]) -> Option<InningsOrder>;
}

/// Positional convention of the scoreboard feed: the second listed team
/// batted first and the first listed team is chasing.
///
/// Nothing in the feed confirms this. If upstream changes its listing order
/// the chase figures silently describe the wrong side.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListingOrderPolicy;

impl InningsPolicy for ListingOrderPolicy {
    fn innings_order(&self, teams: &[TeamState]) -> Option<InningsOrder> {
        (teams.len() == 2).then_some(InningsOrder {
            batted_first: 1,
            chasing: 0,
        })
    }
}

/// One side as handed over by a source, before parsing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamInput {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub score_text: String,
}

/// One event as handed over by a source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventInput {
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub venue: Option<String>,
    pub status: String,
    pub teams: Vec<TeamInput>,
}

/// Builds match records from raw per-team score strings and extracted fields
pub struct MatchAggregator {
    policy: Box<dyn InningsPolicy>,
    rates: RateConfig,
}

impl MatchAggregator {
    pub fn new(rates: RateConfig) -> Self {
        Self::with_policy(rates, Box::new(ListingOrderPolicy))
    }

    pub fn with_policy(rates: RateConfig, policy: Box<dyn InningsPolicy>) -> Self {
        Self { policy, rates }
    }

    pub fn rates(&self) -> &RateConfig {
        &self.rates
    }

    /// Parse one side's score text into a fresh team state
    pub fn team_state(&self, team: TeamInput) -> TeamState {
        let reading = read_score(&team.score_text);
        TeamState {
            id: team.id,
            name: team.name,
            short_name: team.short_name,
            current_run_rate: current_run_rate(reading.score.runs, reading.score.overs),
            raw_score: team.score_text,
            score: reading.score,
            data_quality: reading.issues,
        }
    }

    /// Chase figures, present only with two sides, a first-innings total and
    /// some second-innings overs bowled
    pub fn chase_info(&self, teams: &[TeamState]) -> Option<ChaseInfo> {
        let order = self.policy.innings_order(teams)?;
        let first = teams.get(order.batted_first)?;
        let second = teams.get(order.chasing)?;

        if first.score.runs == 0 || second.score.overs.is_zero() {
            return None;
        }

        let total_overs = innings_length(&second.raw_score)
            .or_else(|| innings_length(&first.raw_score))
            .unwrap_or(self.rates.default_total_overs);

        let Some(target) = first.score.runs.checked_add(1) else {
            warn!("First-innings total {} cannot set a target", first.score.runs);
            return None;
        };

        required_run_rate(
            target,
            second.score.runs,
            second.score.overs,
            total_overs,
        )
    }

    /// Record for an event with no detail page
    pub fn aggregate(&self, event: EventInput) -> MatchRecord {
        self.aggregate_with_details(event, MatchDetails::default())
    }

    /// Record combining event-level scores with fields from a detail page
    pub fn aggregate_with_details(&self, event: EventInput, details: MatchDetails) -> MatchRecord {
        let teams: Vec<TeamState> = event
            .teams
            .into_iter()
            .map(|team| self.team_state(team))
            .collect();
        let chase_info = self.chase_info(&teams);
        let incomplete = teams.len() < 2;

        debug!(
            "Aggregated match {} ({} teams, chase: {})",
            event.id,
            teams.len(),
            chase_info.is_some()
        );

        MatchRecord {
            id: event.id,
            name: event.name,
            short_name: event.short_name,
            venue: event
                .venue
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            status: if event.status.is_empty() {
                details.status
            } else {
                event.status
            },
            teams,
            incomplete,
            batting_team: details.batting_team,
            score_summary: details.score_summary,
            reported_run_rate: details.reported_run_rate,
            reported_required_rate: details.reported_required_rate,
            chase_info,
            players: details.players,
            partnership: details.partnership,
            recent_balls: details.recent_balls,
            last_wicket: details.last_wicket,
            win_probability: details.win_probability,
            data_quality: details.data_quality,
            fetched_at: Utc::now(),
        }
    }
}
