use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::DataQualityIssue;
use crate::models::{Players, Score};

/// State of one side in a match snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamState {
    /// Upstream team ID (empty when the source has none)
    pub id: String,

    /// Full team name
    pub name: String,

    /// Abbreviated name (e.g. "ENG")
    pub short_name: String,

    /// Score text exactly as the source wrote it
    pub raw_score: String,

    /// Parsed score (zero when the side has not batted)
    pub score: Score,

    /// Runs per over, rounded to two decimals.
    ///
    /// Divides by the overs actually bowled (balls / 6), so 135 off 19.2 is
    /// 6.98. Pages that divide by the notation value would print 7.03.
    pub current_run_rate: f64,

    /// Out-of-domain values found while parsing `raw_score`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_quality: Vec<DataQualityIssue>,
}

/// Chase statistics for the side batting second
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChaseInfo {
    /// First-innings runs plus one
    pub target: u32,

    /// Runs still required; zero or negative once the chase is won
    pub runs_needed: i64,

    pub balls_remaining: u32,

    pub required_run_rate: f64,
}

/// Runs and balls added by the current pair since the last wicket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Partnership {
    pub runs: u32,
    pub balls: u32,
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.runs, self.balls)
    }
}

/// One side's share of the win probability, as displayed upstream
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamChance {
    /// Team label attached to the figure (usually the short name)
    pub team: String,

    /// Percentage text, including the `%` sign; empty when unknown
    pub percent: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WinProbability {
    pub team1: TeamChance,
    pub team2: TeamChance,
}

impl WinProbability {
    pub fn is_empty(&self) -> bool {
        self.team1.percent.is_empty() && self.team2.percent.is_empty()
    }
}

/// Scalar and list fields pulled from a match detail page.
///
/// Every field is always present; a field no strategy could resolve holds its
/// empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub title: String,
    pub status: String,
    /// Short name of the side at the crease, from the score summary
    pub batting_team: String,
    /// Score summary token such as `135/9 (19.2)`
    pub score_summary: String,
    /// Current run rate as printed on the page
    pub reported_run_rate: String,
    /// Required run rate as printed on the page
    pub reported_required_rate: String,
    pub players: Players,
    pub partnership: Partnership,
    pub recent_balls: String,
    pub last_wicket: String,
    pub win_probability: WinProbability,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_quality: Vec<DataQualityIssue>,
}

/// Point-in-time snapshot of a match. Built once per request, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    /// Upstream match ID
    pub id: String,

    pub name: String,

    pub short_name: String,

    /// Venue, "N/A" when the source has none
    pub venue: String,

    /// Status line (e.g. "SL need 46 runs in 25 balls")
    pub status: String,

    /// Sides in listing order, which is not necessarily innings order
    pub teams: Vec<TeamState>,

    /// Fewer than two sides were available
    pub incomplete: bool,

    /// Side at the crease per the detail page (empty without one)
    pub batting_team: String,

    /// Score summary as printed on the detail page, e.g. `135/9 (19.2)`
    pub score_summary: String,

    /// Current run rate as printed on the detail page
    pub reported_run_rate: String,

    /// Required run rate as printed on the detail page
    pub reported_required_rate: String,

    /// Present only while a chase is live
    pub chase_info: Option<ChaseInfo>,

    pub players: Players,

    pub partnership: Partnership,

    pub recent_balls: String,

    pub last_wicket: String,

    pub win_probability: WinProbability,

    /// Issues that are not tied to a single team
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_quality: Vec<DataQualityIssue>,

    /// When the snapshot was built
    pub fetched_at: DateTime<Utc>,
}
