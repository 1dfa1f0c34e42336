use serde::Serialize;

use crate::stats::Overs;

/// Batter currently at the crease
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Batsman {
    pub name: String,
    pub runs: u32,
    pub balls: u32,
    pub fours: u32,
    pub sixes: u32,
    /// On strike (marked with `*` upstream)
    pub striker: bool,
}

/// Bowler currently in action
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bowler {
    pub name: String,
    pub overs: Overs,
    pub runs_conceded: u32,
    pub wickets: u32,
    pub economy: f64,
}

/// Current players for one snapshot, each list deduplicated by name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Players {
    pub batsmen: Vec<Batsman>,
    pub bowlers: Vec<Bowler>,
}
