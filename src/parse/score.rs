use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::error::DataQualityIssue;
use crate::models::Score;
use crate::stats::Overs;

const MAX_WICKETS: u32 = 10;

static RUNS_WICKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)/(\d+)").expect("valid regex"));
static OVERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\s*([\d.]+)").expect("valid regex"));
static INNINGS_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(\s*[\d.]+\s*/\s*(\d+)\s*ov").expect("valid regex"));

/// Result of reading one score string.
///
/// `score` is always usable: missing or out-of-domain parts are zero. Any part
/// that was present but out of domain is listed in `issues`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreReading {
    pub score: Score,
    pub issues: Vec<DataQualityIssue>,
}

/// Read a condensed score string such as `ENG 135/9 (19.2)`.
///
/// Runs/wickets come from the first `R/W` token, overs from the first number
/// after an opening parenthesis. Either may be missing (a side that has not
/// batted yet) and defaults to zero.
pub fn read_score(text: &str) -> ScoreReading {
    let mut reading = ScoreReading::default();

    if let Some(caps) = RUNS_WICKETS.captures(text) {
        match runs_and_wickets(&caps[1], &caps[2]) {
            Ok((runs, wickets)) => {
                reading.score.runs = runs;
                reading.score.wickets = wickets;
            }
            Err(issue) => reading.issues.push(issue),
        }
    }

    if let Some(caps) = OVERS.captures(text) {
        match caps[1].parse::<Overs>() {
            Ok(overs) => reading.score.overs = overs,
            Err(issue) => reading.issues.push(issue),
        }
    }

    for issue in &reading.issues {
        warn!("Score {:?}: {}", text, issue);
    }

    reading
}

/// Like [`read_score`] but drops the data-quality findings
pub fn parse_score(text: &str) -> Score {
    read_score(text).score
}

/// Innings length when the score carries it, e.g. `162/4 (18.3/20 ov)` -> 20
pub fn innings_length(text: &str) -> Option<u32> {
    INNINGS_LENGTH
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
        .filter(|overs| *overs > 0)
}

fn runs_and_wickets(runs: &str, wickets: &str) -> Result<(u32, u32), DataQualityIssue> {
    let runs: u32 = runs
        .parse()
        .map_err(|_| DataQualityIssue::NumberOutOfRange {
            raw: runs.to_string(),
        })?;
    let wickets: u32 = wickets
        .parse()
        .map_err(|_| DataQualityIssue::NumberOutOfRange {
            raw: wickets.to_string(),
        })?;

    if wickets > MAX_WICKETS {
        return Err(DataQualityIssue::WicketsOutOfRange {
            raw: format!("{}/{}", runs, wickets),
            wickets,
        });
    }

    Ok((runs, wickets))
}
