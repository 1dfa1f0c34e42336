use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::DataQualityIssue;
use crate::extract::chain::{
    global_pattern, label_fragment, label_pattern, label_text, marker_attr, marker_text,
    ExtractionChain,
};
use crate::extract::page::{Marker, PageSnapshot};
use crate::models::{
    Batsman, Bowler, MatchDetails, Partnership, Players, TeamChance, WinProbability,
};
use crate::parse::{collect_lines, parse_batsmen, parse_bowlers, PlayerLines};

/// At most two batters are at the crease
const MAX_BATSMEN: usize = 2;
/// One bowler is in action at a time
const MAX_BOWLERS: usize = 1;

const STATUS_CLASSES: &[&str] = &[
    "cb-text-live",
    "cb-text-complete",
    "cb-text-preview",
    "text-cbLive",
];

static TEAM_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Za-z][A-Za-z0-9]{1,9})\s+(\d+/\d+\s*\(\s*\d+(?:\.\d+)?\s*\))")
        .expect("valid regex")
});
static MATCHUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Z][A-Za-z.']*(?: [A-Z][A-Za-z.']*)* vs [A-Z][A-Za-z.']*(?: [A-Z][A-Za-z.']*)*")
        .expect("valid regex")
});
static CRR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CRR\s*:?\s*(\d+(?:\.\d+)?)").expect("valid regex"));
static RRR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:RRR|REQ)\s*:?\s*(\d+(?:\.\d+)?)").expect("valid regex"));
static PARTNERSHIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:P'SHIP|Partnership)\s*:?\s*(\d+)\s*\(\s*(\d+)\s*\)").expect("valid regex")
});
static RECENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Recent\s*:\s*((?:(?:\d+|W|Wd|Nb|Lb|B|\|)\s*)+)").expect("valid regex")
});
static LAST_WICKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Last Wkt\s*:\s*(.+?\d+\s*\(\s*\d+\s*\))").expect("valid regex"));
static PERCENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,3}(?:\.\d+)?)\s*%").expect("valid regex"));
static TEAM_PERCENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b([A-Z]{2,5})\s+(\d{1,3}(?:\.\d+)?)\s*%").expect("valid regex")
});

/// Extraction chains for every field of a match detail page.
///
/// Built once and shared; resolving holds no state between pages.
pub struct DetailExtractor {
    title: ExtractionChain<String>,
    status: ExtractionChain<String>,
    score_summary: ExtractionChain<String>,
    run_rate: ExtractionChain<String>,
    required_rate: ExtractionChain<String>,
    partnership: ExtractionChain<Partnership>,
    recent_balls: ExtractionChain<String>,
    last_wicket: ExtractionChain<String>,
    win_probability: ExtractionChain<WinProbability>,
    batsmen: ExtractionChain<PlayerLines<Batsman>>,
    bowlers: ExtractionChain<PlayerLines<Bowler>>,
}

impl DetailExtractor {
    pub fn new() -> Self {
        let mut status = ExtractionChain::new("status");
        for class in STATUS_CLASSES.iter().copied() {
            status = status.then("status class", marker_text(Marker::Class(class)));
        }
        let status = status
            .then("toss label", label_fragment("opt to"))
            .then("chase label", label_fragment(" need "))
            .then("result label", label_fragment("won by"));

        Self {
            title: ExtractionChain::new("title")
                .then("h1", marker_text(Marker::Tag("h1")))
                .then(
                    "og:title",
                    marker_attr(Marker::TagAttr("meta", "property", "og:title"), "content"),
                )
                .then("title tag", marker_text(Marker::Tag("title")))
                .then("global matchup", global_pattern(&MATCHUP, 0)),

            status,

            score_summary: ExtractionChain::new("score_summary")
                .then("meta description", |page: &PageSnapshot| {
                    page.by_marker(Marker::TagAttr("meta", "name", "description"))
                        .filter_map(|f| f.attr("content"))
                        .filter(|c| c.contains("Follow"))
                        .find_map(team_score)
                })
                .then("score banner", |page: &PageSnapshot| {
                    page.by_marker(Marker::Class("cb-font-20"))
                        .find_map(|f| team_score(&f.text))
                })
                .then("global score", |page: &PageSnapshot| team_score(page.text())),

            run_rate: ExtractionChain::new("crr")
                .then("CRR label", label_pattern("CRR", &CRR, 1))
                .then("global CRR", global_pattern(&CRR, 1)),

            required_rate: ExtractionChain::new("rrr")
                .then("RRR label", label_pattern("RRR", &RRR, 1))
                .then("REQ label", label_pattern("REQ", &RRR, 1))
                .then("global RRR", global_pattern(&RRR, 1)),

            partnership: ExtractionChain::new("partnership")
                .then("P'SHIP label", |page: &PageSnapshot| {
                    page.innermost_containing("P'SHIP", None)
                        .and_then(|f| partnership(&f.text))
                })
                .then("global partnership", |page: &PageSnapshot| {
                    partnership(page.text())
                }),

            recent_balls: ExtractionChain::new("recent_balls")
                .then("recent paragraph", label_text("Recent :", Some("p")))
                .then("recent label", label_text("Recent :", None))
                .then("global recent", global_pattern(&RECENT, 1)),

            last_wicket: ExtractionChain::new("last_wicket")
                .then("last wicket label", label_text("Last Wkt:", None))
                .then("global last wicket", global_pattern(&LAST_WICKET, 1)),

            win_probability: ExtractionChain::new("win_probability")
                .then("titled percentages", titled_win_probability)
                .then("global percentages", |page: &PageSnapshot| {
                    global_win_probability(page.text())
                }),

            batsmen: ExtractionChain::new("batsmen")
                .then("batsman columns", |page: &PageSnapshot| {
                    Some(collect_lines(
                        page.by_marker(Marker::Class("cb-col-50"))
                            .filter(|f| f.text.contains("(r)") && f.text.contains("(b)"))
                            .map(|f| f.text.as_str()),
                        parse_batsmen,
                    ))
                })
                .then("batsman fragments", |page: &PageSnapshot| {
                    Some(collect_lines(
                        page.containing(&["(r)", "(b)"]).map(|f| f.text.as_str()),
                        parse_batsmen,
                    ))
                })
                .then("global batsmen", |page: &PageSnapshot| {
                    Some(collect_lines([page.text()], parse_batsmen))
                }),

            bowlers: ExtractionChain::new("bowlers")
                .then("bowler columns", |page: &PageSnapshot| {
                    Some(collect_lines(
                        page.by_marker(Marker::Class("cb-col-50"))
                            .filter(|f| f.text.contains("(O)") && f.text.contains("(R)"))
                            .map(|f| f.text.as_str()),
                        parse_bowlers,
                    ))
                })
                .then("bowler fragments", |page: &PageSnapshot| {
                    Some(collect_lines(
                        page.containing(&["(O)", "(R)"]).map(|f| f.text.as_str()),
                        parse_bowlers,
                    ))
                })
                .then("global bowlers", |page: &PageSnapshot| {
                    Some(collect_lines([page.text()], parse_bowlers))
                }),
        }
    }

    /// Resolve every field. Fields no strategy can find hold their empty value.
    pub fn extract(&self, page: &PageSnapshot) -> MatchDetails {
        let summary = self.score_summary.resolve(page).value;
        let (batting_team, score_summary) = split_team_score(&summary);

        let batsmen = self.batsmen.resolve(page).value;
        let bowlers = self.bowlers.resolve(page).value;

        let mut data_quality: Vec<DataQualityIssue> = Vec::new();
        data_quality.extend(batsmen.issues);
        data_quality.extend(bowlers.issues);
        if let Some(issue) = cardinality("batsmen", batsmen.players.len(), MAX_BATSMEN) {
            data_quality.push(issue);
        }
        if let Some(issue) = cardinality("bowlers", bowlers.players.len(), MAX_BOWLERS) {
            data_quality.push(issue);
        }

        let details = MatchDetails {
            title: self.title.resolve(page).value,
            status: self.status.resolve(page).value,
            batting_team,
            score_summary,
            reported_run_rate: self.run_rate.resolve(page).value,
            reported_required_rate: self.required_rate.resolve(page).value,
            players: Players {
                batsmen: batsmen.players,
                bowlers: bowlers.players,
            },
            partnership: self.partnership.resolve(page).value,
            recent_balls: self.recent_balls.resolve(page).value,
            last_wicket: self.last_wicket.resolve(page).value,
            win_probability: self.win_probability.resolve(page).value,
            data_quality,
        };

        debug!(
            "Extracted details for {:?}: {} batsmen, {} bowlers",
            details.title,
            details.players.batsmen.len(),
            details.players.bowlers.len()
        );

        details
    }
}

impl Default for DetailExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// First `TEAM R/W (O)` token in `text`
fn team_score(text: &str) -> Option<String> {
    TEAM_SCORE.find(text).map(|m| m.as_str().to_string())
}

/// Split `ENG 135/9 (19.2)` into `("ENG", "135/9 (19.2)")`
fn split_team_score(summary: &str) -> (String, String) {
    match TEAM_SCORE.captures(summary) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), summary.to_string()),
    }
}

fn partnership(text: &str) -> Option<Partnership> {
    let caps = PARTNERSHIP.captures(text)?;
    Some(Partnership {
        runs: caps[1].parse().ok()?,
        balls: caps[2].parse().ok()?,
    })
}

/// Percentages held by `div`s titled with a team name, in page order
fn titled_win_probability(page: &PageSnapshot) -> Option<WinProbability> {
    let mut chances = page
        .by_marker(Marker::Attr("title", None))
        .filter(|f| f.tag == "div")
        .filter_map(|f| {
            let team = f.attr("title")?.trim();
            let percent = PERCENT.captures(&f.text)?;
            Some(TeamChance {
                team: team.to_string(),
                percent: format!("{}%", &percent[1]),
            })
        });

    let team1 = chances.next()?;
    let team2 = chances.find(|c| c.team != team1.team).unwrap_or_default();
    Some(WinProbability { team1, team2 })
}

fn global_win_probability(text: &str) -> Option<WinProbability> {
    let mut chances = TEAM_PERCENT.captures_iter(text).map(|caps| TeamChance {
        team: caps[1].to_string(),
        percent: format!("{}%", &caps[2]),
    });

    let team1 = chances.next()?;
    let team2 = chances.find(|c| c.team != team1.team).unwrap_or_default();
    Some(WinProbability { team1, team2 })
}

fn cardinality(role: &'static str, found: usize, limit: usize) -> Option<DataQualityIssue> {
    if found <= limit {
        return None;
    }
    let issue = DataQualityIssue::UnexpectedPlayerCount { role, found, limit };
    warn!("{}", issue);
    Some(issue)
}
