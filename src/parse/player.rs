use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::DataQualityIssue;
use crate::indexer::dedupe_by_key;
use crate::models::{Batsman, Bowler};
use crate::stats::Overs;

/// `Name [*] (r) R (b) B (4s) F (6s) S`, stats after runs optional
static BATSMAN_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-Za-z][A-Za-z .'\-]*?)\s*(\*)?\s*\(r\)\s*(\d+)(?:\s*\(b\)\s*(\d+))?(?:\s*\(4s\)\s*(\d+))?(?:\s*\(6s\)\s*(\d+))?",
    )
    .expect("valid regex")
});

/// `Name [*] (O) O [(M) M] (R) R (W) W (Econ) E`, stats after the name optional
static BOWLER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-Za-z][A-Za-z .'\-]*?)\s*\*?\s*\(O\)\s*(\d+(?:\.\d+)?)?(?:\s*\(M\)\s*\d+)?(?:\s*\(R\)\s*(\d+))?(?:\s*\(W\)\s*(\d+))?(?:\s*\(Econ\)\s*(\d+(?:\.\d+)?))?",
    )
    .expect("valid regex")
});

/// Player lines read from one or more fragments
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerLines<T> {
    pub players: Vec<T>,
    pub issues: Vec<DataQualityIssue>,
}

impl<T> Default for PlayerLines<T> {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            issues: Vec::new(),
        }
    }
}

impl<T> PlayerLines<T> {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    fn extend(&mut self, other: PlayerLines<T>) {
        self.players.extend(other.players);
        self.issues.extend(other.issues);
    }
}

/// Read every batsman line in `text`. Lines without a name or runs are skipped.
pub fn parse_batsmen(text: &str) -> PlayerLines<Batsman> {
    let players = BATSMAN_LINE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps[1].trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(Batsman {
                name,
                runs: caps[3].parse().ok()?,
                balls: number(&caps, 4),
                fours: number(&caps, 5),
                sixes: number(&caps, 6),
                striker: caps.get(2).is_some(),
            })
        })
        .collect();

    PlayerLines {
        players,
        issues: Vec::new(),
    }
}

/// Read every bowler line in `text`. Bowler overs follow the overs-notation rules.
pub fn parse_bowlers(text: &str) -> PlayerLines<Bowler> {
    let mut lines = PlayerLines::default();

    for caps in BOWLER_LINE.captures_iter(text) {
        let name = caps[1].trim().to_string();
        if name.is_empty() {
            continue;
        }

        let overs = match caps.get(2) {
            Some(m) => m.as_str().parse::<Overs>().unwrap_or_else(|issue| {
                lines.issues.push(issue);
                Overs::ZERO
            }),
            None => Overs::ZERO,
        };

        lines.players.push(Bowler {
            name,
            overs,
            runs_conceded: number(&caps, 3),
            wickets: number(&caps, 4),
            economy: caps
                .get(5)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0.0),
        });
    }

    lines
}

/// Anything keyed by a player's name
pub trait PlayerName {
    fn player_name(&self) -> &str;
}

impl PlayerName for Batsman {
    fn player_name(&self) -> &str {
        &self.name
    }
}

impl PlayerName for Bowler {
    fn player_name(&self) -> &str {
        &self.name
    }
}

/// Parse each fragment separately and merge, keeping the first line per player.
pub fn collect_lines<'a, T, F, I>(fragments: I, parse: F) -> PlayerLines<T>
where
    T: PlayerName,
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> PlayerLines<T>,
{
    let mut merged = PlayerLines::default();
    for text in fragments {
        merged.extend(parse(text));
    }
    merged.players = dedupe_by_key(merged.players, |p| p.player_name().to_lowercase());
    merged
}

fn number(caps: &Captures<'_>, group: usize) -> u32 {
    caps.get(group)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
