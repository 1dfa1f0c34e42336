use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::aggregator::{EventInput, TeamInput};

/// ESPN status code for an event in progress
const IN_PROGRESS: &str = "in";

/// Client for the ESPN scoreboard header feed
pub struct EspnClient {
    client: Client,
    scoreboard_url: String,
    sport_id: String,
}

/// Scoreboard header response (sports -> leagues -> events -> competitors)
#[derive(Debug, Deserialize)]
struct ScoreboardResponse {
    #[serde(default)]
    sports: Vec<SportEntry>,
}

#[derive(Debug, Deserialize)]
struct SportEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    leagues: Vec<LeagueEntry>,
}

#[derive(Debug, Deserialize)]
struct LeagueEntry {
    #[serde(default)]
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventEntry {
    #[serde(default)]
    id: String,
    name: Option<String>,
    short_name: Option<String>,
    status: Option<String>,
    location: Option<String>,
    full_status: Option<FullStatus>,
    #[serde(default)]
    competitors: Vec<CompetitorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullStatus {
    long_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompetitorEntry {
    id: Option<String>,
    display_name: Option<String>,
    short_display_name: Option<String>,
    score: Option<String>,
}

impl EspnClient {
    /// Create a new client
    pub fn new(scoreboard_url: &str, sport_id: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("Failed to build ESPN HTTP client")?;

        Ok(Self {
            client,
            scoreboard_url: scoreboard_url.to_string(),
            sport_id: sport_id.to_string(),
        })
    }

    /// Fetch cricket events currently in progress
    pub async fn fetch_live_events(&self) -> Result<Vec<EventInput>> {
        info!("Fetching live scoreboard from ESPN");

        let response = self
            .client
            .get(&self.scoreboard_url)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch ESPN scoreboard")?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("ESPN API error: {} - {}", status, text);
        }

        let body = response
            .text()
            .await
            .context("Failed to read ESPN scoreboard body")?;

        let events = parse_scoreboard_json(&body, &self.sport_id)?;
        info!("ESPN returned {} live cricket events", events.len());

        Ok(events)
    }
}

/// Pull in-progress events of one sport out of a scoreboard document.
///
/// A `null` document or missing collections yield no events.
pub fn parse_scoreboard_json(raw: &str, sport_id: &str) -> Result<Vec<EventInput>> {
    let response: Option<ScoreboardResponse> =
        serde_json::from_str(raw).context("Failed to parse ESPN scoreboard response")?;

    let Some(response) = response else {
        return Ok(Vec::new());
    };

    let events: Vec<EventInput> = response
        .sports
        .into_iter()
        .filter(|sport| sport.id == sport_id)
        .flat_map(|sport| sport.leagues)
        .flat_map(|league| league.events)
        .filter(|event| event.status.as_deref() == Some(IN_PROGRESS))
        .map(convert_event)
        .collect();

    debug!("Scoreboard holds {} in-progress events", events.len());
    Ok(events)
}

fn convert_event(event: EventEntry) -> EventInput {
    EventInput {
        id: event.id,
        name: event.name.unwrap_or_default(),
        short_name: event.short_name.unwrap_or_default(),
        venue: event.location,
        status: event
            .full_status
            .and_then(|s| s.long_summary)
            .unwrap_or_default(),
        teams: event
            .competitors
            .into_iter()
            .map(|c| TeamInput {
                id: c.id.unwrap_or_default(),
                name: c.display_name.unwrap_or_default(),
                short_name: c.short_display_name.unwrap_or_default(),
                score_text: c.score.unwrap_or_default(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOREBOARD: &str = r#"{
        "sports": [
            {"id": "600", "leagues": [{"events": [{"id": "9", "status": "in", "competitors": []}]}]},
            {"id": "200", "leagues": [
                {"events": [
                    {
                        "id": "1441",
                        "name": "Sri Lanka v England",
                        "shortName": "SL v ENG",
                        "status": "in",
                        "location": "Pallekele",
                        "fullStatus": {"longSummary": "SL need 91 runs in 60 balls"},
                        "competitors": [
                            {"id": "8", "displayName": "Sri Lanka", "shortDisplayName": "SL", "score": "90/3 (10/20 ov, T:181)"},
                            {"id": "1", "displayName": "England", "shortDisplayName": "ENG", "score": "180/6"}
                        ]
                    },
                    {"id": "1442", "status": "pre", "competitors": []}
                ]},
                {}
            ]}
        ]
    }"#;

    #[test]
    fn test_parse_live_cricket_events() {
        let events = parse_scoreboard_json(SCOREBOARD, "200").unwrap();
        assert_eq!(events.len(), 1);

        let event = &events[0];
        assert_eq!(event.id, "1441");
        assert_eq!(event.venue.as_deref(), Some("Pallekele"));
        assert_eq!(event.status, "SL need 91 runs in 60 balls");
        assert_eq!(event.teams.len(), 2);
        assert_eq!(event.teams[0].short_name, "SL");
        assert_eq!(event.teams[1].score_text, "180/6");
    }

    #[test]
    fn test_null_and_empty_documents() {
        assert!(parse_scoreboard_json("null", "200").unwrap().is_empty());
        assert!(parse_scoreboard_json("{}", "200").unwrap().is_empty());
        assert!(parse_scoreboard_json("not json", "200").is_err());
    }
}
