use std::net::SocketAddr;
use std::sync::Arc;

use axum::{response::Html, routing::get, Router};
use tokio::net::TcpListener;

use cricket_live::api::{parse_scoreboard_json, CricbuzzClient, EspnClient};
use cricket_live::config::RateConfig;
use cricket_live::error::LookupError;
use cricket_live::extract::{discover_matches, PageSnapshot};
use cricket_live::indexer::MatchIndex;
use cricket_live::server::create_router;
use cricket_live::service::LiveScoreService;

const LISTING: &str = r#"
    <html><body>
        <div><a href="/live-cricket-scores/101/eng-vs-sl-3rd-t20i" title="England vs Sri Lanka, 3rd T20I">ENG vs SL</a> <b>LIVE</b></div>
        <ul>
            <li><div><a href="/live-cricket-scores/202/ind-vs-aus-1st-odi">India vs Australia, 1st ODI</a></div></li>
            <li><div><a href="/live-cricket-scores/101/eng-vs-sl-3rd-t20i">England vs Sri Lanka</a></div></li>
        </ul>
    </body></html>
"#;

const MATCH_PAGE: &str = r#"
    <html><body>
        <h1>England vs Sri Lanka, 3rd T20I - Live Cricket Score</h1>
        <div class="cb-text-inprogress">Sri Lanka need 40 runs in 30 balls</div>
        <div class="cb-min-bat-rw">SL 142/3 (15)</div>
        <div class="cb-min-inf">
            <div>Kusal Mendis * (r) 61 (b) 40 (4s) 6 (6s) 2</div>
            <div>Charith Asalanka (r) 22 (b) 14 (4s) 1 (6s) 1</div>
            <div>Adil Rashid (O) 3 (R) 21 (W) 1 (Econ) 7.00</div>
        </div>
        <div class="cb-key-st"><span>P'SHIP</span> <span>48 (31)</span></div>
        <div class="cb-rates"><span>CRR: 9.47</span> <span>REQ: 8.00</span></div>
    </body></html>
"#;

const SCOREBOARD: &str = r#"{
    "sports": [{"id": "200", "leagues": [{"events": [
        {
            "id": "77",
            "name": "India v Australia",
            "shortName": "IND v AUS",
            "status": "in",
            "fullStatus": {"longSummary": "IND need 91 runs"},
            "competitors": [
                {"id": "6", "displayName": "India", "shortDisplayName": "IND", "score": "90/3 (10)"},
                {"id": "2", "displayName": "Australia", "shortDisplayName": "AUS", "score": "180/7 (20)"}
            ]
        },
        {
            "id": "78",
            "name": "Nepal v Oman",
            "status": "in",
            "location": "Kirtipur",
            "competitors": [
                {"id": "30", "displayName": "Nepal", "shortDisplayName": "NEP", "score": "45/12 (6.7)"}
            ]
        }
    ]}]}]
}"#;

fn offline_service() -> LiveScoreService {
    let cricbuzz = CricbuzzClient::new("http://127.0.0.1:9", "cricket-live-tests", 1).unwrap();
    let espn = EspnClient::new("http://127.0.0.1:9/scoreboard", "200", 1).unwrap();
    LiveScoreService::new(cricbuzz, espn, RateConfig::default())
}

#[test]
fn test_listing_to_detail_record() {
    let service = offline_service();

    let listing = PageSnapshot::from_html(LISTING);
    let index = MatchIndex::from_candidates(discover_matches(&listing, "https://www.cricbuzz.com"));
    assert_eq!(index.len(), 2);

    let entry = index.resolve("1").unwrap().clone();
    assert_eq!(entry.name, "England vs Sri Lanka, 3rd T20I");
    assert!(entry.is_live);

    let page = PageSnapshot::from_html(MATCH_PAGE);
    let record = service.detail_record(&entry, &page);

    assert_eq!(record.id, "101");
    assert_eq!(record.name, "England vs Sri Lanka, 3rd T20I - Live Cricket Score");
    assert_eq!(record.venue, "N/A");
    assert_eq!(record.status, "Sri Lanka need 40 runs in 30 balls");
    assert!(record.incomplete);
    assert!(record.chase_info.is_none());

    assert_eq!(record.teams.len(), 1);
    assert_eq!(record.teams[0].short_name, "SL");
    assert_eq!(record.teams[0].score.runs, 142);
    assert_eq!(record.teams[0].current_run_rate, 9.47);

    assert_eq!(record.players.batsmen.len(), 2);
    assert_eq!(record.players.bowlers[0].overs.balls(), 18);
    assert_eq!(record.partnership.to_string(), "48(31)");

    assert_eq!(record.batting_team, "SL");
    assert_eq!(record.score_summary, "142/3 (15)");
    assert_eq!(record.reported_run_rate, "9.47");
    assert_eq!(record.reported_required_rate, "8.00");

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json["reportedRunRate"], "9.47");
    assert_eq!(json["reportedRequiredRate"], "8.00");
    assert_eq!(json["scoreSummary"], "142/3 (15)");
}

#[test]
fn test_stale_ordinal_is_not_found() {
    let listing = PageSnapshot::from_html(LISTING);
    let index = MatchIndex::from_candidates(discover_matches(&listing, "https://www.cricbuzz.com"));

    assert!(matches!(index.resolve("3"), Err(LookupError::NotFound { .. })));
    assert!(matches!(index.resolve("0"), Err(LookupError::NotFound { .. })));
}

#[test]
fn test_scoreboard_to_records() {
    let service = offline_service();
    let aggregator = cricket_live::aggregator::MatchAggregator::new(RateConfig::default());

    let records: Vec<_> = parse_scoreboard_json(SCOREBOARD, "200")
        .unwrap()
        .into_iter()
        .map(|event| aggregator.aggregate(event))
        .collect();
    assert_eq!(records.len(), 2);

    let chase = &records[0];
    assert_eq!(chase.venue, "N/A");
    assert_eq!(chase.teams[0].current_run_rate, 9.0);
    let info = chase.chase_info.as_ref().unwrap();
    assert_eq!(info.target, 181);
    assert_eq!(info.runs_needed, 91);
    assert_eq!(info.balls_remaining, 60);
    assert_eq!(info.required_run_rate, 9.1);

    let broken = &records[1];
    assert_eq!(broken.venue, "Kirtipur");
    assert!(broken.incomplete);
    assert!(broken.chase_info.is_none());
    assert_eq!(broken.teams[0].data_quality.len(), 2);

    let rates = service.compute_rates("90/3 (10)", Some(181), None);
    assert_eq!(rates.chase_info, Some(info.clone()));
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn test_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_rates_endpoint_with_cors() {
    let addr = serve(create_router(Arc::new(offline_service()))).await;
    let client = test_client();

    let response = client
        .get(format!(
            "http://{}/api/rates?score=135/9%20(19.2)&target=143&totalOvers=20",
            addr
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["currentRunRate"], 6.98);
    assert_eq!(body["chaseInfo"]["runsNeeded"], 8);
    assert_eq!(body["chaseInfo"]["ballsRemaining"], 4);
    assert_eq!(body["chaseInfo"]["requiredRunRate"], 12.0);

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("http://{}/api/scrap", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), 200);
    assert_eq!(
        preflight.headers()["access-control-allow-methods"],
        "GET, OPTIONS"
    );
    assert!(preflight.text().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scrap_endpoint_against_listing_site() {
    // Listing page only; every match page answers 404
    let site = serve(Router::new().route("/", get(|| async { Html(LISTING) }))).await;

    let cricbuzz =
        CricbuzzClient::new(&format!("http://{}", site), "cricket-live-tests", 5).unwrap();
    let espn = EspnClient::new("http://127.0.0.1:9/scoreboard", "200", 1).unwrap();
    let service = LiveScoreService::new(cricbuzz, espn, RateConfig::default());
    let addr = serve(create_router(Arc::new(service))).await;
    let client = test_client();

    let listing: serde_json::Value = client
        .get(format!("http://{}/api/scrap", addr))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["status"], "success");
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["matches"][1]["number"], 2);
    assert_eq!(listing["matches"][0]["isLive"], true);

    let response = client
        .get(format!("http://{}/api/scrap?live=1", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let found: serde_json::Value = response.json().await.unwrap();
    assert_eq!(found["status"], "success");
    assert_eq!(found["match"]["number"], 1);
    assert_eq!(found["match"]["name"], "England vs Sri Lanka, 3rd T20I");
    assert!(found["match"]["details"].is_null());
    assert!(found["match"].get("details").is_some());

    for query in ["0", "3", "abc"] {
        let response = client
            .get(format!("http://{}/api/scrap?live={}", addr, query))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 404, "live={}", query);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Match not found");
    }
}
