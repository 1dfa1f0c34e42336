use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::ServiceError;
use crate::service::LiveScoreService;

#[derive(Debug, Deserialize)]
pub struct ScrapQuery {
    /// 1-based ordinal (or locator) of the match to read
    pub live: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesQuery {
    #[serde(default)]
    pub score: String,
    pub target: Option<u32>,
    pub total_overs: Option<u32>,
}

/// Create the HTTP router with all routes
pub fn create_router(service: Arc<LiveScoreService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/live", get(live_scoreboard))
        .route("/api/scrap", get(scrap))
        .route("/api/rates", get(rates))
        .layer(middleware::from_fn(cors))
        .with_state(service)
}

/// Permissive CORS on every response; preflight requests end here
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Live matches from the scoreboard feed with rates and chase figures
async fn live_scoreboard(State(service): State<Arc<LiveScoreService>>) -> Response {
    match service.live_scoreboard().await {
        Ok(matches) => Json(json!({
            "status": true,
            "totalLiveMatches": matches.len(),
            "matches": matches,
        }))
        .into_response(),
        Err(e) => {
            error!("Live scoreboard failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": false, "message": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Numbered listing, or one match's details with `?live=N`
async fn scrap(
    State(service): State<Arc<LiveScoreService>>,
    Query(query): Query<ScrapQuery>,
) -> Response {
    let result = match query.live.as_deref().filter(|q| !q.is_empty()) {
        Some(live) => service
            .get_match(live)
            .await
            .map(|found| json!({ "status": "success", "match": found })),
        None => service.list_matches().await.map(|matches| {
            json!({
                "status": "success",
                "total": matches.len(),
                "matches": matches,
            })
        }),
    };

    match result {
        Ok(body) => Json(body).into_response(),
        Err(ServiceError::NotFound(e)) => {
            info!("{}", e);
            (
                StatusCode::NOT_FOUND,
                Json(json!({ "status": "error", "message": "Match not found" })),
            )
                .into_response()
        }
        Err(e) => {
            error!("Scrape request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "Internal server error" })),
            )
                .into_response()
        }
    }
}

/// Rates for a score string, e.g. `?score=90/3 (10.0)&target=181`
async fn rates(
    State(service): State<Arc<LiveScoreService>>,
    Query(query): Query<RatesQuery>,
) -> Response {
    Json(service.compute_rates(&query.score, query.target, query.total_overs)).into_response()
}
