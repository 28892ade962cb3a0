// 🌐 Fixture Server - loaded seeds over HTTP for out-of-process load workers
//
// Every worker process asks the same server for "the next user", so the
// no-repeat guarantee of `get_next_user` holds across processes too.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::SeedsError;
use crate::fixtures::SeedsFixtures;
use crate::plan::PlanTotals;
use crate::result::SeedUserResult;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    fixtures: Arc<HashMap<String, Arc<SeedsFixtures>>>,
}

impl AppState {
    pub fn new(fixtures: Vec<SeedsFixtures>) -> Self {
        let fixtures = fixtures
            .into_iter()
            .map(|f| (f.scenario().to_string(), Arc::new(f)))
            .collect();
        AppState {
            fixtures: Arc::new(fixtures),
        }
    }

    /// `scenario` arrives already percent-decoded by the `Path` extractor
    fn get(&self, scenario: &str) -> Result<Arc<SeedsFixtures>, Response> {
        self.fixtures.get(scenario).cloned().ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                format!("scenario '{}' is not loaded", scenario),
            )
        })
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub scenario: String,
    pub users: usize,
    pub remaining: usize,
    pub totals: PlanTotals,
}

impl From<&SeedsFixtures> for ScenarioSummary {
    fn from(fixtures: &SeedsFixtures) -> Self {
        Self {
            scenario: fixtures.scenario().to_string(),
            users: fixtures.len(),
            remaining: fixtures.remaining(),
            totals: fixtures.totals(),
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message),
    };
    (status, Json(body)).into_response()
}

fn seeds_error_response(err: SeedsError) -> Response {
    let status = match &err {
        SeedsError::Exhausted { .. } => StatusCode::GONE,
        SeedsError::NotBuilt { .. }
        | SeedsError::UserIndexOutOfRange { .. }
        | SeedsError::UnknownScenario(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!(error = %err, "fixture request failed");
    error_response(status, err.to_string())
}

fn user_response(user: &SeedUserResult) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(user))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/seeds - Loaded scenarios
async fn list_scenarios(State(state): State<AppState>) -> impl IntoResponse {
    let mut summaries: Vec<ScenarioSummary> = state
        .fixtures
        .values()
        .map(|f| ScenarioSummary::from(f.as_ref()))
        .collect();
    summaries.sort_by(|a, b| a.scenario.cmp(&b.scenario));
    Json(ApiResponse::ok(summaries))
}

/// GET /api/seeds/:scenario/summary
async fn scenario_summary(
    State(state): State<AppState>,
    Path(scenario): Path<String>,
) -> Response {
    match state.get(&scenario) {
        Ok(fixtures) => Json(ApiResponse::ok(ScenarioSummary::from(fixtures.as_ref()))).into_response(),
        Err(response) => response,
    }
}

/// GET /api/seeds/:scenario/next-user - Each user is handed out once
async fn next_user(State(state): State<AppState>, Path(scenario): Path<String>) -> Response {
    let fixtures = match state.get(&scenario) {
        Ok(f) => f,
        Err(response) => return response,
    };
    match fixtures.get_next_user() {
        Ok(user) => user_response(user),
        Err(e) => seeds_error_response(e),
    }
}

/// GET /api/seeds/:scenario/random-user
async fn random_user(State(state): State<AppState>, Path(scenario): Path<String>) -> Response {
    let fixtures = match state.get(&scenario) {
        Ok(f) => f,
        Err(response) => return response,
    };
    match fixtures.get_random_user() {
        Ok(user) => user_response(user),
        Err(e) => seeds_error_response(e),
    }
}

/// GET /api/seeds/:scenario/users/:index
async fn user_by_index(
    State(state): State<AppState>,
    Path((scenario, index)): Path<(String, usize)>,
) -> Response {
    let fixtures = match state.get(&scenario) {
        Ok(f) => f,
        Err(response) => return response,
    };
    match fixtures.get_user(index) {
        Ok(user) => user_response(user),
        Err(e) => seeds_error_response(e),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/seeds", get(list_scenarios))
        .route("/seeds/:scenario/summary", get(scenario_summary))
        .route("/seeds/:scenario/next-user", get(next_user))
        .route("/seeds/:scenario/random-user", get(random_user))
        .route("/seeds/:scenario/users/:index", get(user_by_index))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::SeedsResult;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app_for(scenario: &str, users: usize) -> Router {
        let result = SeedsResult::new(
            (0..users)
                .map(|i| SeedUserResult::new(format!("user-{}", i)))
                .collect(),
        );
        router(AppState::new(vec![SeedsFixtures::new(scenario, result)]))
    }

    fn app(users: usize) -> Router {
        app_for("scenario_a", users)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(&app(1), "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
    }

    #[tokio::test]
    async fn test_next_user_until_gone() {
        let app = app(2);
        let (_, first) = get_json(&app, "/api/seeds/scenario_a/next-user").await;
        let (_, second) = get_json(&app, "/api/seeds/scenario_a/next-user").await;
        assert_eq!(first["data"]["user_id"], "user-0");
        assert_eq!(second["data"]["user_id"], "user-1");

        let (status, body) = get_json(&app, "/api/seeds/scenario_a/next-user").await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["success"], false);

        let (_, summary) = get_json(&app, "/api/seeds/scenario_a/summary").await;
        assert_eq!(summary["data"]["remaining"], 0);
    }

    #[tokio::test]
    async fn test_unknown_scenario_and_index() {
        let app = app(1);
        let (status, _) = get_json(&app, "/api/seeds/missing/next-user").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get_json(&app, "/api/seeds/scenario_a/users/5").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = get_json(&app, "/api/seeds/scenario_a/users/0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["user_id"], "user-0");
    }

    #[tokio::test]
    async fn test_list_scenarios() {
        let (_, body) = get_json(&app(3), "/api/seeds").await;
        assert_eq!(body["data"][0]["scenario"], "scenario_a");
        assert_eq!(body["data"][0]["users"], 3);
    }

    #[tokio::test]
    async fn test_scenario_name_decoded_once() {
        let app = app_for("load%41", 1);

        let (status, body) = get_json(&app, "/api/seeds/load%2541/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["scenario"], "load%41");

        let (status, _) = get_json(&app, "/api/seeds/loadA/summary").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
