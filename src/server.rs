//! HTTP boundary for the task suggestion service
//!
//! Exposes the suggestion endpoint plus operational endpoints for
//! monitoring. The request body is read as raw bytes so that a missing body,
//! an unparseable body, and field-level validation failures each produce
//! their own 400 response shape.

use crate::error::SuggestError;
use crate::matcher::TaskSuggester;
use crate::observability::metrics::metrics;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};
use uuid::Uuid;
use warp::http::StatusCode;
use warp::hyper::body::Bytes;
use warp::{Filter, Rejection, Reply};

/// Incoming suggestion request
///
/// Every field is optional at the deserialization level so validation can
/// itemize each missing field instead of failing on the first one.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestTaskRequest {
    pub utterance: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl SuggestTaskRequest {
    /// Validate the request, returning one human-readable message per problem
    pub fn validate(&self) -> Vec<String> {
        self.validate_at(Utc::now())
    }

    /// Validation against an explicit clock, for deterministic tests
    pub fn validate_at(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut errors = Vec::new();

        if self
            .utterance
            .as_deref()
            .map_or(true, |u| u.trim().is_empty())
        {
            errors.push("Utterance is required and cannot be empty.".to_string());
        }

        if self
            .user_id
            .as_deref()
            .map_or(true, |u| u.trim().is_empty())
        {
            errors.push("UserId is required and cannot be empty.".to_string());
        }

        if self
            .session_id
            .as_deref()
            .map_or(true, |s| s.trim().is_empty())
        {
            errors.push("SessionId is required and cannot be empty.".to_string());
        }

        match self.timestamp {
            None => errors.push("Timestamp is required.".to_string()),
            Some(ts) => {
                // Epoch zero is the unset sentinel; allow slight future skew
                if ts.timestamp() == 0 || ts > now + ChronoDuration::minutes(1) {
                    errors.push("Timestamp must be a valid date and time.".to_string());
                }
            }
        }

        errors
    }
}

/// Successful suggestion response
#[derive(Debug, Serialize)]
pub struct SuggestTaskResponse {
    pub task: String,
    /// Server-generated, ISO-8601 UTC
    pub timestamp: DateTime<Utc>,
}

/// Error response body for 400 and 500 results
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    service_id: String,
    uptime_seconds: u64,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct LivenessResponse {
    alive: bool,
    timestamp: u64,
}

#[derive(Debug, Serialize)]
struct ApiDocumentationResponse {
    endpoints: HashMap<String, String>,
}

/// HTTP server wiring the suggestion core to warp routes
pub struct ApiServer {
    service_id: String,
    bind_address: String,
    port: u16,
    suggester: Arc<dyn TaskSuggester>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(
        service_id: String,
        bind_address: String,
        port: u16,
        suggester: Arc<dyn TaskSuggester>,
    ) -> Self {
        Self {
            service_id,
            bind_address,
            port,
            suggester,
        }
    }

    /// Build the complete route tree
    ///
    /// Separated from `start` so integration tests can drive the filters
    /// through `warp::test` without binding a socket.
    pub fn routes(
        self: &Arc<Self>,
    ) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
        let suggester = self.suggester.clone();
        let with_suggester = warp::any().map(move || suggester.clone());

        // POST /suggestTask, also reachable under the /api prefix
        let suggest_route = warp::path("suggestTask")
            .and(warp::path::end())
            .or(warp::path("api")
                .and(warp::path("suggestTask"))
                .and(warp::path::end()))
            .unify()
            .and(warp::post())
            .and(warp::body::bytes())
            .and(with_suggester)
            .and_then(handle_suggest);

        let health_server = self.clone();
        let health_route = warp::path("health").and(warp::get()).map(move || {
            let snapshot = metrics().get_metrics();
            warp::reply::json(&HealthResponse {
                status: "healthy".to_string(),
                service_id: health_server.service_id.clone(),
                uptime_seconds: snapshot.uptime_seconds,
                timestamp: current_timestamp(),
            })
        });

        // GET /live - liveness probe
        let live_route = warp::path("live").and(warp::get()).map(|| {
            warp::reply::json(&LivenessResponse {
                alive: true,
                timestamp: current_timestamp(),
            })
        });

        // GET /metrics - complete metrics export
        let metrics_route = warp::path("metrics")
            .and(warp::get())
            .map(|| warp::reply::json(&metrics().get_metrics()));

        // GET / - API documentation
        let root_route = warp::path::end().and(warp::get()).map(|| {
            let mut endpoints = HashMap::new();
            endpoints.insert(
                "/suggestTask".to_string(),
                "POST an utterance with session metadata, get a task label".to_string(),
            );
            endpoints.insert(
                "/health".to_string(),
                "Overall health status".to_string(),
            );
            endpoints.insert("/live".to_string(), "Liveness probe".to_string());
            endpoints.insert(
                "/metrics".to_string(),
                "Comprehensive metrics and statistics".to_string(),
            );
            warp::reply::json(&ApiDocumentationResponse { endpoints })
        });

        suggest_route
            .or(health_route)
            .or(live_route)
            .or(metrics_route)
            .or(root_route)
            .with(warp::cors().allow_any_origin())
    }

    /// Start the HTTP server and serve until the process shuts down
    pub async fn start(self: Arc<Self>) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let routes = self.routes();

        let addr: IpAddr = self
            .bind_address
            .parse()
            .map_err(|e| format!("Invalid bind address '{}': {e}", self.bind_address))?;

        info!(
            "Starting API server on {}:{}",
            self.bind_address, self.port
        );

        warp::serve(routes).run((addr, self.port)).await;

        Ok(())
    }
}

/// Handle a suggestion request end to end
async fn handle_suggest(
    body: Bytes,
    suggester: Arc<dyn TaskSuggester>,
) -> Result<impl Reply, Infallible> {
    let started = Instant::now();
    let request_id = Uuid::new_v4();
    metrics().request_received();

    // Missing body gets its own response shape
    if body.iter().all(|b| b.is_ascii_whitespace()) {
        warn!(%request_id, "Received request with empty body");
        metrics().validation_failed();
        return Ok(error_reply(
            StatusCode::BAD_REQUEST,
            "Request body is required",
            vec!["Request body cannot be null".to_string()],
        ));
    }

    let request: SuggestTaskRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(%request_id, error = %e, "Failed to parse request body");
            metrics().validation_failed();
            return Ok(error_reply(
                StatusCode::BAD_REQUEST,
                "Validation failed",
                vec![format!("Malformed request body: {e}")],
            ));
        }
    };

    info!(
        %request_id,
        user_id = request.user_id.as_deref().unwrap_or(""),
        session_id = request.session_id.as_deref().unwrap_or(""),
        "Received task suggestion request"
    );

    let validation_errors = request.validate();
    if !validation_errors.is_empty() {
        warn!(
            %request_id,
            errors = %validation_errors.join(", "),
            "Validation failed for request"
        );
        metrics().validation_failed();
        return Ok(error_reply(
            StatusCode::BAD_REQUEST,
            "Validation failed",
            validation_errors,
        ));
    }

    // Validation guarantees the utterance is present
    let utterance = request.utterance.as_deref().unwrap_or("");

    match suggester.suggest_task(utterance).await {
        Ok(task) => {
            info!(%request_id, task = %task, "Successfully processed request");
            metrics().request_completed(started.elapsed());
            let response = SuggestTaskResponse {
                task,
                timestamp: Utc::now(),
            };
            Ok(warp::reply::with_status(
                warp::reply::json(&response),
                StatusCode::OK,
            ))
        }
        Err(e) => {
            // Exhaustion and any other internal failure surface as an opaque
            // 500; details stay in the logs
            error!(%request_id, error = %e, "Error processing task suggestion request");
            if let SuggestError::OperationExhausted { attempts } = e {
                warn!(%request_id, attempts, "Match retries exhausted");
            }
            metrics().request_failed(started.elapsed());
            Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing your request",
                vec!["Internal server error".to_string()],
            ))
        }
    }
}

fn error_reply(
    status: StatusCode,
    message: &str,
    errors: Vec<String>,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&ErrorResponse {
            message: message.to_string(),
            errors,
        }),
        status,
    )
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
