//! # wxa-server
//!
//! HTTP server hosting a single skill. Provides:
//!
//! - `POST /` for signed, encrypted skill requests
//! - `GET /` for the platform's signed health-check challenge
//! - `GET /ping` liveness and `GET /metrics` in Prometheus text format
//!
//! Every response carries the security headers; handler panics become 500s.

pub mod error;
pub mod metrics;
pub mod skill;

pub use error::ErrorResponse;
pub use metrics::Metrics;
pub use skill::{EchoSkill, Skill, SkillReply};

use axum::{
    Router,
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::get,
};
use serde::Deserialize;
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use wxa_config::{ServerConfig, SkillKeys};
use wxa_core::{
    DialogueState, MAX_BODY_BYTES, SignedRequest, WebexAssistantHealthResponse,
    WebexAssistantMessage, WebexAssistantResponse, WxaError, decode_json_body,
};

/// Shared server state.
pub struct AppState {
    pub keys: SkillKeys,
    pub skill: Arc<dyn Skill>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(keys: SkillKeys, skill: Arc<dyn Skill>) -> Arc<Self> {
        Arc::new(Self {
            keys,
            skill,
            metrics: Metrics::new(),
        })
    }
}

/// Query string of a health-check request.
#[derive(Deserialize)]
struct HealthCheckParams {
    #[serde(default)]
    signature: String,
    #[serde(default)]
    challenge: String,
}

/// Build the Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let panic_metrics = state.metrics.clone();

    Router::new()
        .route("/", get(health_check_handler).post(skill_handler))
        .route("/ping", get(ping_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state.clone())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("deny"),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(
            move |err: Box<dyn Any + Send + 'static>| panic_response(&panic_metrics, err),
        ))
        .layer(middleware::from_fn_with_state(state, track_metrics))
}

async fn track_metrics(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    state.metrics.inc_requests_received();
    let response = next.run(request).await;
    state.metrics.record_response(start.elapsed());
    response
}

fn panic_response(metrics: &Metrics, err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    error!(panic = %detail, "handler panicked");
    metrics.inc_panics();

    let mut response = ErrorResponse::internal().into_response();
    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));
    response
}

async fn ping_handler() -> &'static str {
    "OK"
}

async fn metrics_handler(
    State(state): State<Arc<AppState>>,
) -> (
    StatusCode,
    [(axum::http::header::HeaderName, &'static str); 1],
    String,
) {
    let body = state.metrics.render_prometheus();
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

async fn skill_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Body,
) -> Result<Json<WebexAssistantResponse>, ErrorResponse> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap_or_default());

    // Reading stops one byte past the limit so the codec can classify it.
    let bytes = axum::body::to_bytes(body, MAX_BODY_BYTES + 1)
        .await
        .map_err(|e| {
            debug!(error = %e, "failed to read request body");
            state.metrics.inc_malformed_requests();
            ErrorResponse::from_body_error(&e)
        })?;

    let request: SignedRequest = decode_json_body(content_type, &bytes).map_err(|e| {
        warn!(error = %e, "malformed request");
        state.metrics.inc_malformed_requests();
        ErrorResponse::from(e)
    })?;

    if !request.is_complete() {
        state.metrics.inc_malformed_requests();
        return Err(ErrorResponse::invalid_request());
    }

    let plaintext = open_envelope(&state, &request.signature, request.message).await?;

    let message: WebexAssistantMessage = serde_json::from_str(&plaintext).map_err(|e| {
        warn!(error = %e, "error unmarshalling message");
        ErrorResponse::bad_request("unable to unmarshal message")
    })?;

    let response = match DialogueState::of(&message) {
        DialogueState::Intro => {
            debug!(skill = state.skill.name(), "intro turn");
            WebexAssistantResponse::build_intro(&message, state.skill.intro())
        }
        DialogueState::Active => {
            let reply = state.skill.respond(&message).await.map_err(|e| {
                error!(skill = state.skill.name(), error = %e, "skill failed to respond");
                ErrorResponse::internal()
            })?;
            WebexAssistantResponse::build(&message, &reply.text, reply.should_listen)
        }
    };

    Ok(Json(response))
}

async fn health_check_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HealthCheckParams>,
) -> Result<Json<WebexAssistantHealthResponse>, ErrorResponse> {
    if params.signature.is_empty() {
        return Err(ErrorResponse::bad_request("missing signature"));
    }
    if params.challenge.is_empty() {
        return Err(ErrorResponse::bad_request("missing message"));
    }

    let challenge = open_envelope(&state, &params.signature, params.challenge).await?;
    Ok(Json(WebexAssistantHealthResponse::ok(challenge)))
}

/// Verify the signature over `envelope`, then decrypt it.
async fn open_envelope(
    state: &Arc<AppState>,
    signature: &str,
    envelope: String,
) -> Result<String, ErrorResponse> {
    match wxa_crypto::verify_base64(state.keys.secret.as_bytes(), &envelope, signature) {
        Ok(true) => {}
        Ok(false) => {
            warn!("message has invalid signature and will not be processed");
            state.metrics.inc_signature_failures();
            return Err(ErrorResponse::invalid_signature());
        }
        Err(e) => {
            warn!(error = %e, "error decoding signature");
            state.metrics.inc_malformed_requests();
            return Err(ErrorResponse::bad_request("error decoding signature"));
        }
    }

    let task_state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || {
        wxa_crypto::decrypt(&task_state.keys.private_key, &envelope)
    })
    .await
    .map_err(|e| {
        error!(error = %e, "decrypt task failed");
        ErrorResponse::internal()
    })?;

    result.map_err(|e| {
        warn!(error = %e, format_error = e.is_format_error(), "unable to decrypt message");
        state.metrics.inc_decrypt_failures();
        ErrorResponse::undecryptable()
    })
}

/// Serve the skill on an already-bound listener.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> wxa_core::Result<()> {
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| WxaError::Server(format!("server error: {}", e)))
}

/// Start the HTTP server.
pub async fn start_server(
    config: &ServerConfig,
    keys: SkillKeys,
    skill: Arc<dyn Skill>,
) -> wxa_core::Result<()> {
    // Fail at startup rather than on the first request.
    wxa_crypto::hybrid::parse_private_key(&keys.private_key)?;

    let listener = TcpListener::bind(&config.listen)
        .await
        .map_err(|e| WxaError::Server(format!("failed to bind {}: {}", config.listen, e)))?;

    info!(listen = %config.listen, skill = skill.name(), "starting skill server");

    serve(listener, AppState::new(keys, skill)).await
}
