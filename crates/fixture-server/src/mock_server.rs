//! The network-level interception point.
//!
//! Every outbound call the application makes is routed here, regardless of
//! its real destination host, so the router has no fixed route table — a
//! single catch-all handler reconstructs the full target URL, asks the
//! matcher for a decision, and writes back either the declared canned
//! response or the configured no-match answer.
//!
//! Two request shapes arrive in practice:
//!
//! - proxy-style absolute-form targets (`GET http://api.example/path`),
//!   used when the device routes traffic through this server as a proxy;
//! - origin-form targets plus a `Host` header, used when a specific API
//!   base URL was rewritten to point at this server directly.
//!
//! Matching never mutates shared state, so any number of calls may be in
//! flight at once; the only I/O is reading the body and writing the
//! response.

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::header::{HeaderMap, CONTENT_TYPE, HOST};
use axum::http::{request::Parts, Method, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::Router;
use fixture_match::{
    EndpointMock, IncomingRequest, MatchOutcome, RequestJournal, RequestMatcher,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::NoMatchPolicy;

/// Fixed status answering unmatched traffic under
/// [`NoMatchPolicy::ErrorStatus`]. Distinguishable from any realistic
/// mocked response so a missing declaration is unmistakable in app logs.
pub const NO_MATCH_STATUS: StatusCode = StatusCode::NOT_IMPLEMENTED;

/// Request bodies beyond this are refused; canned fixtures are small.
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared state for the interception handler.
#[derive(Clone)]
pub struct MockServerContext {
    matcher: RequestMatcher,
    journal: Arc<RequestJournal>,
    policy: NoMatchPolicy,
    client: reqwest::Client,
}

impl MockServerContext {
    pub fn new(
        matcher: RequestMatcher,
        journal: Arc<RequestJournal>,
        policy: NoMatchPolicy,
    ) -> Self {
        Self {
            matcher,
            journal,
            policy,
            client: reqwest::Client::new(),
        }
    }
}

/// Build the mock server router: one catch-all handler, nothing else.
pub fn router(context: MockServerContext) -> Router {
    Router::new()
        .fallback(intercept)
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn intercept(State(ctx): State<MockServerContext>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let url = reconstruct_url(&parts);

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(method = %parts.method, url = %url, "request body exceeded limit");
            return StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let Ok(method) = parts.method.as_str().parse::<fixture_core::HttpMethod>() else {
        // PATCH, OPTIONS, and friends cannot be declared as mocks; they are
        // unmatched traffic by definition.
        tracing::warn!(method = %parts.method, url = %url, "intercepted request with unmockable method");
        ctx.journal.record_raw(parts.method.as_str(), &url, false);
        return no_match_response(&ctx, &parts.method, &parts.headers, &url, bytes).await;
    };

    let parsed_body = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };
    let incoming = IncomingRequest {
        method,
        url: url.clone(),
        body: parsed_body,
    };

    let outcome = ctx.matcher.match_request(&incoming);
    ctx.journal.record(&incoming, &outcome);

    match outcome {
        MatchOutcome::Matched(mock) => {
            tracing::debug!(method = %method, url = %url, status = mock.response_status(), "request matched mock");
            mock_response(&mock)
        }
        MatchOutcome::NoMatch(reason) => {
            tracing::warn!(method = %method, url = %url, reason = ?reason, policy = ?ctx.policy, "no mock matched request");
            no_match_response(&ctx, &parts.method, &parts.headers, &url, bytes).await
        }
    }
}

/// Full URL of the intercepted request: absolute-form targets as-is,
/// origin-form rebuilt from the `Host` header.
fn reconstruct_url(parts: &Parts) -> String {
    if parts.uri.authority().is_some() {
        return parts.uri.to_string();
    }
    let host = parts
        .headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("http://{host}{path_and_query}")
}

fn mock_response(mock: &EndpointMock) -> Response {
    let status = StatusCode::from_u16(mock.response_status()).unwrap_or_else(|_| {
        tracing::warn!(
            url = mock.url(),
            status = mock.response_status(),
            "mock declared an invalid status code"
        );
        StatusCode::INTERNAL_SERVER_ERROR
    });
    match mock.response_body() {
        // Declared body, byte-for-byte as registered.
        Some(body) => (status, Json(body.clone())).into_response(),
        // "Match but return empty body".
        None => status.into_response(),
    }
}

async fn no_match_response(
    ctx: &MockServerContext,
    method: &Method,
    headers: &HeaderMap,
    url: &str,
    body: Bytes,
) -> Response {
    match ctx.policy {
        NoMatchPolicy::ErrorStatus => (
            NO_MATCH_STATUS,
            Json(json!({
                "error": {
                    "code": "UNMATCHED_REQUEST",
                    "message": format!("no mock registered for {method} {url}"),
                }
            })),
        )
            .into_response(),
        NoMatchPolicy::PassThrough => forward(ctx, method, headers, url, body).await,
    }
}

/// Relay an unmatched request to its real destination.
async fn forward(
    ctx: &MockServerContext,
    method: &Method,
    headers: &HeaderMap,
    url: &str,
    body: Bytes,
) -> Response {
    let Ok(method) = reqwest::Method::from_bytes(method.as_str().as_bytes()) else {
        return bad_gateway(url, "method not forwardable");
    };

    let mut builder = ctx.client.request(method, url);
    if let Some(content_type) = headers.get(CONTENT_TYPE) {
        builder = builder.header(CONTENT_TYPE, content_type.clone());
    }
    if !body.is_empty() {
        builder = builder.body(body);
    }

    let upstream = match builder.send().await {
        Ok(upstream) => upstream,
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "pass-through request failed");
            return bad_gateway(url, "upstream unreachable");
        }
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream.headers().get(CONTENT_TYPE.as_str()).cloned();
    let body = match upstream.bytes().await {
        Ok(body) => body,
        Err(err) => {
            tracing::warn!(url = %url, error = %err, "pass-through body read failed");
            return bad_gateway(url, "upstream body unreadable");
        }
    };

    let mut response = (status, body).into_response();
    if let Some(content_type) = content_type {
        if let Ok(value) = axum::http::HeaderValue::from_bytes(content_type.as_bytes()) {
            response.headers_mut().insert(CONTENT_TYPE, value);
        }
    }
    response
}

fn bad_gateway(url: &str, detail: &str) -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": {
                "code": "PASS_THROUGH_FAILED",
                "message": format!("{detail}: {url}"),
            }
        })),
    )
        .into_response()
}
