//! The fixture state server.
//!
//! One externally meaningful behavior: `GET /state.json` returns the
//! current document pair. Everything else is `404`. Reads never mutate
//! state.
//!
//! CORS is wide open because the application may fetch the state document
//! from an embedded web context that does not share this server's origin.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use fixture_core::constants::STATE_RESOURCE_PATH;
use fixture_core::StateFixture;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state_store::StateStore;

/// Build the state server router.
pub fn router(store: Arc<StateStore>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(STATE_RESOURCE_PATH, get(serve_state))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

async fn serve_state(State(store): State<Arc<StateStore>>) -> Json<StateFixture> {
    Json(store.get().as_ref().clone())
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
