// routes.rs
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::store::{PollStore, VoteStore};
use crate::AppState;

async fn health() -> &'static str {
    "ok"
}

/// One route per slash command, mirroring the Mattermost command setup.
pub fn build_router<S>(state: AppState<S>) -> Router
where
    S: PollStore + VoteStore + 'static,
{
    Router::new()
        .route("/create", post(handlers::create_poll::<S>))
        .route("/vote", post(handlers::submit_vote::<S>))
        .route("/results", post(handlers::get_results::<S>))
        .route("/end", post(handlers::end_poll::<S>))
        .route("/delete", post(handlers::delete_poll::<S>))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
