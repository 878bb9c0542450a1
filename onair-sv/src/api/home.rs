//! Home page live banner

use axum::{extract::State, Json};
use serde::Serialize;

use onair_common::clock::TimeSnapshot;
use onair_common::schedule::LiveStatus;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HomeLiveResponse {
    pub now: TimeSnapshot,
    pub live: LiveStatus,
}

/// GET /api/home/live
///
/// Banner data: the current broadcast time and what is on air, or the
/// explicit off-air state with the next program.
pub async fn home_live(State(state): State<AppState>) -> Json<HomeLiveResponse> {
    let outcome = state.load_schedule().await;
    let now = state.clock_source().current_time();
    let live = LiveStatus::for_week(&outcome.week, &now);

    Json(HomeLiveResponse { now, live })
}
