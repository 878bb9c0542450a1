//! Live-TV page

use axum::{extract::State, Json};
use serde::Serialize;

use onair_common::clock::TimeSnapshot;
use onair_common::schedule::{live_index_for, DaySource, LiveStatus, ScheduleSlot};
use onair_common::DayKey;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct LivePageResponse {
    pub now: TimeSnapshot,
    pub today: DayKey,
    pub source: DaySource,
    /// Today's full list, for the "today on air" sidebar
    pub slots: Vec<ScheduleSlot>,
    pub live_index: Option<usize>,
    pub status: LiveStatus,
}

/// GET /api/live
pub async fn live_page(State(state): State<AppState>) -> Json<LivePageResponse> {
    let outcome = state.load_schedule().await;
    let now = state.clock_source().current_time();
    let today = now.date_key();

    let live_index = live_index_for(&outcome.week, &now);
    let status = LiveStatus::for_week(&outcome.week, &now);

    Json(LivePageResponse {
        today,
        source: outcome.source(today),
        slots: outcome.week.day(today).to_vec(),
        live_index,
        status,
        now,
    })
}
