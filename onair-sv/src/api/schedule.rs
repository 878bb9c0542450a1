//! Schedule page: single day list and weekly grid

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use onair_common::clock::TimeSnapshot;
use onair_common::schedule::{find_live_index, DaySource, ScheduleSlot, WeeklyGrid};
use onair_common::DayKey;

use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DayScheduleResponse {
    pub day: DayKey,
    pub is_today: bool,
    pub source: DaySource,
    pub slots: Vec<ScheduleSlot>,
    /// Only set when `day` is today in the broadcast timezone
    pub live_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct WeekScheduleResponse {
    pub now: TimeSnapshot,
    pub fallback_days: Vec<DayKey>,
    pub grid: WeeklyGrid,
}

/// GET /api/schedule/day/:day
///
/// `day` is a day name (`tuesday`, `tue`) or a Sunday-first index (`2`).
pub async fn day_schedule(
    State(state): State<AppState>,
    Path(day): Path<String>,
) -> ApiResult<Json<DayScheduleResponse>> {
    let day: DayKey = day.parse()?;

    let outcome = state.load_schedule().await;
    let now = state.clock_source().current_time();
    let slots = outcome.week.day(day);
    let is_today = now.date_key() == day;
    let live_index = if is_today {
        find_live_index(slots, now.hours(), now.minutes())
    } else {
        None
    };

    Ok(Json(DayScheduleResponse {
        day,
        is_today,
        source: outcome.source(day),
        slots: slots.to_vec(),
        live_index,
    }))
}

/// GET /api/schedule/week
pub async fn week_schedule(State(state): State<AppState>) -> Json<WeekScheduleResponse> {
    let outcome = state.load_schedule().await;
    let now = state.clock_source().current_time();
    let grid = WeeklyGrid::project(&outcome.week, &now);

    Json(WeekScheduleResponse {
        fallback_days: outcome.fallback_days(),
        grid,
        now,
    })
}
