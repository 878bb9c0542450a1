//! Server-Sent Events for live views
//!
//! Each connection is an independent consumer: it loads the week once, owns
//! a clock ticker, and reports its own schedule load, clock ticks and
//! live-program changes. The ticker is released when the client disconnects
//! and the stream is dropped.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tracing::{debug, info, warn};

use onair_common::events::OnAirEvent;
use onair_common::schedule::live_index_for;
use onair_common::{TimeSnapshot, WeekSchedule};

use crate::AppState;

fn to_sse(event: &OnAirEvent) -> Option<Event> {
    Event::default()
        .event(event.event_type())
        .json_data(event)
        .map_err(|e| warn!("Failed to serialise SSE event: {}", e))
        .ok()
}

fn live_change(week: &WeekSchedule, now: &TimeSnapshot) -> OnAirEvent {
    let index = live_index_for(week, now);
    OnAirEvent::LiveProgramChanged {
        day: now.date_key(),
        index,
        program: index.map(|i| week.day(now.date_key())[i].program().clone()),
    }
}

/// GET /events
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("New SSE client connected");

    let stream = async_stream::stream! {
        let outcome = state.load_schedule().await;
        let mut clock = state.clock_source().start();

        let now = clock.current_time();
        let mut last = (now.date_key(), live_index_for(&outcome.week, &now));

        let initial = [
            OnAirEvent::schedule_loaded(&outcome),
            OnAirEvent::ClockTick { snapshot: now.clone() },
            live_change(&outcome.week, &now),
        ];
        for event in initial {
            if let Some(e) = to_sse(&event) {
                yield Ok(e);
            }
        }

        while let Some(now) = clock.changed().await {
            if let Some(e) = to_sse(&OnAirEvent::ClockTick { snapshot: now.clone() }) {
                yield Ok(e);
            }

            let current = (now.date_key(), live_index_for(&outcome.week, &now));
            if current != last {
                debug!(day = %current.0, index = ?current.1, "Live program changed");
                last = current;
                if let Some(e) = to_sse(&live_change(&outcome.week, &now)) {
                    yield Ok(e);
                }
            }
        }

        debug!("SSE clock stopped, closing stream");
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    )
}
