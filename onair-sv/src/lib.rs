//! onair-sv library - Schedule Viewer service
//!
//! Serves the three schedule consumers of the station site: the home page
//! live banner, the live-TV page and the schedule page. Each request mounts
//! its own clock reading and its own schedule load; they agree because the
//! resolution is deterministic, not because they share state.

use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use onair_common::backend::ScheduleBackend;
use onair_common::clock::{ClockSource, TimeProvider};
use onair_common::schedule::{LoadOutcome, ScheduleStore, WeekSchedule};

pub mod api;
pub mod error;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Read side of the remote data service
    pub backend: Arc<dyn ScheduleBackend>,
    /// Bundled default week
    pub fallback: Arc<WeekSchedule>,
    /// Broadcast-timezone time provider
    pub clock: Arc<dyn TimeProvider>,
    /// Refresh interval for live SSE consumers
    pub tick_interval: Duration,
}

impl AppState {
    pub fn new(
        backend: Arc<dyn ScheduleBackend>,
        clock: Arc<dyn TimeProvider>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            backend,
            fallback: onair_common::schedule::default_week(),
            clock,
            tick_interval,
        }
    }

    /// A clock owned by one consumer
    pub fn clock_source(&self) -> ClockSource {
        ClockSource::new(Arc::clone(&self.clock), self.tick_interval)
    }

    /// Mount a fresh store and load the week once
    pub async fn load_schedule(&self) -> Arc<LoadOutcome> {
        let store = ScheduleStore::new(Arc::clone(&self.backend), Arc::clone(&self.fallback));
        store.load_week().await
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/api/home/live", get(api::home_live))
        .route("/api/live", get(api::live_page))
        .route("/api/schedule/day/:day", get(api::day_schedule))
        .route("/api/schedule/week", get(api::week_schedule))
        .route("/events", get(api::event_stream))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
