//! Event types for the onair live feed
//!
//! Each SSE connection produces its own events and serialises them for
//! transmission; nothing is shared between connections.

use serde::{Deserialize, Serialize};

use crate::clock::TimeSnapshot;
use crate::day::DayKey;
use crate::schedule::slot::ProgramName;
use crate::schedule::store::LoadOutcome;

/// onair event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OnAirEvent {
    /// Clock refreshed
    ClockTick { snapshot: TimeSnapshot },

    /// The live slot for today changed (including to or from "no live program")
    LiveProgramChanged {
        day: DayKey,
        index: Option<usize>,
        program: Option<ProgramName>,
    },

    /// A consumer finished loading the week
    ScheduleLoaded {
        persisted_days: Vec<DayKey>,
        fallback_days: Vec<DayKey>,
        fetch_failed: bool,
    },
}

impl OnAirEvent {
    pub fn schedule_loaded(outcome: &LoadOutcome) -> Self {
        OnAirEvent::ScheduleLoaded {
            persisted_days: outcome.persisted_days(),
            fallback_days: outcome.fallback_days(),
            fetch_failed: outcome.fetch_failed,
        }
    }

    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            OnAirEvent::ClockTick { .. } => "ClockTick",
            OnAirEvent::LiveProgramChanged { .. } => "LiveProgramChanged",
            OnAirEvent::ScheduleLoaded { .. } => "ScheduleLoaded",
        }
    }
}
