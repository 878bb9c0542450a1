//! # onair Common Library
//!
//! Shared code for the onair broadcast station services:
//! - Broadcast clock in the station timezone
//! - Schedule model, normalisation and the bundled fallback week
//! - Schedule store with per-day fallback
//! - Live program resolution and the weekly grid projection
//! - Backend read contract, events, configuration

pub mod backend;
pub mod clock;
pub mod config;
pub mod day;
pub mod error;
pub mod events;
pub mod schedule;

pub use clock::{ClockSource, TimeProvider, TimeSnapshot};
pub use day::DayKey;
pub use error::{Error, Result};
pub use schedule::{LiveStatus, ScheduleSlot, ScheduleStore, WeekSchedule};
