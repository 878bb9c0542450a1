//! Broadcast clock
//!
//! All "now" and "today" decisions are made in the station's fixed broadcast
//! timezone, never in the viewer's or the host's local zone. The clock is an
//! injectable [`TimeProvider`]; each consumer owns its own [`ClockSource`]
//! ticker so there is no shared global clock.
//!
//! # Example
//!
//! ```
//! use onair_common::clock::{BroadcastClock, TimeProvider};
//! use chrono::{TimeZone, Utc};
//!
//! let clock = BroadcastClock::new(chrono_tz::Asia::Colombo);
//! // 2024-06-02 00:45 UTC is Sunday 06:15 in Colombo (UTC+05:30)
//! let instant = Utc.with_ymd_and_hms(2024, 6, 2, 0, 45, 0).unwrap();
//! let snapshot = clock.snapshot_at(instant);
//! assert_eq!(snapshot.formatted_time(), "06:15");
//! assert_eq!(snapshot.day_of_week(), 0);
//! ```

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use crate::day::DayKey;
use crate::{Error, Result};

/// Default tick interval used by the page-level consumers
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(30_000);

const MIN_TICK_INTERVAL: Duration = Duration::from_millis(10);

/// Wall-clock reading in the broadcast timezone
///
/// Recomputed wholesale on each tick and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SnapshotRepr")]
pub struct TimeSnapshot {
    hours: u32,
    minutes: u32,
    day_of_week: u32,
    formatted_time: String,
    date_key: DayKey,
}

impl TimeSnapshot {
    /// Build a snapshot from explicit components
    pub fn new(hours: u32, minutes: u32, day: DayKey) -> Result<Self> {
        if hours > 23 || minutes > 59 {
            return Err(Error::InvalidInput(format!(
                "time out of range: {}:{:02}",
                hours, minutes
            )));
        }
        Ok(Self {
            hours,
            minutes,
            day_of_week: day.index() as u32,
            formatted_time: format!("{:02}:{:02}", hours, minutes),
            date_key: day,
        })
    }

    /// Snapshot of a zoned date-time; the calendar fields are read in that zone
    pub fn from_datetime<Z: TimeZone>(dt: &DateTime<Z>) -> Self {
        let day = DayKey::from_weekday(dt.weekday());
        Self {
            hours: dt.hour(),
            minutes: dt.minute(),
            day_of_week: day.index() as u32,
            formatted_time: format!("{:02}:{:02}", dt.hour(), dt.minute()),
            date_key: day,
        }
    }

    pub fn hours(&self) -> u32 {
        self.hours
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// 0 = Sunday
    pub fn day_of_week(&self) -> u32 {
        self.day_of_week
    }

    /// Zero-padded `HH:MM`
    pub fn formatted_time(&self) -> &str {
        &self.formatted_time
    }

    pub fn date_key(&self) -> DayKey {
        self.date_key
    }

    pub fn minute_of_day(&self) -> u32 {
        self.hours * 60 + self.minutes
    }
}

/// Wire form of a snapshot; the derived fields are recomputed on the way in
#[derive(Deserialize)]
struct SnapshotRepr {
    hours: u32,
    minutes: u32,
    date_key: DayKey,
}

impl TryFrom<SnapshotRepr> for TimeSnapshot {
    type Error = Error;

    fn try_from(repr: SnapshotRepr) -> Result<Self> {
        Self::new(repr.hours, repr.minutes, repr.date_key)
    }
}

/// Source of the current broadcast time
pub trait TimeProvider: Send + Sync {
    fn now(&self) -> TimeSnapshot;
}

/// System clock re-expressed in the broadcast timezone
#[derive(Debug, Clone, Copy)]
pub struct BroadcastClock {
    zone: Option<Tz>,
}

impl BroadcastClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone: Some(zone) }
    }

    /// Resolve an IANA zone name such as `Asia/Colombo`
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|e| Error::Config(format!("unknown timezone '{}': {}", name, e)))
    }

    /// Host-local clock, the degraded mode used when no zone data is available
    pub fn local() -> Self {
        warn!("Broadcast timezone unavailable, falling back to host local time");
        Self { zone: None }
    }

    pub fn zone(&self) -> Option<Tz> {
        self.zone
    }

    /// Snapshot for a given instant
    pub fn snapshot_at(&self, instant: DateTime<Utc>) -> TimeSnapshot {
        match self.zone {
            Some(zone) => TimeSnapshot::from_datetime(&instant.with_timezone(&zone)),
            None => TimeSnapshot::from_datetime(&instant.with_timezone(&Local)),
        }
    }
}

impl TimeProvider for BroadcastClock {
    fn now(&self) -> TimeSnapshot {
        self.snapshot_at(Utc::now())
    }
}

/// Settable clock for tests and previews
#[derive(Debug)]
pub struct FixedClock {
    snapshot: RwLock<TimeSnapshot>,
}

impl FixedClock {
    pub fn new(snapshot: TimeSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    /// Convenience constructor; panics on out-of-range components
    pub fn at(hours: u32, minutes: u32, day: DayKey) -> Self {
        match TimeSnapshot::new(hours, minutes, day) {
            Ok(snapshot) => Self::new(snapshot),
            Err(e) => panic!("invalid fixed clock time: {}", e),
        }
    }

    pub fn set(&self, snapshot: TimeSnapshot) {
        let mut guard = self.snapshot.write().unwrap_or_else(|p| p.into_inner());
        *guard = snapshot;
    }
}

impl TimeProvider for FixedClock {
    fn now(&self) -> TimeSnapshot {
        self.snapshot
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

/// Periodic broadcast-time source owned by one consumer
#[derive(Clone)]
pub struct ClockSource {
    provider: Arc<dyn TimeProvider>,
    interval: Duration,
}

impl ClockSource {
    pub fn new(provider: Arc<dyn TimeProvider>, interval: Duration) -> Self {
        Self {
            provider,
            interval: interval.max(MIN_TICK_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One-off reading without starting a timer
    pub fn current_time(&self) -> TimeSnapshot {
        self.provider.now()
    }

    /// Start ticking. The timer lives exactly as long as the returned guard.
    ///
    /// Must be called within a Tokio runtime.
    pub fn start(&self) -> ClockGuard {
        let (tx, rx) = watch::channel(self.provider.now());
        let provider = Arc::clone(&self.provider);
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut tick = interval_at(Instant::now() + period, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                if tx.send(provider.now()).is_err() {
                    break;
                }
            }
        });

        debug!(interval_ms = period.as_millis() as u64, "Clock ticker started");
        ClockGuard { rx, task }
    }
}

/// Running ticker; dropping it cancels the timer
pub struct ClockGuard {
    rx: watch::Receiver<TimeSnapshot>,
    task: JoinHandle<()>,
}

impl ClockGuard {
    /// Latest snapshot
    pub fn current_time(&self) -> TimeSnapshot {
        self.rx.borrow().clone()
    }

    /// Wait for the next tick; `None` once the ticker has stopped
    pub async fn changed(&mut self) -> Option<TimeSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Extra receiver for the same ticker
    pub fn subscribe(&self) -> watch::Receiver<TimeSnapshot> {
        self.rx.clone()
    }
}

impl Drop for ClockGuard {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Clock ticker stopped");
    }
}
