//! Schedule store: one fetch, per-day fallback
//!
//! The store loads the persisted week once per consumer. Any day without
//! usable rows takes the bundled default for that day; a failed fetch takes
//! the bundled default for the whole week. Consumers never see an empty
//! schedule caused by a backend problem.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::normalize::{normalize_day, NormalizeReport};
use super::week::WeekSchedule;
use crate::backend::{ScheduleBackend, ScheduleRow};
use crate::day::DayKey;

/// Where one day's slots came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DaySource {
    Persisted,
    Fallback,
}

/// Result of one `load_week` call
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub week: Arc<WeekSchedule>,
    pub sources: [DaySource; 7],
    pub fetch_failed: bool,
    pub reports: BTreeMap<DayKey, NormalizeReport>,
}

impl LoadOutcome {
    /// Whole week from the bundled defaults
    pub fn all_fallback(fallback: Arc<WeekSchedule>) -> Self {
        Self {
            week: fallback,
            sources: [DaySource::Fallback; 7],
            fetch_failed: true,
            reports: BTreeMap::new(),
        }
    }

    pub fn source(&self, day: DayKey) -> DaySource {
        self.sources[day.index()]
    }

    pub fn persisted_days(&self) -> Vec<DayKey> {
        self.days_from(DaySource::Persisted)
    }

    pub fn fallback_days(&self) -> Vec<DayKey> {
        self.days_from(DaySource::Fallback)
    }

    fn days_from(&self, source: DaySource) -> Vec<DayKey> {
        DayKey::ALL
            .iter()
            .copied()
            .filter(|day| self.source(*day) == source)
            .collect()
    }
}

/// Group fetched rows by day and substitute the fallback for empty days
pub fn merge_with_fallback(rows: &[ScheduleRow], fallback: &WeekSchedule) -> LoadOutcome {
    let mut by_day: [Vec<&ScheduleRow>; 7] = Default::default();
    for row in rows {
        match DayKey::from_index(row.day_of_week) {
            Some(day) => by_day[day.index()].push(row),
            None => warn!(day_of_week = row.day_of_week, start = %row.start_time,
                "Ignoring schedule row with invalid day_of_week"),
        }
    }

    let mut sources = [DaySource::Fallback; 7];
    let mut reports = BTreeMap::new();
    let days = DayKey::ALL.map(|day| {
        let normalized = normalize_day(day, &by_day[day.index()]);
        if !normalized.report.is_clean() {
            reports.insert(day, normalized.report);
        }

        if normalized.slots.is_empty() {
            debug!(day = %day, "No persisted rows, using bundled default");
            fallback.day(day).to_vec()
        } else {
            sources[day.index()] = DaySource::Persisted;
            normalized.slots
        }
    });

    LoadOutcome {
        week: Arc::new(WeekSchedule::new(days)),
        sources,
        fetch_failed: false,
        reports,
    }
}

/// Loads and holds the week for one consumer
pub struct ScheduleStore {
    backend: Arc<dyn ScheduleBackend>,
    fallback: Arc<WeekSchedule>,
    loading: watch::Sender<bool>,
    current: RwLock<Option<Arc<LoadOutcome>>>,
}

impl ScheduleStore {
    /// New store in the loading state; call [`load_week`](Self::load_week) to settle it
    pub fn new(backend: Arc<dyn ScheduleBackend>, fallback: Arc<WeekSchedule>) -> Self {
        let (loading, _) = watch::channel(true);
        Self {
            backend,
            fallback,
            loading,
            current: RwLock::new(None),
        }
    }

    /// Fetch once and build a complete week. Never fails.
    pub async fn load_week(&self) -> Arc<LoadOutcome> {
        self.loading.send_replace(true);

        let outcome = match self.backend.fetch_rows().await {
            Ok(rows) => merge_with_fallback(&rows, &self.fallback),
            Err(e) => {
                warn!(error = %e, "Schedule fetch failed, using bundled default week");
                LoadOutcome::all_fallback(Arc::clone(&self.fallback))
            }
        };
        let outcome = Arc::new(outcome);

        info!(
            persisted = outcome.persisted_days().len(),
            fallback = outcome.fallback_days().len(),
            fetch_failed = outcome.fetch_failed,
            "Schedule loaded"
        );

        {
            let mut current = self.current.write().unwrap_or_else(|p| p.into_inner());
            *current = Some(Arc::clone(&outcome));
        }
        self.loading.send_replace(false);

        outcome
    }

    /// True until the first load settles, and again while a reload is in flight
    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Watch the loading flag
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Resolve once no load is in flight and data is present
    pub async fn wait_loaded(&self) -> Option<Arc<LoadOutcome>> {
        let mut rx = self.loading.subscribe();
        rx.wait_for(|loading| !*loading).await.ok()?;
        self.current()
    }

    /// Last fully loaded outcome
    pub fn current(&self) -> Option<Arc<LoadOutcome>> {
        self.current
            .read()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    /// Last fully loaded week
    pub fn week(&self) -> Option<Arc<WeekSchedule>> {
        self.current().map(|outcome| Arc::clone(&outcome.week))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::fallback::default_week;

    fn row(day: i64, start: &str, end: &str, en: &str) -> ScheduleRow {
        ScheduleRow {
            day_of_week: day,
            start_time: start.to_string(),
            end_time: end.to_string(),
            program_name_sinhala: Some("si".to_string()),
            program_name_english: Some(en.to_string()),
            program_id: None,
        }
    }

    #[test]
    fn test_merge_substitutes_only_empty_days() {
        let rows = vec![row(1, "06:00", "07:00", "Persisted Monday")];
        let outcome = merge_with_fallback(&rows, &default_week());

        assert_eq!(outcome.persisted_days(), vec![DayKey::Monday]);
        assert_eq!(outcome.fallback_days().len(), 6);
        assert_eq!(outcome.week[DayKey::Monday].len(), 1);
        assert_eq!(outcome.week[DayKey::Sunday], default_week()[DayKey::Sunday]);
        assert!(!outcome.fetch_failed);
    }

    #[test]
    fn test_merge_ignores_out_of_range_days() {
        let rows = vec![row(7, "06:00", "07:00", "Nowhere"), row(-1, "06:00", "07:00", "Never")];
        let outcome = merge_with_fallback(&rows, &default_week());
        assert!(outcome.persisted_days().is_empty());
        assert_eq!(*outcome.week, *default_week());
    }

    #[test]
    fn test_day_with_only_invalid_rows_falls_back() {
        let rows = vec![row(4, "23:30", "00:30", "Wraps")];
        let outcome = merge_with_fallback(&rows, &default_week());

        assert_eq!(outcome.source(DayKey::Thursday), DaySource::Fallback);
        assert_eq!(outcome.week[DayKey::Thursday], default_week()[DayKey::Thursday]);
        assert_eq!(outcome.reports[&DayKey::Thursday].dropped.len(), 1);
    }

    #[tokio::test]
    async fn test_store_starts_loading_and_settles_once() {
        let store = ScheduleStore::new(
            Arc::new(crate::backend::StaticBackend::empty()),
            default_week(),
        );
        assert!(store.is_loading());
        assert!(store.current().is_none());

        let mut rx = store.subscribe_loading();
        let outcome = store.load_week().await;

        assert!(!store.is_loading());
        assert!(rx.has_changed().unwrap());
        assert!(!*rx.borrow_and_update());
        assert_eq!(outcome.fallback_days().len(), 7);
        assert!(!outcome.fetch_failed);
        assert!(store.week().is_some());
    }
}
