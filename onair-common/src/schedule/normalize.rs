//! Time parsing and per-day normalisation
//!
//! Backend rows arrive as loosely formatted strings (`"6:00"`, `"18:30:00"`).
//! Normalisation turns them into [`ScheduleSlot`]s sorted by start minute and
//! reports rows that could not be used and slots that overlap.

use serde::Serialize;
use tracing::warn;

use super::slot::{ProgramName, ScheduleSlot};
use crate::backend::ScheduleRow;
use crate::day::DayKey;
use crate::Result;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

const LAST_MINUTE: u32 = MINUTES_PER_DAY - 1;

/// Split `H:MM`, `HH:MM` or `HH:MM:SS` into hours and minutes.
///
/// Hour 24 is only accepted as `24:00`.
pub(crate) fn parse_clock_components(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.trim().split(':');
    let hours = parse_digits(parts.next()?, 1, 2)?;
    let minutes = parse_digits(parts.next()?, 2, 2)?;
    let seconds = match parts.next() {
        Some(sec) => parse_digits(sec, 2, 2)?,
        None => 0,
    };
    if parts.next().is_some() || minutes > 59 || seconds > 59 {
        return None;
    }
    match hours {
        0..=23 => Some((hours, minutes)),
        24 if minutes == 0 && seconds == 0 => Some((24, 0)),
        _ => None,
    }
}

fn parse_digits(s: &str, min_len: usize, max_len: usize) -> Option<u32> {
    if s.len() < min_len || s.len() > max_len || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Sort key for a `"HH:MM"` string: `hours * 60 + minutes`, always in `[0, 1439]`.
///
/// Lenient by contract: single-digit hours are fine, out-of-range components
/// are clamped and unparseable input sorts first.
pub fn parse_time_to_minutes(time: &str) -> u32 {
    if let Some((hours, minutes)) = parse_clock_components(time) {
        return (hours * 60 + minutes).min(LAST_MINUTE);
    }

    let mut parts = time.trim().split(':');
    let mut component = |max: u32| {
        parts
            .next()
            .map(|p| {
                let digits: String = p.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
                digits.parse::<u32>().unwrap_or(0).min(max)
            })
            .unwrap_or(0)
    };
    let hours = component(23);
    let minutes = component(59);
    hours * 60 + minutes
}

/// Convert one backend row into a slot
pub fn slot_from_row(row: &ScheduleRow) -> Result<ScheduleSlot> {
    let program = ProgramName::new(
        row.program_name_sinhala.clone().unwrap_or_default(),
        row.program_name_english.clone().unwrap_or_default(),
    );
    Ok(ScheduleSlot::new(&row.start_time, &row.end_time, program)?.with_program_ref(row.program_id))
}

/// Stable sort by start minute
pub fn sort_slots(slots: &mut [ScheduleSlot]) {
    slots.sort_by_key(ScheduleSlot::start_minutes);
}

/// Index pairs of overlapping slots in a start-sorted list
pub fn find_overlaps(slots: &[ScheduleSlot]) -> Vec<(usize, usize)> {
    let mut overlaps = Vec::new();
    for (i, slot) in slots.iter().enumerate() {
        for (j, later) in slots.iter().enumerate().skip(i + 1) {
            if later.start_minutes() >= slot.end_minutes() {
                break;
            }
            if slot.overlaps(later) {
                overlaps.push((i, j));
            }
        }
    }
    overlaps
}

/// A row that did not become a slot
#[derive(Debug, Clone, Serialize)]
pub struct DroppedRow {
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

/// What normalisation had to say about one day's rows
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeReport {
    pub dropped: Vec<DroppedRow>,
    pub overlaps: Vec<(usize, usize)>,
}

impl NormalizeReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.overlaps.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedDay {
    pub slots: Vec<ScheduleSlot>,
    pub report: NormalizeReport,
}

/// Normalise the rows of one day.
///
/// Invalid rows (unparseable or crossing midnight) are dropped, as is any
/// row starting at the same minute as an earlier one. Other overlaps are
/// reported but kept; the live resolver picks the first match.
pub fn normalize_day(day: DayKey, rows: &[&ScheduleRow]) -> NormalizedDay {
    let mut report = NormalizeReport::default();
    let mut slots = Vec::with_capacity(rows.len());

    for row in rows {
        match slot_from_row(row) {
            Ok(slot) => slots.push(slot),
            Err(e) => {
                warn!(day = %day, start = %row.start_time, end = %row.end_time, error = %e,
                    "Dropping invalid schedule row");
                report.dropped.push(DroppedRow {
                    start_time: row.start_time.clone(),
                    end_time: row.end_time.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    sort_slots(&mut slots);

    // One slot per start minute; the grid has a single cell per start time
    let mut kept: Vec<ScheduleSlot> = Vec::with_capacity(slots.len());
    for slot in slots {
        match kept.last() {
            Some(previous) if previous.start_minutes() == slot.start_minutes() => {
                warn!(day = %day, start = %slot.start_time(), program = %slot.program().en,
                    "Dropping schedule row with duplicate start time");
                report.dropped.push(DroppedRow {
                    start_time: slot.start_time().to_string(),
                    end_time: slot.end_time().to_string(),
                    reason: format!("duplicate start time {}", slot.start_time()),
                });
            }
            _ => kept.push(slot),
        }
    }
    let slots = kept;

    report.overlaps = find_overlaps(&slots);
    for (a, b) in &report.overlaps {
        warn!(day = %day, first = %slots[*a].start_time(), second = %slots[*b].start_time(),
            "Overlapping schedule slots");
    }

    NormalizedDay { slots, report }
}
