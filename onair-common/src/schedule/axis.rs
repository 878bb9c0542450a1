//! Weekly grid projection
//!
//! Each day's list is independently shaped, so the grid uses a shared row
//! axis: the sorted, de-duplicated union of every start time in the week. A
//! cell holds the slot starting exactly at its row time, or nothing. Slots
//! never span rows; intermediate rows introduced by other days stay empty.

use serde::Serialize;
use std::collections::BTreeMap;

use super::live::live_index_for;
use super::slot::ScheduleSlot;
use super::week::WeekSchedule;
use crate::clock::TimeSnapshot;
use crate::day::DayKey;

/// Sorted unique start times across any set of day lists
pub fn build_axis_from<'a, I>(days: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [ScheduleSlot]>,
{
    let mut times: BTreeMap<u32, &'a str> = BTreeMap::new();
    for slot in days.into_iter().flatten() {
        times.entry(slot.start_minutes()).or_insert(slot.start_time());
    }
    times.into_values().map(str::to_string).collect()
}

/// Row axis of the weekly grid
pub fn build_axis(week: &WeekSchedule) -> Vec<String> {
    build_axis_from(week.iter().map(|(_, slots)| slots))
}

/// Index of the slot in `day_slots` starting exactly at `axis_time`
pub fn cell_index_at(day_slots: &[ScheduleSlot], axis_time: &str) -> Option<usize> {
    day_slots.iter().position(|slot| slot.start_time() == axis_time)
}

/// Like [`cell_index_at`], but the live slot wins when several slots share
/// a start time, so the live page and the grid always agree.
fn today_cell_index(day_slots: &[ScheduleSlot], axis_time: &str, live_index: Option<usize>) -> Option<usize> {
    live_index
        .filter(|&i| day_slots.get(i).is_some_and(|slot| slot.start_time() == axis_time))
        .or_else(|| cell_index_at(day_slots, axis_time))
}

/// Slot in `day_slots` starting exactly at `axis_time`
pub fn cell_at<'a>(day_slots: &'a [ScheduleSlot], axis_time: &str) -> Option<&'a ScheduleSlot> {
    cell_index_at(day_slots, axis_time).map(|i| &day_slots[i])
}

/// Whether the cell holding `slot_index` of `day` is the live one
///
/// `live_index` is only meaningful for `today`; other columns are never live.
pub fn is_cell_live(
    day: DayKey,
    slot_index: Option<usize>,
    today: DayKey,
    live_index: Option<usize>,
) -> bool {
    day == today && slot_index.is_some() && slot_index == live_index
}

#[derive(Debug, Clone, Serialize)]
pub struct GridCell {
    pub day: DayKey,
    pub slot: Option<ScheduleSlot>,
    pub live: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub time: String,
    /// Sunday-first, always seven entries
    pub cells: Vec<GridCell>,
}

/// 7 x N projection of a week for the schedule page
#[derive(Debug, Clone, Serialize)]
pub struct WeeklyGrid {
    pub today: DayKey,
    pub live_index: Option<usize>,
    pub rows: Vec<GridRow>,
}

impl WeeklyGrid {
    pub fn project(week: &WeekSchedule, now: &TimeSnapshot) -> Self {
        let today = now.date_key();
        let live_index = live_index_for(week, now);

        let rows = build_axis(week)
            .into_iter()
            .map(|time| {
                let cells = week
                    .iter()
                    .map(|(day, slots)| {
                        let index = if day == today {
                            today_cell_index(slots, &time, live_index)
                        } else {
                            cell_index_at(slots, &time)
                        };
                        GridCell {
                            day,
                            slot: index.map(|i| slots[i].clone()),
                            live: is_cell_live(day, index, today, live_index),
                        }
                    })
                    .collect();
                GridRow { time, cells }
            })
            .collect();

        Self {
            today,
            live_index,
            rows,
        }
    }

    pub fn axis(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.time.as_str())
    }

    /// The single live cell, if any
    pub fn live_cell(&self) -> Option<&GridCell> {
        self.rows.iter().flat_map(|row| row.cells.iter()).find(|cell| cell.live)
    }
}
