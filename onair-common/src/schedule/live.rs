//! Live slot resolution
//!
//! Pure functions over one day's slot list. Every consumer that needs "what
//! is on air now" goes through [`find_live_index`], so the home banner, the
//! live page and the schedule page agree for the same inputs.

use serde::Serialize;

use super::slot::ScheduleSlot;
use super::week::WeekSchedule;
use crate::clock::TimeSnapshot;

/// Out-of-range components saturate past the end of the day instead of wrapping
fn minute_of_day(hours: u32, minutes: u32) -> u32 {
    hours.saturating_mul(60).saturating_add(minutes)
}

/// Index of the slot airing at `hours:minutes`, or `None` in a gap.
///
/// A slot is live on `[start, end)`: at an exact boundary the starting slot
/// wins. Slots are assumed sorted and non-overlapping; with overlaps the
/// first match is returned.
pub fn find_live_index(slots: &[ScheduleSlot], hours: u32, minutes: u32) -> Option<usize> {
    let now = minute_of_day(hours, minutes);
    slots.iter().position(|slot| slot.contains_minute(now))
}

/// Index of the first slot starting strictly after `hours:minutes`
pub fn find_next_index(slots: &[ScheduleSlot], hours: u32, minutes: u32) -> Option<usize> {
    let now = minute_of_day(hours, minutes);
    slots.iter().position(|slot| slot.start_minutes() > now)
}

/// Live index for today's column of a week
pub fn live_index_for(week: &WeekSchedule, now: &TimeSnapshot) -> Option<usize> {
    find_live_index(week.day(now.date_key()), now.hours(), now.minutes())
}

/// The upcoming slot on today's list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpNext {
    pub index: usize,
    pub slot: ScheduleSlot,
    pub starts_in_minutes: u32,
}

/// What is on air, as the rendering layer consumes it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LiveStatus {
    OnAir {
        index: usize,
        slot: ScheduleSlot,
        minutes_remaining: u32,
        next: Option<UpNext>,
    },
    /// Explicit "no live program" state
    OffAir { next: Option<UpNext> },
}

impl LiveStatus {
    pub fn resolve(slots: &[ScheduleSlot], now: &TimeSnapshot) -> Self {
        let minute = now.minute_of_day();
        let next = find_next_index(slots, now.hours(), now.minutes()).map(|index| UpNext {
            index,
            slot: slots[index].clone(),
            starts_in_minutes: slots[index].start_minutes() - minute,
        });

        match find_live_index(slots, now.hours(), now.minutes()) {
            Some(index) => LiveStatus::OnAir {
                index,
                slot: slots[index].clone(),
                minutes_remaining: slots[index].end_minutes() - minute,
                next,
            },
            None => LiveStatus::OffAir { next },
        }
    }

    /// Resolve against today's list in `week`
    pub fn for_week(week: &WeekSchedule, now: &TimeSnapshot) -> Self {
        Self::resolve(week.day(now.date_key()), now)
    }

    pub fn live_index(&self) -> Option<usize> {
        match self {
            LiveStatus::OnAir { index, .. } => Some(*index),
            LiveStatus::OffAir { .. } => None,
        }
    }

    pub fn is_on_air(&self) -> bool {
        matches!(self, LiveStatus::OnAir { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::DayKey;
    use crate::schedule::slot::ProgramName;

    fn slot(start: &str, end: &str, en: &str) -> ScheduleSlot {
        ScheduleSlot::new(start, end, ProgramName::new("si", en)).unwrap()
    }

    fn morning() -> Vec<ScheduleSlot> {
        vec![slot("06:00", "07:00", "Meditation"), slot("07:00", "08:30", "Sermon")]
    }

    #[test]
    fn test_boundary_belongs_to_starting_slot() {
        let slots = vec![slot("08:00", "09:00", "A")];
        assert_eq!(find_live_index(&slots, 8, 0), Some(0));
        assert_eq!(find_live_index(&slots, 8, 59), Some(0));
        assert_eq!(find_live_index(&slots, 9, 0), None);

        let back_to_back = vec![slot("08:00", "09:00", "A"), slot("09:00", "10:00", "B")];
        assert_eq!(find_live_index(&back_to_back, 9, 0), Some(1));
    }

    #[test]
    fn test_out_of_range_time_does_not_overflow() {
        let slots = vec![slot("23:00", "24:00", "Late")];
        assert_eq!(find_live_index(&slots, u32::MAX, u32::MAX), None);
        assert_eq!(find_next_index(&slots, u32::MAX, 0), None);
        assert_eq!(find_live_index(&slots, 24, 0), None);
    }

    #[test]
    fn test_morning_scenario() {
        let slots = morning();
        assert_eq!(find_live_index(&slots, 7, 15), Some(1));
        assert_eq!(slots[1].program().en, "Sermon");
        assert_eq!(find_live_index(&slots, 6, 0), Some(0));
        assert_eq!(find_live_index(&slots, 5, 59), None);
    }

    #[test]
    fn test_none_for_empty_list_and_gaps() {
        assert_eq!(find_live_index(&[], 12, 0), None);

        let slots = vec![slot("06:00", "07:00", "A"), slot("09:00", "10:00", "B")];
        assert_eq!(find_live_index(&slots, 5, 0), None);
        assert_eq!(find_live_index(&slots, 8, 0), None);
        assert_eq!(find_live_index(&slots, 22, 0), None);
    }

    #[test]
    fn test_first_match_wins_on_overlap() {
        let slots = vec![slot("06:00", "08:00", "A"), slot("07:00", "09:00", "B")];
        assert_eq!(find_live_index(&slots, 7, 30), Some(0));
    }

    #[test]
    fn test_find_next_index() {
        let slots = morning();
        assert_eq!(find_next_index(&slots, 5, 0), Some(0));
        assert_eq!(find_next_index(&slots, 6, 0), Some(1));
        assert_eq!(find_next_index(&slots, 7, 0), None);
    }

    #[test]
    fn test_status_on_air_and_off_air() {
        let slots = morning();

        let on_air = LiveStatus::resolve(&slots, &TimeSnapshot::new(7, 15, DayKey::Monday).unwrap());
        match &on_air {
            LiveStatus::OnAir { index, minutes_remaining, next, .. } => {
                assert_eq!(*index, 1);
                assert_eq!(*minutes_remaining, 75);
                assert!(next.is_none());
            }
            other => panic!("expected on air, got {:?}", other),
        }

        let off_air = LiveStatus::resolve(&slots, &TimeSnapshot::new(5, 30, DayKey::Monday).unwrap());
        assert_eq!(off_air.live_index(), None);
        match off_air {
            LiveStatus::OffAir { next: Some(next) } => {
                assert_eq!(next.index, 0);
                assert_eq!(next.starts_in_minutes, 30);
            }
            other => panic!("expected off air with next, got {:?}", other),
        }
    }

    #[test]
    fn test_for_week_uses_today_only() {
        let week = WeekSchedule::default().with_day(DayKey::Tuesday, morning());
        let tuesday = TimeSnapshot::new(6, 30, DayKey::Tuesday).unwrap();
        let wednesday = TimeSnapshot::new(6, 30, DayKey::Wednesday).unwrap();

        assert_eq!(live_index_for(&week, &tuesday), Some(0));
        assert_eq!(live_index_for(&week, &wednesday), None);
        assert!(LiveStatus::for_week(&week, &tuesday).is_on_air());
        assert!(!LiveStatus::for_week(&week, &wednesday).is_on_air());
    }

    #[test]
    fn test_status_serialises_with_state_tag() {
        let status = LiveStatus::OffAir { next: None };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["state"], "off_air");
    }
}
