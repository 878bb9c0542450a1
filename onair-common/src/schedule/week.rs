//! Day-keyed weekly schedule

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;

use super::slot::ScheduleSlot;
use crate::day::DayKey;

/// Seven ordered slot lists, Sunday-first
///
/// Built once per load and never patched; a reload produces a new value.
/// Each day's slots are expected in non-decreasing start order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekSchedule {
    days: [Vec<ScheduleSlot>; 7],
}

impl WeekSchedule {
    pub fn new(days: [Vec<ScheduleSlot>; 7]) -> Self {
        Self { days }
    }

    /// Copy of this week with one day replaced
    pub fn with_day(mut self, day: DayKey, slots: Vec<ScheduleSlot>) -> Self {
        self.days[day.index()] = slots;
        self
    }

    pub fn day(&self, day: DayKey) -> &[ScheduleSlot] {
        &self.days[day.index()]
    }

    /// `(day, slots)` pairs in Sunday-first order
    pub fn iter(&self) -> impl Iterator<Item = (DayKey, &[ScheduleSlot])> + '_ {
        DayKey::ALL.iter().map(move |day| (*day, self.day(*day)))
    }

    pub fn total_slots(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }
}

impl Index<DayKey> for WeekSchedule {
    type Output = [ScheduleSlot];

    fn index(&self, day: DayKey) -> &Self::Output {
        self.day(day)
    }
}

impl Serialize for WeekSchedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(7))?;
        for (day, slots) in self.iter() {
            map.serialize_entry(day.as_str(), slots)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::slot::ProgramName;

    fn slot(start: &str, end: &str) -> ScheduleSlot {
        ScheduleSlot::new(start, end, ProgramName::new("si", "en")).unwrap()
    }

    #[test]
    fn test_with_day_replaces_only_that_day() {
        let week = WeekSchedule::default()
            .with_day(DayKey::Monday, vec![slot("06:00", "07:00")])
            .with_day(DayKey::Friday, vec![slot("08:00", "09:00"), slot("09:00", "10:00")]);

        assert_eq!(week[DayKey::Monday].len(), 1);
        assert_eq!(week[DayKey::Friday].len(), 2);
        assert!(week[DayKey::Sunday].is_empty());
        assert_eq!(week.total_slots(), 3);
    }

    #[test]
    fn test_serialises_as_sunday_first_map() {
        let week = WeekSchedule::default().with_day(DayKey::Tuesday, vec![slot("06:00", "07:00")]);
        let json = serde_json::to_value(&week).unwrap();

        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 7);
        assert_eq!(json["tuesday"][0]["startTime"], "06:00");
        assert_eq!(json["sunday"], serde_json::json!([]));
    }
}
