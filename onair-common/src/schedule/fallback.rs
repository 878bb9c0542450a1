//! Bundled default week
//!
//! Used for any day the backend has no rows for, and for the whole week when
//! the fetch fails. Entries go through the same [`ScheduleSlot`] constructor
//! as backend rows so both stay on one shape.

use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::error;

use super::slot::{ProgramName, ScheduleSlot};
use super::week::WeekSchedule;
use crate::day::DayKey;

struct DefaultSlot {
    start: &'static str,
    end: &'static str,
    si: &'static str,
    en: &'static str,
}

const fn s(start: &'static str, end: &'static str, si: &'static str, en: &'static str) -> DefaultSlot {
    DefaultSlot { start, end, si, en }
}

const PIRITH: (&str, &str) = ("සෙත් පිරිත් සජ්ඣායනය", "Seth Pirith Chanting");
const MEDITATION: (&str, &str) = ("භාවනා වැඩසටහන", "Meditation");
const SERMON: (&str, &str) = ("ධර්ම දේශනාව", "Dhamma Sermon");
const BUDDHA_POOJA: (&str, &str) = ("බුද්ධ පූජාව", "Buddha Pooja");
const QA: (&str, &str) = ("ප්‍රශ්න සහ පිළිතුරු", "Questions and Answers");
const DISCUSSION: (&str, &str) = ("සවස ධර්ම සාකච්ඡාව", "Evening Dhamma Discussion");
const NIGHT_PIRITH: (&str, &str) = ("රාත්‍රී පිරිත", "Night Pirith");
const DAHAM_PASALA: (&str, &str) = ("ළමා දහම් පාසල", "Children's Dhamma School");
const SUTTA: (&str, &str) = ("සූත්‍ර විග්‍රහය", "Sutta Study");
const GILANPASA: (&str, &str) = ("ගිලන්පස පූජාව", "Gilanpasa Pooja");

macro_rules! day {
    ($(($start:literal, $end:literal, $prog:expr)),* $(,)?) => {
        &[$(s($start, $end, $prog.0, $prog.1)),*]
    };
}

const WEEKDAY: &[DefaultSlot] = day![
    ("05:00", "06:00", PIRITH),
    ("06:00", "07:00", MEDITATION),
    ("07:00", "08:30", SERMON),
    ("11:00", "12:00", BUDDHA_POOJA),
    ("12:00", "13:00", QA),
    ("18:00", "19:30", DISCUSSION),
    ("19:30", "21:00", SERMON),
    ("21:00", "22:00", NIGHT_PIRITH),
];

const WEDNESDAY: &[DefaultSlot] = day![
    ("05:00", "06:00", PIRITH),
    ("06:00", "07:00", MEDITATION),
    ("07:00", "08:30", SERMON),
    ("11:00", "12:00", BUDDHA_POOJA),
    ("12:00", "13:00", QA),
    ("18:00", "19:00", GILANPASA),
    ("19:00", "21:00", SERMON),
    ("21:00", "22:00", NIGHT_PIRITH),
];

const WEEKEND: &[DefaultSlot] = day![
    ("05:00", "06:00", PIRITH),
    ("06:00", "07:00", MEDITATION),
    ("08:00", "10:00", DAHAM_PASALA),
    ("10:00", "11:30", SERMON),
    ("11:30", "12:30", BUDDHA_POOJA),
    ("14:00", "15:30", SUTTA),
    ("18:30", "20:00", DISCUSSION),
    ("20:00", "21:30", SERMON),
    ("21:30", "22:30", NIGHT_PIRITH),
];

fn defaults_for(day: DayKey) -> &'static [DefaultSlot] {
    match day {
        DayKey::Sunday | DayKey::Saturday => WEEKEND,
        DayKey::Wednesday => WEDNESDAY,
        _ => WEEKDAY,
    }
}

fn build_day(day: DayKey) -> Vec<ScheduleSlot> {
    defaults_for(day)
        .iter()
        .filter_map(|d| match ScheduleSlot::new(d.start, d.end, ProgramName::new(d.si, d.en)) {
            Ok(slot) => Some(slot),
            Err(e) => {
                error!(day = %day, start = d.start, error = %e, "Invalid bundled default slot");
                None
            }
        })
        .collect()
}

static DEFAULT_WEEK: Lazy<Arc<WeekSchedule>> = Lazy::new(|| {
    Arc::new(WeekSchedule::new(DayKey::ALL.map(build_day)))
});

/// The bundled default week
pub fn default_week() -> Arc<WeekSchedule> {
    Arc::clone(&DEFAULT_WEEK)
}

/// The bundled default slots for one day
pub fn default_day(day: DayKey) -> Vec<ScheduleSlot> {
    DEFAULT_WEEK.day(day).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::normalize::find_overlaps;

    #[test]
    fn test_every_default_entry_is_valid() {
        for day in DayKey::ALL {
            assert_eq!(default_week().day(day).len(), defaults_for(day).len(), "{}", day);
        }
    }

    #[test]
    fn test_every_day_has_programs() {
        let week = default_week();
        for (day, slots) in week.iter() {
            assert!(!slots.is_empty(), "{} has no default programs", day);
        }
    }

    #[test]
    fn test_defaults_are_sorted_and_non_overlapping() {
        let week = default_week();
        for (day, slots) in week.iter() {
            assert!(
                slots.windows(2).all(|w| w[0].start_minutes() <= w[1].start_minutes()),
                "{} is not sorted",
                day
            );
            assert!(find_overlaps(slots).is_empty(), "{} has overlaps", day);
        }
    }

    #[test]
    fn test_default_day_matches_week() {
        assert_eq!(default_day(DayKey::Saturday), default_week()[DayKey::Saturday].to_vec());
        assert_ne!(default_day(DayKey::Wednesday), default_day(DayKey::Tuesday));
    }
}
