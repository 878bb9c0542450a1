//! Day-of-week keys for the broadcast week
//!
//! The week is Sunday-first: index 0 is Sunday, index 6 is Saturday. This
//! matches the `day_of_week` column of the backend schedule table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// One of the seven fixed day identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayKey {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayKey {
    /// All day keys in Sunday-first order
    pub const ALL: [DayKey; 7] = [
        DayKey::Sunday,
        DayKey::Monday,
        DayKey::Tuesday,
        DayKey::Wednesday,
        DayKey::Thursday,
        DayKey::Friday,
        DayKey::Saturday,
    ];

    /// Sunday-first index (0 = Sunday)
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day key for a Sunday-first index, `None` outside 0-6
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn from_weekday(weekday: chrono::Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DayKey::Sunday => "sunday",
            DayKey::Monday => "monday",
            DayKey::Tuesday => "tuesday",
            DayKey::Wednesday => "wednesday",
            DayKey::Thursday => "thursday",
            DayKey::Friday => "friday",
            DayKey::Saturday => "saturday",
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayKey {
    type Err = Error;

    /// Accepts a day name (any case, full or three-letter) or a 0-6 index
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<i64>() {
            return Self::from_index(index)
                .ok_or_else(|| Error::InvalidInput(format!("day index out of range: {}", index)));
        }

        let lower = trimmed.to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|day| day.as_str() == lower || (lower.len() == 3 && day.as_str().starts_with(&lower)))
            .ok_or_else(|| Error::InvalidInput(format!("unknown day: {}", s)))
    }
}
