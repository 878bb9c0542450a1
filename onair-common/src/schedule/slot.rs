//! Schedule slot types
//!
//! [`ScheduleSlot`] is the single shape shared by backend rows, the bundled
//! fallback week and every consumer. Times carry both their display string
//! and their minute-of-day so ordering never re-parses strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::normalize::{parse_clock_components, MINUTES_PER_DAY};
use crate::{Error, Result};

/// A wall-clock time within the broadcast day
///
/// Display form is always zero-padded `HH:MM`. `24:00` is representable
/// (minute 1440) so that a slot can end exactly at midnight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    display: String,
    minutes: u32,
}

impl ClockTime {
    /// Strict parse of `H:MM`, `HH:MM` or `HH:MM:SS` (seconds are dropped)
    pub fn parse(s: &str) -> Result<Self> {
        let (hours, minutes) = parse_clock_components(s)
            .ok_or_else(|| Error::Parse(format!("invalid time '{}'", s)))?;
        Self::from_minutes(hours * 60 + minutes)
    }

    /// Time for a minute-of-day in `0..=1440`
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        if minutes > MINUTES_PER_DAY {
            return Err(Error::Parse(format!("minute of day out of range: {}", minutes)));
        }
        Ok(Self {
            display: format!("{:02}:{:02}", minutes / 60, minutes % 60),
            minutes,
        })
    }

    /// `24:00`
    pub fn end_of_day() -> Self {
        Self {
            display: "24:00".to_string(),
            minutes: MINUTES_PER_DAY,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn minutes(&self) -> u32 {
        self.minutes
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.display
    }
}

/// Bilingual program label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramName {
    /// Sinhala
    pub si: String,
    /// English
    pub en: String,
}

impl ProgramName {
    pub fn new(si: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            si: si.into(),
            en: en.into(),
        }
    }
}

/// One scheduled program occupying `[start, end)` within a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SlotRepr")]
pub struct ScheduleSlot {
    start_time: ClockTime,
    end_time: ClockTime,
    program: ProgramName,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    program_ref: Option<Uuid>,
}

impl ScheduleSlot {
    /// Build a slot from display strings.
    ///
    /// An end of `00:00` means end-of-day. Any other end at or before the
    /// start would cross midnight and is rejected.
    pub fn new(start: &str, end: &str, program: ProgramName) -> Result<Self> {
        let start_time = ClockTime::parse(start)?;
        if start_time.minutes() >= MINUTES_PER_DAY {
            return Err(Error::InvalidInput(format!("slot cannot start at {}", start)));
        }

        let mut end_time = ClockTime::parse(end)?;
        if end_time.minutes() == 0 {
            end_time = ClockTime::end_of_day();
        }

        if end_time.minutes() <= start_time.minutes() {
            return Err(Error::InvalidInput(format!(
                "slot {}-{} crosses midnight or is empty",
                start_time, end_time
            )));
        }

        Ok(Self {
            start_time,
            end_time,
            program,
            program_ref: None,
        })
    }

    pub fn with_program_ref(mut self, program_ref: Option<Uuid>) -> Self {
        self.program_ref = program_ref;
        self
    }

    pub fn start_time(&self) -> &str {
        self.start_time.as_str()
    }

    pub fn end_time(&self) -> &str {
        self.end_time.as_str()
    }

    pub fn start_minutes(&self) -> u32 {
        self.start_time.minutes()
    }

    pub fn end_minutes(&self) -> u32 {
        self.end_time.minutes()
    }

    pub fn program(&self) -> &ProgramName {
        &self.program
    }

    pub fn program_ref(&self) -> Option<Uuid> {
        self.program_ref
    }

    /// Half-open membership: the start minute belongs to this slot, the end minute does not
    pub fn contains_minute(&self, minute_of_day: u32) -> bool {
        self.start_minutes() <= minute_of_day && minute_of_day < self.end_minutes()
    }

    pub fn overlaps(&self, other: &ScheduleSlot) -> bool {
        self.start_minutes() < other.end_minutes() && other.start_minutes() < self.end_minutes()
    }
}

/// Wire form of a slot; deserialisation goes through [`ScheduleSlot::new`]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlotRepr {
    start_time: String,
    end_time: String,
    program: ProgramName,
    #[serde(default)]
    program_ref: Option<Uuid>,
}

impl TryFrom<SlotRepr> for ScheduleSlot {
    type Error = Error;

    fn try_from(repr: SlotRepr) -> Result<Self> {
        Ok(Self::new(&repr.start_time, &repr.end_time, repr.program)?.with_program_ref(repr.program_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program() -> ProgramName {
        ProgramName::new("භාවනා වැඩසටහන", "Meditation")
    }

    #[test]
    fn test_clock_time_canonicalises_display() {
        let t = ClockTime::parse("6:05").unwrap();
        assert_eq!(t.as_str(), "06:05");
        assert_eq!(t.minutes(), 365);

        let t = ClockTime::parse("18:30:00").unwrap();
        assert_eq!(t.as_str(), "18:30");
        assert_eq!(t.minutes(), 1110);
    }

    #[test]
    fn test_clock_time_rejects_garbage() {
        assert!(ClockTime::parse("").is_err());
        assert!(ClockTime::parse("7").is_err());
        assert!(ClockTime::parse("25:00").is_err());
        assert!(ClockTime::parse("12:60").is_err());
        assert!(ClockTime::parse("ab:cd").is_err());
        assert!(ClockTime::parse("24:30").is_err());
    }

    #[test]
    fn test_slot_end_of_midnight_means_end_of_day() {
        let slot = ScheduleSlot::new("23:00", "00:00", program()).unwrap();
        assert_eq!(slot.end_time(), "24:00");
        assert_eq!(slot.end_minutes(), 1440);
        assert!(slot.contains_minute(1439));
    }

    #[test]
    fn test_slot_rejects_cross_midnight_and_empty() {
        assert!(ScheduleSlot::new("23:30", "00:30", program()).is_err());
        assert!(ScheduleSlot::new("08:00", "08:00", program()).is_err());
        assert!(ScheduleSlot::new("09:00", "08:00", program()).is_err());
        assert!(ScheduleSlot::new("24:00", "24:00", program()).is_err());
    }

    #[test]
    fn test_contains_minute_is_half_open() {
        let slot = ScheduleSlot::new("08:00", "09:00", program()).unwrap();
        assert!(slot.contains_minute(480));
        assert!(slot.contains_minute(539));
        assert!(!slot.contains_minute(540));
        assert!(!slot.contains_minute(479));
    }

    #[test]
    fn test_slot_serialises_with_display_strings() {
        let id = Uuid::new_v4();
        let slot = ScheduleSlot::new("7:00", "08:30", program())
            .unwrap()
            .with_program_ref(Some(id));
        let json = serde_json::to_value(&slot).unwrap();

        assert_eq!(json["startTime"], "07:00");
        assert_eq!(json["endTime"], "08:30");
        assert_eq!(json["program"]["en"], "Meditation");
        assert_eq!(json["programRef"], id.to_string());

        let back: ScheduleSlot = serde_json::from_value(json).unwrap();
        assert_eq!(back, slot);
    }

    #[test]
    fn test_deserialise_applies_slot_rules() {
        let slot: ScheduleSlot = serde_json::from_value(serde_json::json!({
            "startTime": "22:00",
            "endTime": "00:00",
            "program": { "si": "si", "en": "Night" }
        }))
        .unwrap();
        assert_eq!(slot.end_minutes(), 1440);
        assert!(slot.contains_minute(1439));

        let wraps = serde_json::from_value::<ScheduleSlot>(serde_json::json!({
            "startTime": "23:30",
            "endTime": "00:30",
            "program": { "si": "si", "en": "Wraps" }
        }));
        assert!(wraps.is_err());
    }
}
