//! Broadcast schedule engine
//!
//! Data flow: backend rows → [`normalize`] → [`store`] (with [`fallback`]
//! substitution) → [`WeekSchedule`] → [`live`] resolution and the [`axis`]
//! grid projection.

pub mod axis;
pub mod fallback;
pub mod live;
pub mod normalize;
pub mod slot;
pub mod store;
pub mod week;

pub use axis::{build_axis, cell_at, is_cell_live, WeeklyGrid};
pub use fallback::default_week;
pub use live::{find_live_index, find_next_index, live_index_for, LiveStatus, UpNext};
pub use normalize::parse_time_to_minutes;
pub use slot::{ClockTime, ProgramName, ScheduleSlot};
pub use store::{DaySource, LoadOutcome, ScheduleStore};
pub use week::WeekSchedule;
