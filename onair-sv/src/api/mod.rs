//! HTTP API handlers for onair-sv

pub mod health;
pub mod home;
pub mod live;
pub mod schedule;
pub mod sse;

pub use health::health_routes;
pub use home::home_live;
pub use live::live_page;
pub use schedule::{day_schedule, week_schedule};
pub use sse::event_stream;
