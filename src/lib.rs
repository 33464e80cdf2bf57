// Morrow Library
// Event countdowns: remaining-time arithmetic, list processing and live tickers

pub mod models;
pub mod services;
pub mod utils;

pub use models::countdown::{CountdownPhase, TimeRemaining};
pub use models::event::{Event, EventError, EventFilter, EventVisibility};
pub use services::countdown::{calculate_time_remaining, CountdownBoard, CountdownTicker};
pub use services::event::process_events;
pub use utils::date::DateParseError;
