//! Countdown computation and live per-event tickers.

pub mod board;
pub mod clock;
pub mod ticker;
mod time;

pub use board::{BoardSyncResult, CountdownBoard, CountdownSnapshot};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use ticker::{Countdown, CountdownTicker};
pub use time::{calculate_time_remaining, time_remaining_from_now, time_remaining_with};
