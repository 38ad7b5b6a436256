//! One-second countdown engine driven by the UI loop.

mod clock;
mod engine;
mod format;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TimerEngine, UpdateCallback, TICK_INTERVAL};
pub use format::format_countdown;
