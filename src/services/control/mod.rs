//! Control window input handling: time-field parsing and the command
//! adapter that forwards user actions to settings and the timer.

mod input;
mod surface;

pub use input::{next_occurrence, parse_clock_time, parse_preset_duration, InputError};
pub use surface::{ControlCommand, ControlError, ControlOutcome, ControlSurface};
