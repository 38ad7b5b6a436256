// Countdown model
// Seconds counter behind the overlay clock

/// Whether the one-second tick is currently scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerStatus {
    #[default]
    Stopped,
    Running,
}

/// Countdown values in whole seconds.
///
/// `current_value <= reset_value` is not enforced. Both are unsigned, so the
/// counter bottoms out at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CountdownState {
    pub reset_value: u64,
    pub current_value: u64,
    pub running: bool,
}

impl CountdownState {
    pub fn status(&self) -> TimerStatus {
        if self.running {
            TimerStatus::Running
        } else {
            TimerStatus::Stopped
        }
    }
}
