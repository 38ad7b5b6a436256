use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

use super::clock::Clock;
use super::format::format_countdown;
use crate::models::countdown::{CountdownState, TimerStatus};

/// Interval between countdown ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Receives the formatted countdown text whenever it changes.
pub type UpdateCallback = Box<dyn FnMut(&str)>;

/// Countdown state plus the one-second tick schedule.
///
/// The engine owns no thread. The UI loop calls [`poll`](Self::poll) every
/// frame and every elapsed second fires one tick.
pub struct TimerEngine {
    state: CountdownState,
    next_tick: Option<Instant>,
    clock: Box<dyn Clock>,
    on_update: Option<UpdateCallback>,
    text: String,
}

impl TimerEngine {
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            state: CountdownState::default(),
            next_tick: None,
            clock,
            on_update: None,
            text: format_countdown(0),
        }
    }

    /// Replaces the update callback. Only one callback is kept.
    pub fn set_update_callback(&mut self, callback: impl FnMut(&str) + 'static) {
        self.on_update = Some(Box::new(callback));
    }

    pub fn set_countdown(&mut self, duration: Duration) {
        let seconds = duration.as_secs();
        self.state.reset_value = seconds;
        self.state.current_value = seconds;
        log::debug!("Countdown set to {}s", seconds);

        self.publish();
        if self.state.running {
            self.restart_schedule();
        }
    }

    /// Counts down to `target`. Returns `false` and changes nothing when the
    /// target is not in the future.
    pub fn set_countdown_to_time(&mut self, target: DateTime<Local>) -> bool {
        let now = self.clock.now();
        let remaining = target.signed_duration_since(now);
        if remaining <= chrono::Duration::zero() {
            log::debug!("Ignoring countdown target {} (now {})", target, now);
            return false;
        }

        match remaining.to_std() {
            Ok(duration) => {
                self.set_countdown(duration);
                true
            }
            Err(err) => {
                log::warn!("Countdown target {} out of range: {}", target, err);
                false
            }
        }
    }

    pub fn start(&mut self) {
        if self.state.running {
            return;
        }
        self.state.running = true;
        self.restart_schedule();
        log::debug!("Countdown started at {}s", self.state.current_value);
    }

    pub fn stop(&mut self) {
        if !self.state.running {
            return;
        }
        self.state.running = false;
        self.next_tick = None;
        log::debug!("Countdown stopped at {}s", self.state.current_value);
    }

    /// Restores the last preset. While running, the next tick comes one full
    /// interval after the reset.
    pub fn reset(&mut self) {
        self.state.current_value = self.state.reset_value;
        self.publish();
        if self.state.running {
            self.restart_schedule();
        }
    }

    /// Fires every tick that became due since the last poll and returns how
    /// many fired.
    pub fn poll(&mut self) -> u32 {
        let now = self.clock.instant();
        let mut fired = 0;
        while let Some(deadline) = self.next_tick {
            if now < deadline {
                break;
            }
            self.tick();
            self.next_tick = Some(deadline + TICK_INTERVAL);
            fired += 1;
        }
        fired
    }

    /// Time left until the next scheduled tick, `None` while stopped.
    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.next_tick
            .map(|deadline| deadline.saturating_duration_since(self.clock.instant()))
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    /// The current countdown as `HH:MM:SS`.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Wall-clock time as seen by the engine's clock.
    pub fn now(&self) -> DateTime<Local> {
        self.clock.now()
    }

    fn tick(&mut self) {
        // Keeps firing at zero without stopping the schedule.
        if self.state.current_value > 0 {
            self.state.current_value -= 1;
            self.publish();
        }
    }

    fn restart_schedule(&mut self) {
        self.next_tick = Some(self.clock.instant() + TICK_INTERVAL);
    }

    fn publish(&mut self) {
        self.text = format_countdown(self.state.current_value);
        if let Some(callback) = self.on_update.as_mut() {
            callback(&self.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::timer::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn engine() -> (TimerEngine, ManualClock) {
        let clock = ManualClock::new(Local::now());
        let engine = TimerEngine::new(Box::new(clock.clone()));
        (engine, clock)
    }

    fn recorder(engine: &mut TimerEngine) -> Rc<RefCell<Vec<String>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.set_update_callback(move |text| sink.borrow_mut().push(text.to_string()));
        seen
    }

    #[test]
    fn test_initial_state_is_stopped_at_zero() {
        let (engine, _) = engine();
        assert_eq!(engine.status(), TimerStatus::Stopped);
        assert_eq!(engine.text(), "00:00:00");
        assert_eq!(engine.time_until_next_tick(), None);
    }

    #[test]
    fn test_set_countdown_publishes_immediately() {
        let (mut engine, _) = engine();
        let seen = recorder(&mut engine);

        engine.set_countdown(Duration::from_secs(300));

        assert_eq!(engine.state().reset_value, 300);
        assert_eq!(engine.state().current_value, 300);
        assert_eq!(seen.borrow().as_slice(), ["00:05:00"]);
    }

    #[test]
    fn test_no_ticks_while_stopped() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(10));
        clock.advance_secs(5);
        assert_eq!(engine.poll(), 0);
        assert_eq!(engine.state().current_value, 10);
    }

    #[test]
    fn test_tick_decrements_once_per_second() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(3));
        engine.start();

        clock.advance(Duration::from_millis(999));
        assert_eq!(engine.poll(), 0);

        clock.advance(Duration::from_millis(1));
        assert_eq!(engine.poll(), 1);
        assert_eq!(engine.text(), "00:00:02");
    }

    #[test]
    fn test_stalled_frame_catches_up() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(60));
        engine.start();

        clock.advance_secs(5);
        assert_eq!(engine.poll(), 5);
        assert_eq!(engine.state().current_value, 55);
    }

    #[test]
    fn test_zero_keeps_ticking_without_stopping() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(1));
        engine.start();
        let seen = recorder(&mut engine);

        clock.advance_secs(4);
        assert_eq!(engine.poll(), 4);

        assert_eq!(engine.state().current_value, 0);
        assert!(engine.is_running());
        assert_eq!(seen.borrow().as_slice(), ["00:00:00"]);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(10));
        engine.start();
        clock.advance(Duration::from_millis(600));
        engine.start();

        // A second start must not push the deadline back.
        clock.advance(Duration::from_millis(400));
        assert_eq!(engine.poll(), 1);

        engine.stop();
        let stopped = engine.state();
        engine.stop();
        assert_eq!(engine.state(), stopped);
        assert_eq!(engine.status(), TimerStatus::Stopped);
    }

    #[test]
    fn test_stop_retains_current_value() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(10));
        engine.start();
        clock.advance_secs(3);
        engine.poll();
        engine.stop();

        clock.advance_secs(3);
        engine.poll();
        assert_eq!(engine.state().current_value, 7);
        assert_eq!(engine.state().reset_value, 10);
    }

    #[test]
    fn test_reset_restores_preset_and_delays_next_tick() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(100));
        engine.start();
        clock.advance_secs(10);
        engine.poll();
        clock.advance(Duration::from_millis(700));

        engine.reset();
        assert_eq!(engine.state().current_value, 100);
        assert_eq!(engine.time_until_next_tick(), Some(TICK_INTERVAL));

        clock.advance(Duration::from_millis(500));
        assert_eq!(engine.poll(), 0);
        clock.advance(Duration::from_millis(500));
        assert_eq!(engine.poll(), 1);
        assert_eq!(engine.state().current_value, 99);
    }

    #[test]
    fn test_set_countdown_while_running_restarts_cadence() {
        let (mut engine, clock) = engine();
        engine.set_countdown(Duration::from_secs(100));
        engine.start();
        clock.advance(Duration::from_millis(900));

        engine.set_countdown(Duration::from_secs(20));
        clock.advance(Duration::from_millis(200));
        assert_eq!(engine.poll(), 0);
        assert_eq!(engine.state().current_value, 20);
        assert!(engine.is_running());
    }

    #[test]
    fn test_countdown_to_time_one_hour_ahead() {
        let (mut engine, _) = engine();
        let target = engine.now() + chrono::Duration::hours(1);

        assert!(engine.set_countdown_to_time(target));
        assert_eq!(engine.state().reset_value, 3600);
        assert_eq!(engine.text(), "01:00:00");
    }

    #[test]
    fn test_countdown_to_time_truncates_fraction() {
        let (mut engine, _) = engine();
        let target = engine.now() + chrono::Duration::milliseconds(90_750);
        assert!(engine.set_countdown_to_time(target));
        assert_eq!(engine.state().reset_value, 90);
    }

    #[test]
    fn test_countdown_to_past_time_is_ignored() {
        let (mut engine, _) = engine();
        engine.set_countdown(Duration::from_secs(42));
        let seen = recorder(&mut engine);

        assert!(!engine.set_countdown_to_time(engine.now() - chrono::Duration::minutes(1)));
        assert!(!engine.set_countdown_to_time(engine.now()));

        assert_eq!(engine.state().reset_value, 42);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_callback_is_replaced_not_accumulated() {
        let (mut engine, _) = engine();
        let first = recorder(&mut engine);
        let second = recorder(&mut engine);

        engine.set_countdown(Duration::from_secs(1));

        assert!(first.borrow().is_empty());
        assert_eq!(second.borrow().as_slice(), ["00:00:01"]);
    }
}
