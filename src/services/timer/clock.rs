use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};

/// Time source for the countdown engine.
///
/// `now` is wall-clock time for "count down to" targets; `instant` is the
/// monotonic time the tick cadence is scheduled against.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
    fn instant(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn instant(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Rc<Cell<(DateTime<Local>, Instant)>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Local>) -> Self {
        Self {
            current: Rc::new(Cell::new((start, Instant::now()))),
        }
    }

    pub fn advance(&self, by: Duration) {
        let (wall, mono) = self.current.get();
        let step = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        self.current.set((wall + step, mono + by));
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.current.get().0
    }

    fn instant(&self) -> Instant {
        self.current.get().1
    }
}
