use std::fmt;
use std::time::Duration;

pub const FRAME: Duration = Duration::from_millis(16);
pub const DEFAULT_DURATION: Duration = Duration::from_millis(2000);

/// What a counter element shows.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CounterDisplay {
    #[default]
    Pending,
    Value(u64),
    Failed,
}

impl fmt::Display for CounterDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterDisplay::Pending => f.write_str("0"),
            CounterDisplay::Value(v) => write!(f, "{v}"),
            CounterDisplay::Failed => f.write_str("!"),
        }
    }
}

/// Values a counter passes through while counting up from 0 to `target`,
/// one per frame.
#[derive(Debug, Clone)]
pub struct CounterFrames {
    target: f64,
    step: f64,
    current: f64,
    done: bool,
}

pub fn frames(target: u64, duration: Duration) -> CounterFrames {
    let ticks = duration.as_millis() as f64 / FRAME.as_millis() as f64;
    CounterFrames {
        target: target as f64,
        step: target as f64 / ticks,
        current: 0.0,
        done: false,
    }
}

impl Iterator for CounterFrames {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }
        self.current += self.step;
        // NaN (0 / 0) also lands here.
        if !(self.current < self.target) {
            self.current = self.target;
            self.done = true;
        }
        Some(self.current.floor() as u64)
    }
}

/// Plays the animation in real time, calling `on_frame` once per frame.
pub async fn animate<F: FnMut(u64)>(target: u64, duration: Duration, mut on_frame: F) {
    let mut ticker = tokio::time::interval(FRAME);
    for value in frames(target, duration) {
        ticker.tick().await;
        on_frame(value);
    }
}
