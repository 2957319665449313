use std::time::{Duration, Instant};

/// Keeps ticks on a fixed cadence.
///
/// Ticks are scheduled one interval after the previous scheduled tick. Frames presented before
/// the scheduled tick (egui repaints on input too) only wait for the rest of it. A tick that runs
/// late is not caught up on: the next one is due immediately and the cadence restarts from there.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next_tick: Option<Instant>,
}

impl FramePacer {
    pub fn new(target_rate: u32) -> Self {
        Self {
            interval: Duration::from_nanos(1_000_000_000 / u64::from(target_rate.max(1))),
            next_tick: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Records a presented frame and returns how long to wait before the next tick.
    pub fn frame_presented(&mut self, now: Instant) -> Duration {
        let next = match self.next_tick {
            Some(scheduled) if now < scheduled => return scheduled - now,
            Some(scheduled) => (scheduled + self.interval).max(now),
            None => now + self.interval,
        };
        self.next_tick = Some(next);
        next - now
    }
}
