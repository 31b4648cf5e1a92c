// Frame throttle and trailing-edge debounce, both driven by caller-supplied
// timestamps in milliseconds.

#[derive(Debug, Clone, PartialEq)]
pub struct FrameClock {
    interval_ms: f64,
    last_frame_ms: Option<f64>,
}

impl FrameClock {
    pub fn from_fps(fps: f64) -> FrameClock {
        let interval_ms = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
        FrameClock {
            interval_ms,
            last_frame_ms: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Returns true and marks `now` as the last drawn frame when at least one
    /// interval has passed. The first call after a reset always draws.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_frame_ms {
            Some(last) if now_ms - last < self.interval_ms => false,
            _ => {
                self.last_frame_ms = Some(now_ms);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_frame_ms = None;
    }
}

/// Trailing-edge debounce: every `trigger` pushes the deadline back, and
/// `fire` reports true once when the deadline has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct Debounce {
    delay_ms: f64,
    deadline_ms: Option<f64>,
}

impl Debounce {
    pub fn new(delay_ms: f64) -> Debounce {
        Debounce {
            delay_ms: delay_ms.max(0.0),
            deadline_ms: None,
        }
    }

    pub fn delay_ms(&self) -> f64 {
        self.delay_ms
    }

    pub fn trigger(&mut self, now_ms: f64) {
        self.deadline_ms = Some(now_ms + self.delay_ms);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    /// Time left until the deadline, `None` when nothing is pending.
    pub fn remaining_ms(&self, now_ms: f64) -> Option<f64> {
        self.deadline_ms.map(|deadline| (deadline - now_ms).max(0.0))
    }

    pub fn fire(&mut self, now_ms: f64) -> bool {
        match self.deadline_ms {
            Some(deadline) if now_ms >= deadline => {
                self.deadline_ms = None;
                true
            }
            _ => false,
        }
    }
}
