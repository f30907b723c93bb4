use crate::error::QueueError;
use crate::queue::SampleQueue;
use std::time::Duration;

pub const DEFAULT_CAPACITY: usize = 100;
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Tracks pointer positions and reports the displacement covered by the most recent window.
///
/// The result is a sum of successive deltas, not an average. Walking back from the newest sample,
/// the delta that crosses the window boundary is still counted; when the walk reaches the oldest
/// sample first, the final delta to it is counted too. Callers scale the sum down with their own
/// divisor.
#[derive(Debug, Clone)]
pub struct VelocityTracker {
    xs: SampleQueue<f64>,
    ys: SampleQueue<f64>,
    times: SampleQueue<Duration>,
    window: Duration,
    computed: Option<Velocity>,
}

impl VelocityTracker {
    pub fn new(capacity: usize, window: Duration) -> Result<Self, QueueError> {
        Ok(Self {
            xs: SampleQueue::new(capacity)?,
            ys: SampleQueue::new(capacity)?,
            times: SampleQueue::new(capacity)?,
            window,
            computed: None,
        })
    }

    pub fn add_movement(&mut self, x: f64, y: f64, time: Duration) {
        if self.times.is_full() {
            self.xs.pop_front();
            self.ys.pop_front();
            self.times.pop_front();
        }
        self.xs.push(x);
        self.ys.push(y);
        self.times.push(time);
        self.computed = None;
    }

    pub fn reset(&mut self) {
        self.xs.reset();
        self.ys.reset();
        self.times.reset();
        self.computed = None;
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn is_computed(&self) -> bool {
        self.computed.is_some()
    }

    /// Cached result, recomputed only after new samples arrive.
    pub fn velocity(&mut self) -> Velocity {
        match self.computed {
            Some(v) => v,
            None => self.compute(),
        }
    }

    pub fn compute(&mut self) -> Velocity {
        let velocity = self.sum_window();
        self.computed = Some(velocity);
        velocity
    }

    fn sample(&self, index: usize) -> Option<(f64, f64, Duration)> {
        Some((
            self.xs.get(index)?,
            self.ys.get(index)?,
            self.times.get(index)?,
        ))
    }

    fn sum_window(&self) -> Velocity {
        let mut v = Velocity::default();
        let len = self.len();
        if len < 2 {
            return v;
        }

        let newest = len - 1;
        let Some((mut last_x, mut last_y, last_time)) = self.sample(newest) else {
            log::error!("Velocity queues out of step ({} samples)", len);
            return v;
        };

        let mut i = newest;
        while i > 0 {
            let Some((x, y, time)) = self.sample(i) else {
                return v;
            };
            if i != newest {
                v.x += last_x - x;
                v.y += last_y - y;
            }
            if last_time.saturating_sub(time) > self.window {
                return v;
            }
            last_x = x;
            last_y = y;
            i -= 1;
        }

        if let Some((x, y, _)) = self.sample(0) {
            v.x += last_x - x;
            v.y += last_y - y;
        }
        v
    }
}
