use derive_more::{Display, From, Into};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("ticker#{_0}")]
pub struct TickerId(u64);

crate::impl_id_newtype!(TickerId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("timer#{_0}")]
pub struct TimerId(u64);

crate::impl_id_newtype!(TimerId);

/// Periodic tick source and one-shot timers owned by the host.
///
/// A timeline delivers monotonically increasing progress in `[0, 1]` over its duration; the host
/// routes each frame back to the widget as `Event::Frame`. Timers fire once as `Event::Timer`.
pub trait FrameClock {
    fn start_timeline(&mut self, duration: Duration) -> TickerId;
    fn stop_timeline(&mut self, ticker: TickerId);
    fn start_timer(&mut self, delay: Duration) -> TimerId;
    fn cancel_timer(&mut self, timer: TimerId);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    Frame { ticker: TickerId, progress: f64 },
    Timer(TimerId),
}

#[derive(Debug, Clone, Copy)]
struct Timeline {
    started: Duration,
    duration: Duration,
}

impl Timeline {
    fn progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// Reference `FrameClock` driven by explicit timestamps.
#[derive(Debug, Default)]
pub struct Timelines {
    now: Duration,
    next_id: u64,
    timelines: BTreeMap<TickerId, Timeline>,
    timers: BTreeMap<TimerId, Duration>,
}

impl Timelines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_idle(&self) -> bool {
        self.timelines.is_empty() && self.timers.is_empty()
    }

    pub fn active_timelines(&self) -> usize {
        self.timelines.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Moves the clock forward and collects due frames and timers. Time never runs backwards.
    pub fn advance(&mut self, now: Duration) -> Vec<ClockEvent> {
        self.now = self.now.max(now);

        let mut events: Vec<ClockEvent> = self
            .timelines
            .iter()
            .map(|(&ticker, timeline)| ClockEvent::Frame {
                ticker,
                progress: timeline.progress(self.now),
            })
            .collect();

        let finished: Vec<TickerId> = events
            .iter()
            .filter_map(|e| match e {
                ClockEvent::Frame { ticker, progress } if *progress >= 1.0 => Some(*ticker),
                _ => None,
            })
            .collect();
        finished.iter().for_each(|t| {
            self.timelines.remove(t);
        });

        let due: Vec<TimerId> = self
            .timers
            .iter()
            .filter(|(_, deadline)| **deadline <= self.now)
            .map(|(&id, _)| id)
            .collect();
        for id in due {
            self.timers.remove(&id);
            events.push(ClockEvent::Timer(id));
        }

        events
    }
}

impl FrameClock for Timelines {
    fn start_timeline(&mut self, duration: Duration) -> TickerId {
        let ticker = TickerId::next(&mut self.next_id);
        self.timelines.insert(
            ticker,
            Timeline {
                started: self.now,
                duration,
            },
        );
        ticker
    }

    fn stop_timeline(&mut self, ticker: TickerId) {
        self.timelines.remove(&ticker);
    }

    fn start_timer(&mut self, delay: Duration) -> TimerId {
        let timer = TimerId::next(&mut self.next_id);
        self.timers.insert(timer, self.now + delay);
        timer
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        self.timers.remove(&timer);
    }
}
