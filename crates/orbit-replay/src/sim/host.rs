use orbit::clock::{ClockEvent, FrameClock, TickerId, TimerId, Timelines};
use orbit::host::{Host, Signal};
use std::time::Duration;

/// Headless host: keeps the frame clock and logs every outbound call.
#[derive(Debug)]
pub struct LogHost {
    name: &'static str,
    clock: Timelines,
    signals: usize,
    last_offset: Option<f64>,
}

impl LogHost {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            clock: Timelines::new(),
            signals: 0,
            last_offset: None,
        }
    }

    pub fn advance(&mut self, now: Duration) -> Vec<ClockEvent> {
        self.clock.advance(now)
    }

    pub fn is_idle(&self) -> bool {
        self.clock.is_idle()
    }

    pub fn signal_count(&self) -> usize {
        self.signals
    }

    pub fn last_offset(&self) -> Option<f64> {
        self.last_offset
    }
}

impl FrameClock for LogHost {
    fn start_timeline(&mut self, duration: Duration) -> TickerId {
        let ticker = self.clock.start_timeline(duration);
        log::debug!("[{}] start {} for {:?}", self.name, ticker, duration);
        ticker
    }

    fn stop_timeline(&mut self, ticker: TickerId) {
        log::debug!("[{}] stop {}", self.name, ticker);
        self.clock.stop_timeline(ticker)
    }

    fn start_timer(&mut self, delay: Duration) -> TimerId {
        let timer = self.clock.start_timer(delay);
        log::debug!("[{}] arm {} in {:?}", self.name, timer, delay);
        timer
    }

    fn cancel_timer(&mut self, timer: TimerId) {
        log::debug!("[{}] cancel {}", self.name, timer);
        self.clock.cancel_timer(timer)
    }
}

impl Host for LogHost {
    fn set_offset(&mut self, offset: f64) {
        self.last_offset = Some(offset);
        log::info!("[{}] offset {:.4}", self.name, offset);
    }

    fn emit(&mut self, signal: Signal) {
        self.signals += 1;
        log::info!("[{}] signal \"{}\" {:?}", self.name, signal.name(), signal);
    }
}
