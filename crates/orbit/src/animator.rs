use crate::clock::{FrameClock, TickerId};
use crate::interp::{Curve, Incrementor, lerp};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct AnimationSpec {
    pub start: f64,
    pub stop: f64,
    pub duration: Duration,
    pub interpolator: Curve,
    pub incrementor: Incrementor,
}

impl AnimationSpec {
    pub fn new(start: f64, stop: f64, duration: Duration) -> Self {
        Self {
            start,
            stop,
            duration,
            interpolator: Curve::Linear,
            incrementor: lerp,
        }
    }

    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.interpolator = curve;
        self
    }

    pub fn with_incrementor(mut self, incrementor: Incrementor) -> Self {
        self.incrementor = incrementor;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::new(0.0, 1.0, Duration::from_secs(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not our ticker, or nothing running.
    Ignored,
    Running,
    Completed,
}

type UpdateFn<T> = Box<dyn FnMut(&mut T, f64, f64)>;

/// Drives `update(target, value, fraction)` from host timeline frames.
///
/// The animator owns its timeline handle while running and gives it back to the clock on
/// completion or cancellation. The target is lent per frame, so the callback can mutate widget
/// state the animator itself lives beside.
pub struct Animator<T> {
    spec: Option<AnimationSpec>,
    driver: Option<TickerId>,
    update: UpdateFn<T>,
}

impl<T> Animator<T> {
    pub fn new(update: impl FnMut(&mut T, f64, f64) + 'static) -> Self {
        Self {
            spec: None,
            driver: None,
            update: Box::new(update),
        }
    }

    pub fn start(&mut self, clock: &mut dyn FrameClock, spec: AnimationSpec) {
        if self.running() {
            self.cancel(clock);
        }
        let ticker = clock.start_timeline(spec.duration);
        log::debug!(
            "Animation {} started: {} -> {} over {:?}",
            ticker,
            spec.start,
            spec.stop,
            spec.duration
        );
        self.spec = Some(spec);
        self.driver = Some(ticker);
    }

    pub fn tick(
        &mut self,
        clock: &mut dyn FrameClock,
        ticker: TickerId,
        progress: f64,
        target: &mut T,
    ) -> TickOutcome {
        if self.driver != Some(ticker) {
            return TickOutcome::Ignored;
        }
        let Some(spec) = self.spec else {
            log::error!("Animation {} ticked without a spec", ticker);
            clock.stop_timeline(ticker);
            self.driver = None;
            return TickOutcome::Ignored;
        };

        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let fraction = spec.interpolator.transform(p);
        let value = (spec.incrementor)(spec.start, spec.stop, fraction);
        (self.update)(target, value, fraction);

        if p >= 1.0 {
            clock.stop_timeline(ticker);
            self.driver = None;
            self.spec = None;
            log::debug!("Animation {} completed at {}", ticker, value);
            return TickOutcome::Completed;
        }
        TickOutcome::Running
    }

    /// Stops without a final frame. Returns whether anything was running.
    pub fn cancel(&mut self, clock: &mut dyn FrameClock) -> bool {
        match self.driver.take() {
            Some(ticker) => {
                clock.stop_timeline(ticker);
                self.spec = None;
                log::debug!("Animation {} cancelled", ticker);
                true
            }
            None => false,
        }
    }

    pub fn running(&self) -> bool {
        self.driver.is_some()
    }

    pub fn driver(&self) -> Option<TickerId> {
        self.driver
    }
}

impl<T> fmt::Debug for Animator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animator")
            .field("spec", &self.spec)
            .field("driver", &self.driver)
            .finish_non_exhaustive()
    }
}
