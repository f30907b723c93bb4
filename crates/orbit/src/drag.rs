use crate::event::RotaryDirection;
use crate::geometry::Point;
use strum::Display as StrumDisplay;

/// Direction of travel along a slot table: towards lower or higher indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Travel {
    Backward,
    Forward,
}

impl Travel {
    pub fn from_delta(delta: f64) -> Option<Self> {
        if delta > 0.0 {
            Some(Travel::Forward)
        } else if delta < 0.0 {
            Some(Travel::Backward)
        } else {
            None
        }
    }

    /// One step from `index`, clamped into `[0, len - 1]`.
    pub fn step(self, index: usize, len: usize) -> usize {
        let last = len.saturating_sub(1);
        match self {
            Travel::Forward => (index + 1).min(last),
            Travel::Backward => index.saturating_sub(1).min(last),
        }
    }
}

impl From<RotaryDirection> for Travel {
    fn from(direction: RotaryDirection) -> Self {
        match direction {
            RotaryDirection::Clockwise => Travel::Forward,
            RotaryDirection::CounterClockwise => Travel::Backward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slop {
    /// Horizontal displacement only.
    Axis(f64),
    /// Euclidean distance from the origin.
    Radial(f64),
}

/// Per-gesture state, created on press and consumed on release.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub origin: Point,
    pub travel: Option<Travel>,
    pub start_slot: usize,
    pub start_offset: f64,
}

impl DragSession {
    pub fn begin(origin: Point, start_slot: usize, start_offset: f64) -> Self {
        Self {
            origin,
            travel: None,
            start_slot,
            start_offset,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.travel.is_some()
    }

    /// Locks the direction the first time `point` leaves the slop. Returns the travel only on
    /// that first crossing, so callers can emit their freeze notification exactly once.
    pub fn try_lock(&mut self, point: Point, slop: Slop) -> Option<Travel> {
        if self.travel.is_some() {
            return None;
        }
        let dx = point.x - self.origin.x;
        let locked = match slop {
            Slop::Axis(limit) if dx.abs() > limit => Travel::from_delta(dx),
            Slop::Radial(limit) if self.origin.distance(point) > limit => {
                // purely vertical exits still count as a drag
                Some(Travel::from_delta(dx).unwrap_or(Travel::Forward))
            }
            _ => None,
        };
        self.travel = locked;
        locked
    }

    pub fn delta(&self, point: Point) -> f64 {
        point.x - self.origin.x
    }
}

/// Rubber-band feedback: excess past either bound is divided by `damping`.
pub fn elastic(value: f64, lower: f64, upper: f64, damping: f64) -> f64 {
    let damping = if damping.is_finite() && damping > 0.0 {
        damping
    } else {
        1.0
    };
    if value > upper {
        upper + (value - upper) / damping
    } else if value < lower {
        lower + (value - lower) / damping
    } else {
        value
    }
}

/// `numerator / denominator`, or `0` when the denominator cannot carry a division.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator.is_finite() && denominator.abs() > f64::EPSILON {
        numerator / denominator
    } else {
        0.0
    }
}
