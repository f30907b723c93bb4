use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

const NEWTON_ITERATIONS: usize = 13;
const NEWTON_TOLERANCE: f64 = 1e-3;
const GLIDE_OUT: (f64, f64, f64, f64) = (0.25, 0.46, 0.45, 1.0);

/// Maps `(start, stop, fraction)` to the animated value.
pub type Incrementor = fn(f64, f64, f64) -> f64;

pub fn lerp(start: f64, stop: f64, fraction: f64) -> f64 {
    (stop - start) * fraction + start
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Linear,
    #[default]
    GlideOut,
    Decelerate,
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Curve {
    pub fn transform(&self, progress: f64) -> f64 {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match *self {
            Curve::Linear => p,
            Curve::GlideOut => glide_out(p),
            Curve::Decelerate => decelerate(p),
            Curve::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(x1, y1, x2, y2, p),
        }
    }
}

/// Fast start that settles gently, rounded to 4 decimals.
pub fn glide_out(progress: f64) -> f64 {
    let (x1, y1, x2, y2) = GLIDE_OUT;
    (cubic_bezier(x1, y1, x2, y2, progress) * 10_000.0).round() / 10_000.0
}

pub fn decelerate(progress: f64) -> f64 {
    (progress * FRAC_PI_2).sin()
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, fraction: f64) -> f64 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample(a: f64, b: f64, c: f64, t: f64) -> f64 {
        ((a * t + b) * t + c) * t
    }

    fn derivative(a: f64, b: f64, c: f64, t: f64) -> f64 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // solve x(t) = fraction for t
    let mut t = fraction;
    for _ in 0..NEWTON_ITERATIONS {
        let z = sample(ax, bx, cx, t) - fraction;
        if z.abs() < NEWTON_TOLERANCE {
            break;
        }
        let d = derivative(ax, bx, cx, t);
        if d.abs() < 1e-6 {
            break;
        }
        t = (t - z / d).clamp(0.0, 1.0);
    }

    sample(ay, by, cy, t)
}
