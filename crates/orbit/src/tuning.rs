use crate::interp::Curve;
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Tuning {
    pub velocity: VelocityTuning,
    pub floating: FloatingTuning,
    pub more_option: MoreOptionTuning,
    pub index: IndexTuning,
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct VelocityTuning {
    pub capacity: usize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub window: Duration,
}

impl Default for VelocityTuning {
    fn default() -> Self {
        Self {
            capacity: crate::velocity::DEFAULT_CAPACITY,
            window: crate::velocity::DEFAULT_WINDOW,
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FloatingTuning {
    pub scale: f64,
    pub finger_size: f64,
    pub one_button_width: f64,
    pub two_button_width: f64,
    pub side_width: f64,
    pub threshold_padding: f64,
    pub hysteresis: f64,
    pub center_margin: f64,
    pub snap_epsilon: f64,
    pub fling_threshold: f64,
    pub velocity_divisor: f64,
    pub overscroll_damping: f64,
    pub curve: Curve,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub animation: Duration,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub settle_delay: Duration,
}

impl Default for FloatingTuning {
    fn default() -> Self {
        Self {
            scale: 1.0,
            finger_size: 40.0,
            one_button_width: 148.0,
            two_button_width: 268.0,
            side_width: 22.0,
            threshold_padding: 30.0,
            hysteresis: 0.12,
            center_margin: 0.02,
            snap_epsilon: 0.005,
            fling_threshold: 50.0,
            velocity_divisor: 2.0,
            overscroll_damping: 3.0,
            curve: Curve::Decelerate,
            animation: Duration::from_millis(400),
            settle_delay: Duration::from_millis(400),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MoreOptionTuning {
    pub item_width: f64,
    pub touch_slop: f64,
    pub fling_threshold: f64,
    pub velocity_divisor: f64,
    pub overscroll_damping: f64,
    pub items_between_angle: f64,
    pub curve: Curve,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub animation: Duration,
}

impl Default for MoreOptionTuning {
    fn default() -> Self {
        Self {
            item_width: 360.0,
            touch_slop: 20.0,
            fling_threshold: 50.0,
            velocity_divisor: 2.0,
            overscroll_damping: 3.0,
            items_between_angle: 90.0,
            curve: Curve::GlideOut,
            animation: Duration::from_millis(300),
        }
    }
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexTuning {
    pub max_slots: usize,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub hide_delay: Duration,
}

impl Default for IndexTuning {
    fn default() -> Self {
        Self {
            max_slots: 72,
            hide_delay: Duration::from_secs(2),
        }
    }
}
