use crate::drag::Travel;
use crate::floating::POSITION_COUNT;
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString, IntoEnumIterator};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FloatingPosition {
    #[strum(serialize = "LeftOut", serialize = "left_out", serialize = "0")]
    LeftOut,
    #[strum(serialize = "Left", serialize = "l", serialize = "1")]
    Left,
    #[strum(serialize = "Center", serialize = "c", serialize = "2")]
    Center,
    #[default]
    #[strum(serialize = "Right", serialize = "r", serialize = "3")]
    Right,
    #[strum(serialize = "RightOut", serialize = "right_out", serialize = "4")]
    RightOut,
}

impl FloatingPosition {
    pub fn as_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::iter().nth(idx)
    }

    pub fn side(&self) -> Side {
        match self {
            FloatingPosition::LeftOut | FloatingPosition::Left => Side::Left,
            FloatingPosition::Center => Side::Center,
            FloatingPosition::Right | FloatingPosition::RightOut => Side::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    Left,
    Center,
    Right,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum FloatingMode {
    #[default]
    #[strum(serialize = "Default", serialize = "all")]
    Default,
    #[strum(serialize = "BothSides", serialize = "both_sides")]
    BothSides,
}

/// Which positions a mode allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionMask([bool; POSITION_COUNT]);

impl PositionMask {
    pub fn for_mode(mode: FloatingMode) -> Self {
        match mode {
            FloatingMode::Default => Self([true; POSITION_COUNT]),
            FloatingMode::BothSides => Self([false, true, false, true, false]),
        }
    }

    pub fn allows(&self, pos: FloatingPosition) -> bool {
        self.0[pos.as_index()]
    }

    fn enabled(&self, idx: usize) -> bool {
        self.0.get(idx).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
pub enum ButtonPart {
    #[strum(serialize = "button1")]
    First,
    #[strum(serialize = "button2")]
    Second,
}

impl ButtonPart {
    pub fn as_index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrackGeometry {
    pub track_width: f64,
    pub button_width: f64,
    pub side_width: f64,
}

impl TrackGeometry {
    /// Horizontal room the button can travel.
    pub fn travel(&self) -> f64 {
        self.track_width - self.button_width
    }
}

/// Normalized drag value of every position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionTable([f64; POSITION_COUNT]);

impl Default for PositionTable {
    fn default() -> Self {
        Self([0.0, 0.0, 0.5, 1.0, 1.0])
    }
}

impl PositionTable {
    pub fn from_values(values: [f64; POSITION_COUNT]) -> Self {
        Self(values)
    }

    pub fn from_geometry(geometry: &TrackGeometry) -> Self {
        let mut table = Self::default();
        table.recalc(geometry);
        table
    }

    pub fn get(&self, pos: FloatingPosition) -> f64 {
        self.0[pos.as_index()]
    }

    fn at(&self, idx: usize) -> f64 {
        self.0.get(idx).copied().unwrap_or(0.0)
    }

    pub fn recalc(&mut self, geometry: &TrackGeometry) {
        let TrackGeometry {
            track_width: w,
            button_width: w1,
            side_width: lr,
        } = *geometry;
        let travel = geometry.travel();

        let (left, right) = if travel.is_finite() && travel > 0.0 {
            (
                ((w1 - lr) / travel).clamp(0.0, 1.0),
                ((w - 2.0 * w1 + lr) / travel).clamp(0.0, 1.0),
            )
        } else {
            // no room to travel: collapse onto the fixed ends
            (0.0, 1.0)
        };

        self.0 = [0.0, left, 0.5, right, 1.0];
    }
}

fn forward_bias(idx: usize, hysteresis: f64) -> f64 {
    if idx == 1 || idx == 2 { hysteresis } else { 0.0 }
}

fn backward_bias(idx: usize, hysteresis: f64) -> f64 {
    if idx == 2 || idx == 3 { hysteresis } else { 0.0 }
}

/// First boundary not yet crossed while travelling in `travel`, skipping disabled positions.
pub fn pick_target(
    table: &PositionTable,
    mask: &PositionMask,
    travel: Travel,
    offset: f64,
    hysteresis: f64,
) -> FloatingPosition {
    let last = POSITION_COUNT - 1;
    let idx = match travel {
        Travel::Forward => {
            let i = (0..last)
                .find(|&i| mask.enabled(i) && offset < table.at(i) + forward_bias(i, hysteresis))
                .unwrap_or(last);
            if i == last && !mask.enabled(last) {
                (1..last).rev().find(|&i| mask.enabled(i)).unwrap_or(0)
            } else {
                i
            }
        }
        Travel::Backward => {
            let i = (1..=last)
                .rev()
                .find(|&i| mask.enabled(i) && offset > table.at(i) - backward_bias(i, hysteresis))
                .unwrap_or(0);
            if i == 0 && !mask.enabled(0) {
                (1..=last).find(|&i| mask.enabled(i)).unwrap_or(last)
            } else {
                i
            }
        }
    };
    FloatingPosition::from_index(idx).unwrap_or_default()
}

/// Next enabled position past `start` in `travel`, or `start` itself at the end of the track.
pub fn fling_target(
    start: FloatingPosition,
    mask: &PositionMask,
    travel: Travel,
) -> FloatingPosition {
    let s = start.as_index();
    let next = match travel {
        Travel::Forward => (s + 1..POSITION_COUNT).find(|&i| mask.enabled(i)),
        Travel::Backward => (0..s).rev().find(|&i| mask.enabled(i)),
    };
    next.and_then(FloatingPosition::from_index).unwrap_or(start)
}
