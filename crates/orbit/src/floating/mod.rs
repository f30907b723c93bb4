pub mod model;
pub mod widget;

pub use model::{
    ButtonPart, FloatingMode, FloatingPosition, PositionMask, PositionTable, Side, TrackGeometry,
};
pub use widget::FloatingButton;

pub const POSITION_COUNT: usize = 5;
pub const MAX_BUTTONS: usize = 2;
