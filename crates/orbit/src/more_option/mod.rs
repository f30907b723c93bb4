pub mod model;
pub mod widget;

pub use model::{Carousel, ItemTransform, MoreOptionItem, PanelDirection, index_styles};
pub use widget::MoreOptionLayout;

pub const RADIUS_X_MAX: f64 = 155.0; // at the center
pub const RADIUS_X_NORMAL: f64 = 120.0; // at +-90 degrees
pub const RADIUS_X_MIN: f64 = 155.0; // at +-180 degrees
pub const RADIUS_Z: f64 = 500.0; // depth is twice this
pub const MIN_SCALE: f64 = 0.38;
pub const MAX_SCALE: f64 = 1.0;
pub const TEXT_BAND: f64 = 0.2; // share of the item width where labels stay visible
pub const MIN_DIM: f64 = 0.3;
pub const DIM_ALPHA: f64 = 127.0;
