pub mod omit;
pub mod widget;

pub use omit::{MARKER_LABEL, OmitLayout, OmitSlot};
pub use widget::{IndexItem, IndexLayout, IndexPriority};
