use crate::floating::FloatingPosition;
use crate::item::ItemId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    #[error("Sample queue capacity must be non-zero")]
    ZeroCapacity,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Movement is blocked")]
    MovementBlocked,
    #[error("Position {0} is disabled in the current mode")]
    PositionDisabled(FloatingPosition),
    #[error("Index {index} is out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
    #[error("Unknown item {0}")]
    UnknownItem(ItemId),
    #[error("Unknown part '{0}'")]
    UnknownPart(String),
}
