//! Gesture and animation state engines for drag-to-snap widgets.
//!
//! Widgets never render. They consume [`event::Event`]s, drive their own animators through a
//! [`clock::FrameClock`], and report back through a [`host::Host`].

mod macros;

pub mod animator;
pub mod clock;
pub mod drag;
pub mod error;
pub mod event;
pub mod floating;
pub mod geometry;
pub mod host;
pub mod index;
pub mod interp;
pub mod item;
pub mod more_option;
pub mod queue;
pub mod tuning;
pub mod velocity;
