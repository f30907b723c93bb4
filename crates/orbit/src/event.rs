use crate::clock::{ClockEvent, TickerId, TimerId};
use crate::geometry::{Point, Size};
use std::fmt;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumDiscriminants, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub point: Point,
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn new(x: f64, y: f64, timestamp: Duration) -> Self {
        Self {
            point: Point::new(x, y),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum RotaryDirection {
    #[strum(serialize = "cw", serialize = "clockwise")]
    Clockwise,
    #[strum(serialize = "ccw", serialize = "counterclockwise")]
    CounterClockwise,
}

/// Everything the host can deliver to a widget engine.
#[derive(Debug, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(name(EventKind), derive(Hash, StrumDisplay, EnumIter))]
pub enum Event {
    Press(PointerEvent),
    Move(PointerEvent),
    Release(PointerEvent),
    Cancel,
    Resize(Size),
    Frame { ticker: TickerId, progress: f64 },
    Timer(TimerId),
    Rotary(RotaryDirection),
    PanelScroll(f64),
    PanelActive(bool),
    PanelHold(bool),
    Back,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        self.into()
    }
}

impl From<ClockEvent> for Event {
    fn from(event: ClockEvent) -> Self {
        match event {
            ClockEvent::Frame { ticker, progress } => Event::Frame { ticker, progress },
            ClockEvent::Timer(timer) => Event::Timer(timer),
        }
    }
}

pub type Handler<W> = fn(&mut W, &Event);

/// Declarative (event kind -> handler) wiring, built once per widget.
pub struct EventTable<W> {
    entries: Vec<(EventKind, Handler<W>)>,
}

impl<W> EventTable<W> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn on(mut self, kind: EventKind, handler: Handler<W>) -> Self {
        self.entries.retain(|(k, _)| *k != kind);
        self.entries.push((kind, handler));
        self
    }

    pub fn handler(&self, kind: EventKind) -> Option<Handler<W>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, h)| *h)
    }

    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }
}

impl<W> Default for EventTable<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W> fmt::Debug for EventTable<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

pub trait Widget {
    /// Routes an event through the widget's table. Returns `false` when nothing handles it.
    fn dispatch(&mut self, event: &Event) -> bool;
}

pub trait Draggable {
    fn press(&mut self, event: PointerEvent);
    fn motion(&mut self, event: PointerEvent);
    fn release(&mut self, event: PointerEvent);
    fn cancel(&mut self);
}

pub trait Resizable {
    fn resize(&mut self, size: Size);
}

/// Named content parts.
pub trait Container {
    type Content;

    fn content_set(
        &mut self,
        part: &str,
        content: Self::Content,
    ) -> Result<Option<Self::Content>, crate::error::WidgetError>;
    fn content(&self, part: &str) -> Option<&Self::Content>;
    fn content_unset(&mut self, part: &str) -> Option<Self::Content>;
}

/// Shared `Widget::dispatch` body for widgets that keep their table in a `handlers` field.
#[macro_export]
macro_rules! dispatch_via_table {
    ($widget:expr, $event:expr) => {{
        let handler = $widget.handlers.handler($event.kind());
        match handler {
            Some(handler) => {
                handler($widget, $event);
                true
            }
            None => false,
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[derive(Default)]
    struct Counter {
        presses: usize,
        resizes: usize,
    }

    fn on_press(c: &mut Counter, _: &Event) {
        c.presses += 1;
    }

    fn on_resize(c: &mut Counter, _: &Event) {
        c.resizes += 1;
    }

    #[test]
    fn test_table_lookup() {
        let table: EventTable<Counter> = EventTable::new()
            .on(EventKind::Press, on_press)
            .on(EventKind::Resize, on_resize);
        let mut counter = Counter::default();

        let press = Event::Press(PointerEvent::default());
        let handler = table.handler(press.kind()).unwrap();
        handler(&mut counter, &press);

        assert_eq!(counter.presses, 1);
        assert!(table.handler(EventKind::Back).is_none());
        assert_eq!(table.kinds().count(), 2);
    }

    #[test]
    fn test_rebinding_replaces_handler() {
        let table: EventTable<Counter> = EventTable::new()
            .on(EventKind::Press, on_press)
            .on(EventKind::Press, on_resize);
        let mut counter = Counter::default();
        table.handler(EventKind::Press).unwrap()(&mut counter, &Event::Cancel);
        assert_eq!((counter.presses, counter.resizes), (0, 1));
    }

    #[test]
    fn test_every_kind_has_a_name() {
        assert!(EventKind::iter().all(|k| !k.to_string().is_empty()));
        assert_eq!(EventKind::PanelScroll.to_string(), "PanelScroll");
    }

    #[test]
    fn test_rotary_parsing() {
        assert_eq!(
            "cw".parse::<RotaryDirection>().unwrap(),
            RotaryDirection::Clockwise
        );
        assert_eq!(
            "CCW".parse::<RotaryDirection>().unwrap(),
            RotaryDirection::CounterClockwise
        );
    }
}
