use crate::animator::{AnimationSpec, Animator, TickOutcome};
use crate::clock::TickerId;
use crate::drag::{DragSession, Slop, Travel, ratio};
use crate::error::{QueueError, WidgetError};
use crate::event::{Draggable, Event, EventKind, EventTable, PointerEvent, RotaryDirection, Widget};
use crate::host::{Host, Signal};
use crate::item::{ContentId, ItemId, TextPart};
use crate::more_option::model::{Carousel, ItemTransform, MoreOptionItem, PanelDirection, dim_alpha};
use crate::tuning::{MoreOptionTuning, Tuning};
use crate::velocity::VelocityTracker;

const SCROLL_EPSILON: f64 = 0.5;

/// Drawer with a rotating carousel of option items.
///
/// The offset handed to the host is the carousel scroll position in pixels; `0` centers the
/// first item.
#[derive(Debug)]
pub struct MoreOptionLayout<H: Host> {
    host: H,
    tuning: MoreOptionTuning,
    handlers: EventTable<Self>,
    animator: Animator<Carousel>,
    carousel: Carousel,
    velocity: VelocityTracker,
    session: Option<DragSession>,
    scrolled: bool,
    next_id: u64,
    direction: PanelDirection,
    opened: bool,
    scrollable: bool,
    panel_rel: f64,
    panel_active: bool,
    panel_frozen: bool,
    center_index: usize,
}

impl<H: Host> MoreOptionLayout<H> {
    pub fn new(host: H, tuning: &Tuning) -> Result<Self, QueueError> {
        let velocity = VelocityTracker::new(tuning.velocity.capacity, tuning.velocity.window)?;
        let tuning = tuning.more_option.clone();
        Ok(Self {
            host,
            handlers: Self::event_table(),
            animator: Animator::new(|carousel: &mut Carousel, value: f64, _| {
                carousel.set_scroll(value.round())
            }),
            carousel: Carousel::new(tuning.item_width, tuning.items_between_angle),
            tuning,
            velocity,
            session: None,
            scrolled: false,
            next_id: 0,
            direction: PanelDirection::default(),
            opened: false,
            scrollable: true,
            panel_rel: 1.0,
            panel_active: false,
            panel_frozen: false,
            center_index: 0,
        })
    }

    fn event_table() -> EventTable<Self> {
        EventTable::<Self>::new()
            .on(EventKind::Press, |w, e| {
                if let Event::Press(p) = e {
                    w.press(*p)
                }
            })
            .on(EventKind::Move, |w, e| {
                if let Event::Move(p) = e {
                    w.motion(*p)
                }
            })
            .on(EventKind::Release, |w, e| {
                if let Event::Release(p) = e {
                    w.release(*p)
                }
            })
            .on(EventKind::Cancel, |w, _| w.cancel())
            .on(EventKind::Frame, |w, e| {
                if let Event::Frame { ticker, progress } = e {
                    w.on_frame(*ticker, *progress)
                }
            })
            .on(EventKind::Rotary, |w, e| {
                if let Event::Rotary(direction) = e {
                    w.rotary(*direction);
                }
            })
            .on(EventKind::PanelScroll, |w, e| {
                if let Event::PanelScroll(rel) = e {
                    w.panel_scroll(*rel)
                }
            })
            .on(EventKind::PanelActive, |w, e| {
                if let Event::PanelActive(active) = e {
                    w.panel_active(*active)
                }
            })
            .on(EventKind::PanelHold, |w, e| {
                if let Event::PanelHold(hold) = e {
                    w.host.emit(if *hold { Signal::Hold } else { Signal::Unhold });
                }
            })
            .on(EventKind::Back, |w, _| w.back())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn len(&self) -> usize {
        self.carousel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carousel.is_empty()
    }

    pub fn items(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.carousel.items().iter().map(MoreOptionItem::id)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.running()
    }

    pub fn append(&mut self) -> ItemId {
        self.insert_at(self.carousel.len())
    }

    pub fn prepend(&mut self) -> ItemId {
        self.insert_at(0)
    }

    pub fn insert_after(&mut self, sibling: ItemId) -> Result<ItemId, WidgetError> {
        let index = self.index_of(sibling)?;
        Ok(self.insert_at(index + 1))
    }

    pub fn insert_before(&mut self, sibling: ItemId) -> Result<ItemId, WidgetError> {
        let index = self.index_of(sibling)?;
        Ok(self.insert_at(index))
    }

    pub fn remove(&mut self, id: ItemId) -> Result<(), WidgetError> {
        self.carousel
            .remove(id)
            .ok_or(WidgetError::UnknownItem(id))?;
        self.rearrange();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.carousel.clear();
        self.rearrange();
    }

    fn index_of(&self, id: ItemId) -> Result<usize, WidgetError> {
        self.carousel
            .index_of(id)
            .ok_or(WidgetError::UnknownItem(id))
    }

    fn insert_at(&mut self, index: usize) -> ItemId {
        let id = ItemId::next(&mut self.next_id);
        self.carousel.insert(index, MoreOptionItem::new(id));
        self.rearrange();
        id
    }

    fn rearrange(&mut self) {
        log::debug!("More option items rearranged, {} items", self.carousel.len());
        self.set_panel_frozen(false);
        self.carousel.reset_selection();
        self.jump_to(0);
    }

    pub fn set_item_text(
        &mut self,
        id: ItemId,
        part: &str,
        text: impl Into<String>,
    ) -> Result<(), WidgetError> {
        self.item_mut(id)?.set_text(part, TextPart::plain(text));
        Ok(())
    }

    pub fn set_item_translatable_text(
        &mut self,
        id: ItemId,
        part: &str,
        domain: impl Into<String>,
        text: impl Into<String>,
    ) -> Result<(), WidgetError> {
        self.item_mut(id)?
            .set_text(part, TextPart::translatable(domain, text));
        Ok(())
    }

    pub fn item_text(&self, id: ItemId, part: &str) -> Option<&TextPart> {
        self.carousel.item(id)?.text(part)
    }

    pub fn set_item_content(
        &mut self,
        id: ItemId,
        part: &str,
        content: ContentId,
    ) -> Result<Option<ContentId>, WidgetError> {
        Ok(self.item_mut(id)?.set_content(part, content))
    }

    pub fn item_content(&self, id: ItemId, part: &str) -> Option<&ContentId> {
        self.carousel.item(id)?.content(part)
    }

    pub fn item_transform(&self, id: ItemId) -> Option<&ItemTransform> {
        self.carousel.item(id).map(MoreOptionItem::transform)
    }

    /// Item ids back to front.
    pub fn draw_order(&self) -> Vec<ItemId> {
        self.carousel.draw_order()
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut MoreOptionItem, WidgetError> {
        self.carousel
            .item_mut(id)
            .ok_or(WidgetError::UnknownItem(id))
    }

    pub fn set_direction(&mut self, direction: PanelDirection) {
        self.direction = direction;
    }

    pub fn direction(&self) -> PanelDirection {
        self.direction
    }

    pub fn set_opened(&mut self, opened: bool) {
        self.set_panel_frozen(false);
        if !opened {
            self.carousel.reset_selection();
            self.center_index = 0;
        }
        self.opened = opened;
        if opened {
            self.jump_to(self.carousel.selected());
        }
    }

    pub fn opened(&self) -> bool {
        self.opened
    }

    pub fn set_scrollable(&mut self, scrollable: bool) {
        self.scrollable = scrollable;
    }

    pub fn scrollable(&self) -> bool {
        self.scrollable
    }

    pub fn selected_index(&self) -> usize {
        self.carousel.selected()
    }

    pub fn scroll_position(&self) -> f64 {
        self.carousel.scroll_x()
    }

    pub fn select(&mut self, index: usize, animate: bool) -> Result<(), WidgetError> {
        let len = self.carousel.len();
        if index >= len {
            log::warn!("Cannot select item {} of {}", index, len);
            return Err(WidgetError::OutOfRange { index, len });
        }
        if animate {
            self.animate_to(index);
        } else {
            self.jump_to(index);
        }
        Ok(())
    }

    fn animate_to(&mut self, index: usize) {
        let spec = AnimationSpec::new(
            self.carousel.scroll_x(),
            self.carousel.slot_position(index),
            self.tuning.animation,
        )
        .with_curve(self.tuning.curve);
        self.animator.start(&mut self.host, spec);
    }

    fn jump_to(&mut self, index: usize) {
        self.animator.cancel(&mut self.host);
        self.carousel.set_selected(index);
        self.carousel.set_scroll(self.carousel.slot_position(index));
        self.scroll_changed();
        self.center_changed(index);
    }

    fn scroll_changed(&mut self) {
        self.host.set_offset(self.carousel.scroll_x());
        self.host.request_redraw();
        for index in self.carousel.take_center_changes() {
            self.center_changed(index);
        }
    }

    fn center_changed(&mut self, index: usize) {
        self.set_panel_frozen(index != 0);
        if self.center_index != index {
            self.center_index = index;
            self.host.emit(Signal::CenterItemChanged(index));
        }
    }

    /// Leaving the first item locks the drawer so horizontal scrolls stay in the carousel.
    fn set_panel_frozen(&mut self, frozen: bool) {
        if self.panel_frozen != frozen {
            self.panel_frozen = frozen;
            self.host.emit(Signal::PanelFreeze(frozen));
        }
    }

    pub fn panel_frozen(&self) -> bool {
        self.panel_frozen
    }

    /// The drawer is sliding, so the carousel ignores touches.
    pub fn is_moving(&self) -> bool {
        self.panel_rel > 0.0 && self.panel_rel < 1.0
    }

    /// Reports a tap on an item; suppressed when the gesture scrolled the carousel.
    pub fn click(&mut self, id: ItemId) -> Result<(), WidgetError> {
        self.index_of(id)?;
        if self.scrolled {
            log::debug!("Ignoring click on {} after scroll", id);
            return Ok(());
        }
        self.host.emit(Signal::ItemClicked(id));
        Ok(())
    }

    /// Returns whether the rotary event moved the selection.
    pub fn rotary(&mut self, direction: RotaryDirection) -> bool {
        if !self.panel_active || self.is_moving() || self.animator.running() {
            return false;
        }
        let selected = self.carousel.selected();
        let next = Travel::from(direction).step(selected, self.carousel.len());
        if next == selected {
            return false;
        }
        self.animate_to(next);
        true
    }

    fn panel_scroll(&mut self, rel: f64) {
        self.panel_rel = rel;
        self.host.emit(Signal::Dim(dim_alpha(rel)));
    }

    fn panel_active(&mut self, active: bool) {
        self.panel_active = active;
        self.host
            .emit(if active { Signal::Opened } else { Signal::Closed });
    }

    fn back(&mut self) {
        if !self.opened {
            return;
        }
        self.set_panel_frozen(false);
        self.opened = false;
        self.carousel.reset_selection();
        self.center_changed(0);
    }

    fn on_frame(&mut self, ticker: TickerId, progress: f64) {
        let outcome = self
            .animator
            .tick(&mut self.host, ticker, progress, &mut self.carousel);
        if outcome == TickOutcome::Ignored {
            return;
        }
        self.scroll_changed();
        if outcome == TickOutcome::Completed {
            self.host.emit(Signal::Settled(self.carousel.selected()));
        }
    }

    fn end_scroll(&mut self) {
        if !self.carousel.end_scroll() {
            return;
        }
        let previous = self.carousel.previous();
        let scroll = self.carousel.scroll_x();
        let diff = scroll - self.carousel.slot_position(previous);
        if diff.abs() < SCROLL_EPSILON {
            return;
        }

        let vx = ratio(self.velocity.velocity().x, self.tuning.velocity_divisor);
        let next = if vx.abs() > self.tuning.fling_threshold {
            let step = if vx < 0.0 { 1 } else { -1 };
            previous as isize + step
        } else if diff.abs() > self.tuning.item_width / 2.0 {
            let step = if diff > 0.0 { -1 } else { 1 };
            previous as isize + step
        } else {
            previous as isize
        };
        let next = self.carousel.clamp_index(next);
        log::debug!("Carousel released towards item {} (vx {:.1})", next, vx);
        self.animate_to(next);
    }
}

impl<H: Host> Widget for MoreOptionLayout<H> {
    fn dispatch(&mut self, event: &Event) -> bool {
        crate::dispatch_via_table!(self, event)
    }
}

impl<H: Host> Draggable for MoreOptionLayout<H> {
    fn press(&mut self, event: PointerEvent) {
        if self.is_moving() {
            log::debug!("Drawer is sliding, ignoring press");
            return;
        }
        self.session = Some(DragSession::begin(
            event.point,
            self.carousel.selected(),
            self.carousel.scroll_x(),
        ));
        self.scrolled = false;
        self.velocity.reset();
        self.velocity
            .add_movement(event.point.x, event.point.y, event.timestamp);
    }

    fn motion(&mut self, event: PointerEvent) {
        if self.is_moving() || !self.scrollable || self.carousel.is_empty() {
            return;
        }
        let Some(mut session) = self.session.take() else {
            return;
        };

        if !session.is_dragging() {
            if session
                .try_lock(event.point, Slop::Radial(self.tuning.touch_slop))
                .is_some()
            {
                session.origin = event.point;
                self.scrolled = true;
                self.animator.cancel(&mut self.host);
                self.carousel.begin_scroll();
                self.host.emit(Signal::Freeze);
            }
            self.session = Some(session);
            return;
        }

        self.velocity
            .add_movement(event.point.x, event.point.y, event.timestamp);
        self.carousel
            .scroll_by(session.delta(event.point), self.tuning.overscroll_damping);
        self.scroll_changed();
        self.session = Some(session);
    }

    fn release(&mut self, _event: PointerEvent) {
        let Some(session) = self.session.take() else {
            return;
        };
        if self.is_moving() {
            self.carousel.end_scroll();
            return;
        }
        if session.is_dragging() {
            self.end_scroll();
            self.host.emit(Signal::Thaw);
        }
    }

    fn cancel(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if session.is_dragging() && self.carousel.end_scroll() {
            self.host.emit(Signal::Thaw);
            self.animate_to(self.carousel.previous());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use std::time::Duration;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn layout(count: usize) -> MoreOptionLayout<RecordingHost> {
        let mut l = MoreOptionLayout::new(RecordingHost::default(), &Tuning::default()).unwrap();
        for _ in 0..count {
            l.append();
        }
        l.host_mut().take_signals();
        l
    }

    fn pump(l: &mut MoreOptionLayout<RecordingHost>, now: Duration) {
        let events = l.host_mut().advance(now);
        for event in events {
            l.dispatch(&event.into());
        }
    }

    fn swipe(l: &mut MoreOptionLayout<RecordingHost>, points: &[(f64, u64)]) {
        let (x0, t0) = points[0];
        l.dispatch(&Event::Press(PointerEvent::new(x0, 100.0, ms(t0))));
        for &(x, t) in &points[1..] {
            l.dispatch(&Event::Move(PointerEvent::new(x, 100.0, ms(t))));
        }
        let &(x, t) = points.last().unwrap();
        l.dispatch(&Event::Release(PointerEvent::new(x, 100.0, ms(t + 10))));
    }

    #[test]
    fn test_append_keeps_first_selected() {
        let mut l = layout(0);
        let a = l.append();
        let b = l.append();
        let c = l.prepend();
        assert_eq!(l.items().collect::<Vec<_>>(), vec![c, a, b]);
        assert_eq!(l.selected_index(), 0);
        assert_eq!(l.scroll_position(), 0.0);

        let d = l.insert_after(a).unwrap();
        let e = l.insert_before(c).unwrap();
        assert_eq!(l.items().collect::<Vec<_>>(), vec![e, c, a, d, b]);
        assert_eq!(
            l.insert_before(ItemId::from(99)),
            Err(WidgetError::UnknownItem(ItemId::from(99)))
        );
    }

    #[test]
    fn test_remove_resets_selection() {
        let mut l = layout(4);
        l.select(2, false).unwrap();
        assert_eq!(l.scroll_position(), -720.0);
        let first = l.items().next().unwrap();
        l.remove(first).unwrap();
        assert_eq!(l.len(), 3);
        assert_eq!(l.selected_index(), 0);
        assert_eq!(l.scroll_position(), 0.0);
        assert!(l.remove(first).is_err());
    }

    #[test]
    fn test_item_parts() {
        let mut l = layout(1);
        let id = l.items().next().unwrap();
        l.set_item_text(id, "main", "Share").unwrap();
        l.set_item_translatable_text(id, "sub", "app", "IDS_SHARE")
            .unwrap();
        assert_eq!(l.item_text(id, "main"), Some(&TextPart::plain("Share")));
        assert_eq!(
            l.item_text(id, "sub").and_then(|t| t.domain.as_deref()),
            Some("app")
        );
        assert_eq!(l.item_text(id, "none"), None);

        assert_eq!(
            l.set_item_content(id, "icon", ContentId::new("share.png")),
            Ok(None)
        );
        assert_eq!(l.item_content(id, "icon").map(|c| c.as_str()), Some("share.png"));
        assert!(l.set_item_text(ItemId::from(42), "main", "x").is_err());
    }

    #[test]
    fn test_select_out_of_range() {
        let mut l = layout(2);
        assert_eq!(
            l.select(2, false),
            Err(WidgetError::OutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_animated_select_settles() {
        let mut l = layout(3);
        l.select(1, true).unwrap();
        assert!(l.is_animating());
        pump(&mut l, ms(150));
        pump(&mut l, ms(400));
        assert!(!l.is_animating());
        assert_eq!(l.scroll_position(), -360.0);
        assert_eq!(l.selected_index(), 1);

        let signals = l.host_mut().take_signals();
        assert!(signals.contains(&Signal::CenterItemChanged(1)));
        assert!(signals.contains(&Signal::PanelFreeze(true)));
        assert_eq!(signals.last(), Some(&Signal::Settled(1)));
    }

    #[test]
    fn test_returning_to_first_thaws_panel() {
        let mut l = layout(3);
        l.select(1, false).unwrap();
        assert!(l.panel_frozen());
        l.select(0, false).unwrap();
        assert!(!l.panel_frozen());
        let signals = l.host_mut().take_signals();
        assert_eq!(
            signals
                .iter()
                .filter(|s| matches!(s, Signal::PanelFreeze(_)))
                .count(),
            2
        );
    }

    #[test]
    fn test_half_width_swipe_moves_one_item() {
        let mut l = layout(3);
        // slow: 20px per 100ms stays under the fling threshold
        let points: Vec<(f64, u64)> = (0..=12).map(|i| (300.0 - 20.0 * i as f64, 100 * i)).collect();
        swipe(&mut l, &points);
        assert!(l.is_animating());
        pump(&mut l, ms(5000));
        assert_eq!(l.selected_index(), 1);
        assert_eq!(l.scroll_position(), -360.0);
    }

    #[test]
    fn test_short_swipe_returns() {
        let mut l = layout(3);
        let points: Vec<(f64, u64)> = (0..=6).map(|i| (300.0 - 20.0 * i as f64, 100 * i)).collect();
        swipe(&mut l, &points);
        pump(&mut l, ms(5000));
        assert_eq!(l.selected_index(), 0);
        assert_eq!(l.scroll_position(), 0.0);
    }

    #[test]
    fn test_fling_moves_one_item() {
        let mut l = layout(3);
        swipe(&mut l, &[(300.0, 0), (270.0, 10), (200.0, 20), (100.0, 30)]);
        pump(&mut l, ms(5000));
        assert_eq!(l.selected_index(), 1);
    }

    #[test]
    fn test_fling_direction_beats_displacement() {
        let mut l = layout(3);
        l.select(1, false).unwrap();

        // slow pull towards item 2 ...
        let mut points: Vec<(f64, u64)> = vec![(300.0, 0), (270.0, 100)];
        points.extend((1..=18).map(|k| (270.0 - 20.0 * k as f64, 100 + 100 * k)));
        // ... then a fast flick back that leaves the scroll 200px past item 1
        points.extend([(-50.0, 1910), (-10.0, 1920), (30.0, 1930), (70.0, 1940)]);
        let (x0, t0) = points[0];
        l.dispatch(&Event::Press(PointerEvent::new(x0, 100.0, ms(t0))));
        for &(x, t) in &points[1..] {
            l.dispatch(&Event::Move(PointerEvent::new(x, 100.0, ms(t))));
        }
        assert_eq!(l.scroll_position(), -560.0);
        l.dispatch(&Event::Release(PointerEvent::new(70.0, 100.0, ms(1950))));

        pump(&mut l, ms(5000));
        assert_eq!(l.selected_index(), 0);
        assert_eq!(l.scroll_position(), 0.0);
    }

    #[test]
    fn test_fling_clamps_at_first_item() {
        let mut l = layout(3);
        swipe(&mut l, &[(100.0, 0), (130.0, 10), (200.0, 20), (300.0, 30)]);
        pump(&mut l, ms(5000));
        assert_eq!(l.selected_index(), 0);
        assert_eq!(l.scroll_position(), 0.0);
    }

    #[test]
    fn test_scroll_emits_freeze_and_thaw() {
        let mut l = layout(3);
        swipe(&mut l, &[(300.0, 0), (250.0, 100), (240.0, 200)]);
        let signals = l.host_mut().take_signals();
        assert_eq!(signals.first(), Some(&Signal::Freeze));
        assert!(signals.contains(&Signal::Thaw));
    }

    #[test]
    fn test_click_suppressed_after_scroll() {
        let mut l = layout(2);
        let id = l.items().next().unwrap();
        swipe(&mut l, &[(300.0, 0), (302.0, 50)]);
        l.click(id).unwrap();
        assert_eq!(l.host_mut().take_signals(), vec![Signal::ItemClicked(id)]);

        swipe(&mut l, &[(300.0, 1000), (250.0, 1100), (240.0, 1200)]);
        l.host_mut().take_signals();
        l.click(id).unwrap();
        assert!(l.host().signals.is_empty());
    }

    #[test]
    fn test_press_ignored_while_drawer_slides() {
        let mut l = layout(3);
        l.dispatch(&Event::PanelScroll(0.5));
        assert_eq!(l.host_mut().take_signals(), vec![Signal::Dim(63)]);
        swipe(&mut l, &[(300.0, 0), (100.0, 100), (0.0, 200)]);
        assert!(l.host().signals.is_empty());
        assert_eq!(l.scroll_position(), 0.0);
    }

    #[test]
    fn test_rotary_requires_active_panel() {
        let mut l = layout(3);
        assert!(!l.rotary(RotaryDirection::Clockwise));

        l.dispatch(&Event::PanelActive(true));
        assert_eq!(l.host_mut().take_signals(), vec![Signal::Opened]);
        assert!(!l.rotary(RotaryDirection::CounterClockwise));
        assert!(l.rotary(RotaryDirection::Clockwise));
        // busy until the animation lands
        assert!(!l.rotary(RotaryDirection::Clockwise));
        pump(&mut l, ms(1000));
        assert_eq!(l.selected_index(), 1);

        assert!(l.dispatch(&Event::Rotary(RotaryDirection::Clockwise)));
        pump(&mut l, ms(2000));
        assert_eq!(l.selected_index(), 2);
        assert!(!l.rotary(RotaryDirection::Clockwise));
    }

    #[test]
    fn test_back_closes_and_resets() {
        let mut l = layout(3);
        l.set_opened(true);
        l.select(2, false).unwrap();
        l.host_mut().take_signals();
        l.dispatch(&Event::Back);
        assert!(!l.opened());
        assert_eq!(l.selected_index(), 0);
        assert_eq!(
            l.host_mut().take_signals(),
            vec![Signal::PanelFreeze(false), Signal::CenterItemChanged(0)]
        );
    }

    #[test]
    fn test_panel_hold_signals() {
        let mut l = layout(1);
        l.dispatch(&Event::PanelHold(true));
        l.dispatch(&Event::PanelHold(false));
        l.dispatch(&Event::PanelActive(false));
        assert_eq!(
            l.host_mut().take_signals(),
            vec![Signal::Hold, Signal::Unhold, Signal::Closed]
        );
    }

    #[test]
    fn test_cancel_returns_to_previous() {
        let mut l = layout(3);
        l.dispatch(&Event::Press(PointerEvent::new(300.0, 100.0, ms(0))));
        l.dispatch(&Event::Move(PointerEvent::new(250.0, 100.0, ms(100))));
        l.dispatch(&Event::Move(PointerEvent::new(100.0, 100.0, ms(200))));
        assert_eq!(l.scroll_position(), -150.0);
        l.dispatch(&Event::Cancel);
        pump(&mut l, ms(2000));
        assert_eq!(l.scroll_position(), 0.0);
        assert_eq!(l.selected_index(), 0);
    }
}
