use crate::animator::{AnimationSpec, Animator, TickOutcome};
use crate::clock::{TickerId, TimerId};
use crate::drag::{DragSession, Slop, Travel, elastic, ratio};
use crate::error::{QueueError, WidgetError};
use crate::event::{
    Container, Draggable, Event, EventKind, EventTable, PointerEvent, Resizable, Widget,
};
use crate::floating::model::{fling_target, pick_target};
use crate::floating::{
    ButtonPart, FloatingMode, FloatingPosition, MAX_BUTTONS, PositionMask, PositionTable, Side,
    TrackGeometry,
};
use crate::geometry::Size;
use crate::host::{Host, Signal};
use crate::item::ContentId;
use crate::tuning::{FloatingTuning, Tuning};
use crate::velocity::VelocityTracker;

/// Floating action button that rests on one of five positions along a horizontal track.
///
/// The offset handed to the host is the normalized drag value in `[0, 1]`, stretched slightly
/// past either end while the finger overscrolls.
#[derive(Debug)]
pub struct FloatingButton<H: Host> {
    host: H,
    tuning: FloatingTuning,
    handlers: EventTable<Self>,
    animator: Animator<f64>,
    velocity: VelocityTracker,
    session: Option<DragSession>,
    settle_timer: Option<TimerId>,
    buttons: [Option<ContentId>; MAX_BUTTONS],
    table: PositionTable,
    mask: PositionMask,
    mode: FloatingMode,
    pos: FloatingPosition,
    size: Size,
    offset: f64,
    blocked: bool,
    disabled: bool,
    compressed: bool,
    center: bool,
    state_emitted: bool,
}

impl<H: Host> FloatingButton<H> {
    pub fn new(host: H, tuning: &Tuning) -> Result<Self, QueueError> {
        let velocity = VelocityTracker::new(tuning.velocity.capacity, tuning.velocity.window)?;
        let mut button = Self {
            host,
            tuning: tuning.floating.clone(),
            handlers: Self::event_table(),
            animator: Animator::new(|offset: &mut f64, value, _| *offset = value),
            velocity,
            session: None,
            settle_timer: None,
            buttons: Default::default(),
            table: PositionTable::default(),
            mask: PositionMask::for_mode(FloatingMode::Default),
            mode: FloatingMode::Default,
            pos: FloatingPosition::default(),
            size: Size::default(),
            offset: 0.0,
            blocked: false,
            disabled: false,
            compressed: false,
            center: false,
            state_emitted: false,
        };
        button.recalc_table();
        button.update_pos(false);
        button.threshold_update();
        Ok(button)
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
            .on(EventKind::Resize, |w, e| {
                if let Event::Resize(size) = e {
                    w.resize(*size)
                }
            })
            .on(EventKind::Frame, |w, e| {
                if let Event::Frame { ticker, progress } = e {
                    w.on_frame(*ticker, *progress)
                }
            })
            .on(EventKind::Timer, |w, e| {
                if let Event::Timer(timer) = e {
                    w.on_timer(*timer)
                }
            })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn position(&self) -> FloatingPosition {
        self.pos
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn table(&self) -> &PositionTable {
        &self.table
    }

    pub fn is_dragging(&self) -> bool {
        self.session.as_ref().is_some_and(DragSession::is_dragging)
    }

    pub fn is_animating(&self) -> bool {
        self.animator.running()
    }

    /// Jumps to `pos` without animating.
    pub fn set_position(&mut self, pos: FloatingPosition) -> Result<(), WidgetError> {
        self.check_target(pos)?;
        self.pos = pos;
        self.update_pos(false);
        Ok(())
    }

    /// Animates to `pos`, announcing the direction of travel first.
    pub fn bring_in(&mut self, pos: FloatingPosition) -> Result<(), WidgetError> {
        self.check_target(pos)?;
        if pos != self.pos {
            let travel = if pos.as_index() > self.pos.as_index() {
                Travel::Forward
            } else {
                Travel::Backward
            };
            self.host.emit(Signal::Action(travel));
        }
        self.pos = pos;
        self.update_pos(true);
        Ok(())
    }

    fn check_target(&self, pos: FloatingPosition) -> Result<(), WidgetError> {
        if self.blocked {
            log::warn!("Floating button is blocked, ignoring move to {}", pos);
            return Err(WidgetError::MovementBlocked);
        }
        if !self.mask.allows(pos) {
            log::warn!("Position {} is disabled in {} mode", pos, self.mode);
            return Err(WidgetError::PositionDisabled(pos));
        }
        Ok(())
    }

    pub fn set_movement_blocked(&mut self, blocked: bool) {
        if self.blocked == blocked {
            return;
        }
        self.blocked = blocked;
        self.host.emit(Signal::Blocked(blocked));
    }

    pub fn movement_blocked(&self) -> bool {
        self.blocked
    }

    pub fn set_mode(&mut self, mode: FloatingMode) {
        self.mode = mode;
        self.mask = PositionMask::for_mode(mode);
    }

    pub fn mode(&self) -> FloatingMode {
        self.mode
    }

    /// Disabled buttons still move but stop reporting presses.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn disabled(&self) -> bool {
        self.disabled
    }

    /// Compressed display hides the button (e.g. while an input panel is up).
    pub fn set_compressed(&mut self, compressed: bool) {
        if self.compressed == compressed {
            return;
        }
        self.compressed = compressed;
        self.host.emit(Signal::Visible(!compressed));
    }

    pub fn compressed(&self) -> bool {
        self.compressed
    }

    pub fn button_count(&self) -> usize {
        self.buttons.iter().flatten().count()
    }

    fn button_width(&self) -> f64 {
        let width = if self.button_count() >= 2 {
            self.tuning.two_button_width
        } else {
            self.tuning.one_button_width
        };
        width * self.tuning.scale
    }

    // the track runs one button width past each edge so the out positions hide the button
    fn geometry(&self) -> TrackGeometry {
        let button_width = self.button_width();
        let track_width = if self.size.is_degenerate() {
            0.0
        } else {
            self.size.w + 2.0 * button_width
        };
        TrackGeometry {
            track_width,
            button_width,
            side_width: self.tuning.side_width * self.tuning.scale,
        }
    }

    fn recalc_table(&mut self) {
        self.table = PositionTable::from_geometry(&self.geometry());
    }

    fn emit_state(&mut self) {
        let buttons = self.button_count().clamp(1, MAX_BUTTONS);
        let side = self.pos.side();
        self.center = side == Side::Center;
        self.state_emitted = true;
        self.host.emit(Signal::Layout { side, buttons });
    }

    fn threshold_update(&mut self) {
        let threshold = self.button_width() + self.tuning.threshold_padding * self.tuning.scale;
        self.host.emit(Signal::ThresholdUpdate(threshold));
    }

    fn set_offset(&mut self, offset: f64) {
        self.offset = offset;
        self.host.set_offset(offset);
        self.host.request_redraw();
    }

    fn update_pos(&mut self, animate: bool) {
        let target = self.table.get(self.pos);
        let last = self.offset;
        self.animator.cancel(&mut self.host);

        let mut animating = false;
        if animate && (last - target).abs() >= self.tuning.snap_epsilon {
            let spec = AnimationSpec::new(last, target, self.tuning.animation)
                .with_curve(self.tuning.curve);
            self.animator.start(&mut self.host, spec);
            animating = true;
        } else {
            self.set_offset(target);
        }

        if !animate || !self.state_emitted {
            self.emit_state();
        }
        self.state_emitted = false;

        if !animate || animating {
            self.restart_settle_timer();
        }
    }

    fn restart_settle_timer(&mut self) {
        if let Some(timer) = self.settle_timer.take() {
            self.host.cancel_timer(timer);
        }
        self.settle_timer = Some(self.host.start_timer(self.tuning.settle_delay));
    }

    fn on_frame(&mut self, ticker: TickerId, progress: f64) {
        let outcome = self
            .animator
            .tick(&mut self.host, ticker, progress, &mut self.offset);
        if outcome == TickOutcome::Ignored {
            return;
        }
        self.host.set_offset(self.offset);
        self.host.request_redraw();
        if outcome == TickOutcome::Completed {
            self.host.emit(Signal::Settled(self.pos.as_index()));
        }
    }

    fn on_timer(&mut self, timer: TimerId) {
        if self.settle_timer != Some(timer) {
            return;
        }
        self.settle_timer = None;
        self.threshold_update();
    }

    fn live_offset(&self, session: &DragSession, event: &PointerEvent) -> f64 {
        let raw = session.start_offset + ratio(session.delta(event.point), self.geometry().travel());
        elastic(raw, 0.0, 1.0, self.tuning.overscroll_damping)
    }

    fn snap_target(&mut self, session: &DragSession) -> FloatingPosition {
        let start = FloatingPosition::from_index(session.start_slot).unwrap_or(self.pos);
        if (self.offset - session.start_offset).abs() < self.tuning.snap_epsilon {
            return start;
        }

        let vx = ratio(self.velocity.velocity().x, self.tuning.velocity_divisor);
        if vx.abs() > self.tuning.fling_threshold
            && let Some(travel) = Travel::from_delta(vx)
        {
            log::debug!("Fling {} at {:.1} from {}", travel, vx, start);
            return fling_target(start, &self.mask, travel);
        }

        let travel = session.travel.unwrap_or(Travel::Forward);
        pick_target(
            &self.table,
            &self.mask,
            travel,
            self.offset,
            self.tuning.hysteresis,
        )
    }
}

impl<H: Host> Widget for FloatingButton<H> {
    fn dispatch(&mut self, event: &Event) -> bool {
        crate::dispatch_via_table!(self, event)
    }
}

impl<H: Host> Draggable for FloatingButton<H> {
    fn press(&mut self, event: PointerEvent) {
        self.session = Some(DragSession::begin(
            event.point,
            self.pos.as_index(),
            self.offset,
        ));
        self.velocity.reset();
        self.velocity
            .add_movement(event.point.x, event.point.y, event.timestamp);
        if !self.disabled {
            self.host.emit(Signal::Pressed);
        }
    }

    fn motion(&mut self, event: PointerEvent) {
        if self.blocked || self.size.is_degenerate() {
            return;
        }
        let Some(mut session) = self.session.take() else {
            return;
        };

        if !session.is_dragging() {
            if session
                .try_lock(event.point, Slop::Axis(self.tuning.finger_size * self.tuning.scale))
                .is_none()
            {
                self.session = Some(session);
                return;
            }
            self.animator.cancel(&mut self.host);
            session.start_offset = self.offset;
            session.start_slot = self.pos.as_index();
            self.host.emit(Signal::Freeze);
        }

        self.velocity
            .add_movement(event.point.x, event.point.y, event.timestamp);
        let offset = self.live_offset(&session, &event);
        self.set_offset(offset);

        let lower = self.table.get(FloatingPosition::Left) + self.tuning.center_margin;
        let upper = self.table.get(FloatingPosition::Right) - self.tuning.center_margin;
        if !self.center && offset > lower && offset < upper {
            let buttons = self.button_count().clamp(1, MAX_BUTTONS);
            self.center = true;
            self.host.emit(Signal::Layout {
                side: Side::Center,
                buttons,
            });
        }

        self.session = Some(session);
    }

    fn release(&mut self, event: PointerEvent) {
        let Some(session) = self.session.take() else {
            return;
        };

        if session.is_dragging() {
            self.velocity
                .add_movement(event.point.x, event.point.y, event.timestamp);
            self.pos = self.snap_target(&session);
            self.host.emit(Signal::Thaw);
            log::debug!("Floating button released towards {}", self.pos);
        }
        self.update_pos(true);

        if !self.disabled {
            self.host.emit(Signal::Unpressed);
        }
    }

    fn cancel(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if session.is_dragging() {
            self.host.emit(Signal::Thaw);
            self.update_pos(true);
        }
    }
}

impl<H: Host> Resizable for FloatingButton<H> {
    fn resize(&mut self, size: Size) {
        self.size = size;
        self.recalc_table();

        if self.is_dragging() {
            if size.is_degenerate() {
                log::debug!("Track collapsed mid-drag, dropping the gesture");
                self.session = None;
                self.host.emit(Signal::Thaw);
                self.update_pos(false);
            }
            return;
        }
        self.update_pos(false);
    }
}

impl<H: Host> Container for FloatingButton<H> {
    type Content = ContentId;

    fn content_set(
        &mut self,
        part: &str,
        content: ContentId,
    ) -> Result<Option<ContentId>, WidgetError> {
        let part: ButtonPart = part
            .parse()
            .map_err(|_| WidgetError::UnknownPart(part.to_string()))?;
        let previous = self.buttons[part.as_index()].replace(content);
        self.content_changed();
        Ok(previous)
    }

    fn content(&self, part: &str) -> Option<&ContentId> {
        let part: ButtonPart = part.parse().ok()?;
        self.buttons[part.as_index()].as_ref()
    }

    fn content_unset(&mut self, part: &str) -> Option<ContentId> {
        let part: ButtonPart = part.parse().ok()?;
        let previous = self.buttons[part.as_index()].take();
        if previous.is_some() {
            self.content_changed();
        }
        previous
    }
}

impl<H: Host> FloatingButton<H> {
    fn content_changed(&mut self) {
        self.emit_state();
        self.recalc_table();
        self.threshold_update();
        if !self.is_dragging() {
            self.update_pos(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;
    use std::time::Duration;

    const WIDTH: f64 = 360.0;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn button() -> FloatingButton<RecordingHost> {
        let mut b = FloatingButton::new(RecordingHost::default(), &Tuning::default()).unwrap();
        b.resize(Size::new(WIDTH, 100.0));
        b.host_mut().take_signals();
        b
    }

    fn pump(b: &mut FloatingButton<RecordingHost>, now: Duration) {
        let events = b.host_mut().advance(now);
        for event in events {
            b.dispatch(&event.into());
        }
    }

    fn travel() -> f64 {
        WIDTH + Tuning::default().floating.one_button_width
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Slow drag: one sample every 100ms keeps the windowed velocity small.
    fn drag(b: &mut FloatingButton<RecordingHost>, from: f64, to: f64, start: Duration) {
        let steps = 6u64;
        b.dispatch(&Event::Press(PointerEvent::new(from, 50.0, start)));
        for i in 1..=steps {
            let x = from + (to - from) * i as f64 / steps as f64;
            b.dispatch(&Event::Move(PointerEvent::new(
                x,
                50.0,
                start + ms(100 * i),
            )));
        }
        b.dispatch(&Event::Release(PointerEvent::new(
            to,
            50.0,
            start + ms(100 * steps + 100),
        )));
    }

    #[test]
    fn test_starts_on_right() {
        let b = button();
        assert_eq!(b.position(), FloatingPosition::Right);
        assert_eq!(b.offset(), b.table().get(FloatingPosition::Right));
    }

    #[test]
    fn test_initial_signals() {
        let b = FloatingButton::new(RecordingHost::default(), &Tuning::default()).unwrap();
        let signals = &b.host().signals;
        assert_eq!(
            signals[0],
            Signal::Layout {
                side: Side::Right,
                buttons: 1
            }
        );
        assert_eq!(signals[1], Signal::ThresholdUpdate(178.0));
    }

    #[test]
    fn test_slow_drag_snaps_to_crossed_boundary() {
        let mut b = button();
        b.set_position(FloatingPosition::Center).unwrap();
        let start_x = 200.0;
        // 0.5 -> ~0.64 in normalized units, past the center hysteresis
        let to = start_x + 0.14 * travel();
        drag(&mut b, start_x, to, ms(0));

        assert_eq!(b.position(), FloatingPosition::Right);
        assert!(b.is_animating());
        pump(&mut b, ms(2000));
        assert!(approx(b.offset(), b.table().get(FloatingPosition::Right)));
        assert!(b.host().signals.contains(&Signal::Settled(3)));
    }

    #[test]
    fn test_short_drag_stays_put() {
        let mut b = button();
        b.set_position(FloatingPosition::Center).unwrap();
        drag(&mut b, 200.0, 200.0 + 0.08 * travel(), ms(0));
        assert_eq!(b.position(), FloatingPosition::Center);
    }

    #[test]
    fn test_freeze_and_thaw_once_per_gesture() {
        let mut b = button();
        drag(&mut b, 300.0, 100.0, ms(0));
        let signals = b.host_mut().take_signals();
        assert_eq!(signals.iter().filter(|s| **s == Signal::Freeze).count(), 1);
        assert_eq!(signals.iter().filter(|s| **s == Signal::Thaw).count(), 1);
        assert_eq!(signals.first(), Some(&Signal::Pressed));
        assert_eq!(signals.last(), Some(&Signal::Unpressed));
    }

    #[test]
    fn test_tap_does_not_snap() {
        let mut b = button();
        b.dispatch(&Event::Press(PointerEvent::new(300.0, 50.0, ms(0))));
        b.dispatch(&Event::Move(PointerEvent::new(310.0, 50.0, ms(10))));
        b.dispatch(&Event::Release(PointerEvent::new(310.0, 50.0, ms(20))));
        assert_eq!(b.position(), FloatingPosition::Right);
        assert!(!b.host().signals.contains(&Signal::Freeze));
    }

    #[test]
    fn test_zero_net_displacement_keeps_slot() {
        let mut b = button();
        b.dispatch(&Event::Press(PointerEvent::new(300.0, 50.0, ms(0))));
        b.dispatch(&Event::Move(PointerEvent::new(360.0, 50.0, ms(10))));
        b.dispatch(&Event::Move(PointerEvent::new(300.0, 50.0, ms(300))));
        b.dispatch(&Event::Release(PointerEvent::new(300.0, 50.0, ms(310))));
        assert_eq!(b.position(), FloatingPosition::Right);
    }

    #[test]
    fn test_fling_advances_one_slot_from_start() {
        let mut b = button();
        b.set_position(FloatingPosition::Left).unwrap();
        // a fast but short flick towards the right
        b.dispatch(&Event::Press(PointerEvent::new(100.0, 50.0, ms(0))));
        b.dispatch(&Event::Move(PointerEvent::new(160.0, 50.0, ms(16))));
        b.dispatch(&Event::Move(PointerEvent::new(260.0, 50.0, ms(32))));
        b.dispatch(&Event::Release(PointerEvent::new(300.0, 50.0, ms(48))));
        assert_eq!(b.position(), FloatingPosition::Center);
    }

    /// Press at `from`, then move 90px every 16ms until `to`, releasing there.
    fn flick(b: &mut FloatingButton<RecordingHost>, from: f64, to: f64) {
        b.dispatch(&Event::Press(PointerEvent::new(from, 50.0, ms(0))));
        let mut x = from;
        let mut t = 0;
        while x < to {
            x = (x + 90.0).min(to);
            t += 16;
            b.dispatch(&Event::Move(PointerEvent::new(x, 50.0, ms(t))));
        }
        assert!(b.offset() > b.table().get(FloatingPosition::Right) + 0.12);
        b.dispatch(&Event::Release(PointerEvent::new(to, 50.0, ms(t))));
    }

    #[test]
    fn test_fling_overrides_long_drag() {
        let mut b = button();
        b.set_position(FloatingPosition::Left).unwrap();
        // 360px from LEFT ends past every forward boundary
        flick(&mut b, 50.0, 410.0);
        assert_eq!(b.position(), FloatingPosition::Center);
        pump(&mut b, ms(2000));
        assert!(approx(b.offset(), b.table().get(FloatingPosition::Center)));
    }

    #[test]
    fn test_slow_long_drag_uses_boundaries() {
        let mut b = button();
        b.set_position(FloatingPosition::Left).unwrap();
        drag(&mut b, 50.0, 410.0, ms(0));
        assert_eq!(b.position(), FloatingPosition::RightOut);
    }

    #[test]
    fn test_overscroll_is_damped() {
        let mut b = button();
        b.dispatch(&Event::Press(PointerEvent::new(200.0, 50.0, ms(0))));
        b.dispatch(&Event::Move(PointerEvent::new(200.0 + travel(), 50.0, ms(100))));
        let right = b.table().get(FloatingPosition::Right);
        let expected = 1.0 + (right + 1.0 - 1.0) / 3.0;
        assert!(approx(b.offset(), expected));
    }

    #[test]
    fn test_blocked_rejects_moves() {
        let mut b = button();
        b.set_movement_blocked(true);
        assert_eq!(
            b.set_position(FloatingPosition::Left),
            Err(WidgetError::MovementBlocked)
        );
        assert_eq!(
            b.bring_in(FloatingPosition::Left),
            Err(WidgetError::MovementBlocked)
        );
        drag(&mut b, 300.0, 50.0, ms(0));
        assert_eq!(b.position(), FloatingPosition::Right);
        assert!(b.host().signals.contains(&Signal::Blocked(true)));
    }

    #[test]
    fn test_both_sides_rejects_center() {
        let mut b = button();
        b.set_mode(FloatingMode::BothSides);
        assert_eq!(
            b.set_position(FloatingPosition::Center),
            Err(WidgetError::PositionDisabled(FloatingPosition::Center))
        );
        assert!(b.bring_in(FloatingPosition::Left).is_ok());
        assert!(b.host().signals.contains(&Signal::Action(Travel::Backward)));
    }

    #[test]
    fn test_settle_timer_reports_threshold() {
        let mut b = button();
        b.bring_in(FloatingPosition::Left).unwrap();
        pump(&mut b, ms(200));
        assert!(!b.host().signals.iter().any(|s| matches!(s, Signal::ThresholdUpdate(_))));
        pump(&mut b, ms(450));
        assert!(b.host().signals.contains(&Signal::ThresholdUpdate(178.0)));
        assert!(approx(b.offset(), b.table().get(FloatingPosition::Left)));
    }

    #[test]
    fn test_second_button_widens_table() {
        let mut b = button();
        let before = b.table().get(FloatingPosition::Left);
        b.content_set("button1", ContentId::new("share")).unwrap();
        b.content_set("button2", ContentId::new("edit")).unwrap();
        assert_eq!(b.button_count(), 2);
        assert!(b.table().get(FloatingPosition::Left) > before);
        assert!(b.host().signals.contains(&Signal::Layout {
            side: Side::Right,
            buttons: 2
        }));
        assert_eq!(
            b.content_set("button3", ContentId::new("x")),
            Err(WidgetError::UnknownPart("button3".to_string()))
        );
        assert_eq!(b.content_unset("button2"), Some(ContentId::new("edit")));
        assert_eq!(b.content("button1"), Some(&ContentId::new("share")));
    }

    #[test]
    fn test_zero_width_never_divides() {
        let mut b = FloatingButton::new(RecordingHost::default(), &Tuning::default()).unwrap();
        b.dispatch(&Event::Press(PointerEvent::new(10.0, 0.0, ms(0))));
        b.dispatch(&Event::Move(PointerEvent::new(200.0, 0.0, ms(10))));
        b.dispatch(&Event::Release(PointerEvent::new(200.0, 0.0, ms(20))));
        assert!(b.offset().is_finite());
        assert_eq!(b.position(), FloatingPosition::Right);
    }

    #[test]
    fn test_collapse_mid_drag_drops_session() {
        let mut b = button();
        b.dispatch(&Event::Press(PointerEvent::new(300.0, 50.0, ms(0))));
        b.dispatch(&Event::Move(PointerEvent::new(200.0, 50.0, ms(100))));
        assert!(b.is_dragging());
        b.dispatch(&Event::Resize(Size::new(420.0, 100.0)));
        assert!(b.is_dragging());
        b.dispatch(&Event::Resize(Size::new(0.0, 100.0)));
        assert!(!b.is_dragging());
    }
}
