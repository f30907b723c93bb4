use crate::config;
use crate::events::SimEvent;
use crate::sim::host::LogHost;
use crate::sys::script::{Command, ScriptLine};
use orbit::error::QueueError;
use orbit::event::{Container, Event, PointerEvent, Widget};
use orbit::floating::{FloatingButton, FloatingPosition};
use orbit::index::IndexLayout;
use orbit::item::ContentId;
use orbit::more_option::MoreOptionLayout;
use orbit::tuning::Tuning;
use std::time::Duration;
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, StrumDisplay)]
#[strum(serialize_all = "kebab-case")]
pub enum WidgetKind {
    Floating,
    MoreOption,
    Index,
}

#[derive(Debug)]
pub enum Stage {
    Floating(FloatingButton<LogHost>),
    MoreOption(MoreOptionLayout<LogHost>),
    Index(IndexLayout<LogHost>),
}

impl Stage {
    fn build(kind: WidgetKind, tuning: &Tuning) -> Result<Self, QueueError> {
        Ok(match kind {
            WidgetKind::Floating => {
                Stage::Floating(FloatingButton::new(LogHost::new("floating"), tuning)?)
            }
            WidgetKind::MoreOption => {
                Stage::MoreOption(MoreOptionLayout::new(LogHost::new("more-option"), tuning)?)
            }
            WidgetKind::Index => Stage::Index(IndexLayout::new(LogHost::new("index"), tuning)),
        })
    }

    fn widget(&mut self) -> &mut dyn Widget {
        match self {
            Stage::Floating(w) => w,
            Stage::MoreOption(w) => w,
            Stage::Index(w) => w,
        }
    }

    pub fn host(&self) -> &LogHost {
        match self {
            Stage::Floating(w) => w.host(),
            Stage::MoreOption(w) => w.host(),
            Stage::Index(w) => w.host(),
        }
    }

    fn host_mut(&mut self) -> &mut LogHost {
        match self {
            Stage::Floating(w) => w.host_mut(),
            Stage::MoreOption(w) => w.host_mut(),
            Stage::Index(w) => w.host_mut(),
        }
    }
}

/// UI side of the replay: owns the widget and feeds it script lines and clock events.
#[derive(Debug)]
pub struct ReplayApp {
    kind: WidgetKind,
    tuning: Tuning,
    stage: Stage,
    now: Duration,
}

impl ReplayApp {
    pub fn new(kind: WidgetKind, tuning: Tuning) -> Result<Self, QueueError> {
        let stage = Stage::build(kind, &tuning)?;
        Ok(Self {
            kind,
            tuning,
            stage,
            now: Duration::ZERO,
        })
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Returns `false` once the replay is over.
    pub fn handle(&mut self, event: SimEvent) -> bool {
        match event {
            SimEvent::Script(line) => self.apply(line),
            SimEvent::Tick(now) => self.pump(now),
            SimEvent::ConfigReload => self.reload(config::load_or_default()),
            SimEvent::ScriptDone(end) => {
                self.pump(end);
                log::info!(
                    "Replay finished at {:?}: {} signals, last offset {:?}, idle {}",
                    self.now,
                    self.stage.host().signal_count(),
                    self.stage.host().last_offset(),
                    self.stage.host().is_idle()
                );
                return false;
            }
        }
        true
    }

    fn reload(&mut self, tuning: Tuning) {
        if tuning == self.tuning {
            return;
        }
        match Stage::build(self.kind, &tuning) {
            Ok(stage) => {
                log::info!("Tuning reloaded, {} widget restarted", self.kind);
                self.stage = stage;
                self.tuning = tuning;
            }
            Err(e) => log::error!("Failed to apply reloaded tuning: {}", e),
        }
    }

    fn pump(&mut self, now: Duration) {
        self.now = self.now.max(now);
        let events = self.stage.host_mut().advance(self.now);
        for event in events {
            self.stage.widget().dispatch(&event.into());
        }
    }

    fn dispatch(&mut self, event: Event) {
        if !self.stage.widget().dispatch(&event) {
            log::debug!("{} ignored {}", self.kind, event.kind());
        }
    }

    fn apply(&mut self, line: ScriptLine) {
        self.pump(line.at);
        let at = line.at;
        let pointer = |p: orbit::geometry::Point| PointerEvent::new(p.x, p.y, at);

        match line.command {
            Command::Press(p) => self.dispatch(Event::Press(pointer(p))),
            Command::Move(p) => self.dispatch(Event::Move(pointer(p))),
            Command::Release(p) => self.dispatch(Event::Release(pointer(p))),
            Command::Cancel => self.dispatch(Event::Cancel),
            Command::Resize(size) => self.dispatch(Event::Resize(size)),
            Command::Rotary(dir) => self.dispatch(Event::Rotary(dir)),
            Command::Panel(rel) => self.dispatch(Event::PanelScroll(rel)),
            Command::Active(on) => self.dispatch(Event::PanelActive(on)),
            Command::Hold(on) => self.dispatch(Event::PanelHold(on)),
            Command::Back => self.dispatch(Event::Back),
            Command::Append(label) => self.append(label),
            Command::Select(index) => self.select(index),
        }
    }

    fn append(&mut self, label: String) {
        match &mut self.stage {
            Stage::Floating(w) => {
                let part = if w.content("button1").is_none() {
                    "button1"
                } else {
                    "button2"
                };
                if let Err(e) = w.content_set(part, ContentId::new(label)) {
                    log::warn!("Append failed: {}", e);
                }
            }
            Stage::MoreOption(w) => {
                let id = w.append();
                if let Err(e) = w.set_item_text(id, "main", label) {
                    log::error!("Fresh item rejected its text: {}", e);
                }
            }
            Stage::Index(w) => {
                w.append(label, None);
            }
        }
    }

    fn select(&mut self, index: usize) {
        let result = match &mut self.stage {
            Stage::Floating(w) => match FloatingPosition::from_index(index) {
                Some(pos) => w.bring_in(pos),
                None => {
                    log::warn!("No floating position {}", index);
                    return;
                }
            },
            Stage::MoreOption(w) => w.select(index, true),
            Stage::Index(w) => match w.current().get(index).copied() {
                Some(id) => w.set_selected(id),
                None => {
                    log::warn!("No index item {}", index);
                    return;
                }
            },
        };
        if let Err(e) = result {
            log::warn!("Select {} failed: {}", index, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orbit::geometry::{Point, Size};

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn run(app: &mut ReplayApp, lines: &[(u64, Command)]) {
        for (at, command) in lines {
            assert!(app.handle(SimEvent::Script(ScriptLine {
                at: ms(*at),
                command: command.clone(),
            })));
        }
        assert!(!app.handle(SimEvent::ScriptDone(ms(10_000))));
    }

    #[test]
    fn test_floating_replay() {
        let mut app = ReplayApp::new(WidgetKind::Floating, Tuning::default()).unwrap();
        run(
            &mut app,
            &[
                (0, Command::Resize(Size::new(360.0, 100.0))),
                (10, Command::Append("call".to_string())),
                (20, Command::Select(2)),
            ],
        );
        let Stage::Floating(w) = app.stage() else {
            panic!("wrong stage");
        };
        assert_eq!(w.position(), FloatingPosition::Center);
        assert_eq!(w.button_count(), 1);
        let offset = app.stage().host().last_offset().unwrap();
        assert!((offset - 0.5).abs() < 1e-9);
        assert!(app.stage().host().is_idle());
    }

    #[test]
    fn test_more_option_replay() {
        let mut app = ReplayApp::new(WidgetKind::MoreOption, Tuning::default()).unwrap();
        run(
            &mut app,
            &[
                (0, Command::Append("Share".to_string())),
                (0, Command::Append("Delete".to_string())),
                (0, Command::Append("Edit".to_string())),
                (10, Command::Active(true)),
                (20, Command::Rotary(orbit::event::RotaryDirection::Clockwise)),
                (1000, Command::Select(2)),
            ],
        );
        let Stage::MoreOption(w) = app.stage() else {
            panic!("wrong stage");
        };
        assert_eq!(w.selected_index(), 2);
        assert_eq!(w.scroll_position(), -720.0);
    }

    #[test]
    fn test_index_replay() {
        let mut app = ReplayApp::new(WidgetKind::Index, Tuning::default()).unwrap();
        run(
            &mut app,
            &[
                (0, Command::Append("A".to_string())),
                (0, Command::Append("B".to_string())),
                (10, Command::Panel(1.0)),
                (20, Command::Rotary(orbit::event::RotaryDirection::Clockwise)),
            ],
        );
        let Stage::Index(w) = app.stage() else {
            panic!("wrong stage");
        };
        assert_eq!(w.selected_item(), w.current().get(1).copied());
        // hide timer fired long before the end of the replay
        assert!(!w.is_shown());
    }

    #[test]
    fn test_ignored_events_are_harmless() {
        let mut app = ReplayApp::new(WidgetKind::Index, Tuning::default()).unwrap();
        run(
            &mut app,
            &[
                (0, Command::Press(Point::new(1.0, 1.0))),
                (5, Command::Select(9)),
            ],
        );
        assert_eq!(app.stage().host().signal_count(), 0);
    }

    #[test]
    fn test_reload_restarts_widget() {
        let mut app = ReplayApp::new(WidgetKind::MoreOption, Tuning::default()).unwrap();
        app.handle(SimEvent::Script(ScriptLine {
            at: ms(0),
            command: Command::Append("x".to_string()),
        }));
        let mut tuning = Tuning::default();
        tuning.more_option.item_width = 300.0;
        app.reload(tuning);
        let Stage::MoreOption(w) = app.stage() else {
            panic!("wrong stage");
        };
        assert!(w.is_empty());
    }
}
