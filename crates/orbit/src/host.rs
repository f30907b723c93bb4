use crate::clock::FrameClock;
use crate::drag::Travel;
use crate::floating::Side;
use crate::item::ItemId;
use strum::IntoStaticStr;

/// Outbound notifications consumed by theming and accessibility layers.
#[derive(Debug, Clone, PartialEq, IntoStaticStr)]
pub enum Signal {
    #[strum(serialize = "pressed")]
    Pressed,
    #[strum(serialize = "unpressed")]
    Unpressed,
    #[strum(serialize = "freeze")]
    Freeze,
    #[strum(serialize = "thaw")]
    Thaw,
    #[strum(serialize = "layout")]
    Layout { side: Side, buttons: usize },
    #[strum(serialize = "action")]
    Action(Travel),
    #[strum(serialize = "threshold,update")]
    ThresholdUpdate(f64),
    #[strum(serialize = "block")]
    Blocked(bool),
    #[strum(serialize = "visible")]
    Visible(bool),
    #[strum(serialize = "settled")]
    Settled(usize),
    #[strum(serialize = "more,option,opened")]
    Opened,
    #[strum(serialize = "more,option,closed")]
    Closed,
    #[strum(serialize = "more,option,hold")]
    Hold,
    #[strum(serialize = "more,option,unhold")]
    Unhold,
    #[strum(serialize = "item,selected")]
    ItemClicked(ItemId),
    #[strum(serialize = "center,item,changed")]
    CenterItemChanged(usize),
    #[strum(serialize = "panel,freeze")]
    PanelFreeze(bool),
    #[strum(serialize = "dim")]
    Dim(u8),
    #[strum(serialize = "changed")]
    Changed(ItemId),
    #[strum(serialize = "index,show")]
    IndexShow,
    #[strum(serialize = "index,hide")]
    IndexHide,
}

impl Signal {
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

/// The host widget framework as seen from a widget engine.
pub trait Host: FrameClock {
    /// Live visual offset; units depend on the widget (normalized drag value or pixels).
    fn set_offset(&mut self, offset: f64);
    fn emit(&mut self, signal: Signal);
    fn request_redraw(&mut self) {}
}
