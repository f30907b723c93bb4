use crate::clock::TimerId;
use crate::drag::Travel;
use crate::error::WidgetError;
use crate::event::{Event, EventKind, EventTable, RotaryDirection, Widget};
use crate::host::{Host, Signal};
use crate::index::omit::{MARKER_LABEL, OmitLayout};
use crate::item::{ItemId, ItemLabel};
use crate::tuning::{IndexTuning, Tuning};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Exception items are pinned to the head of the ring and never folded into a marker.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum IndexPriority {
    Exception,
    #[default]
    Primary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexItem {
    id: ItemId,
    label: ItemLabel,
    priority: IndexPriority,
    data: Option<u64>,
    selected: bool,
}

impl IndexItem {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn label(&self) -> &ItemLabel {
        &self.label
    }

    pub fn priority(&self) -> IndexPriority {
        self.priority
    }

    pub fn data(&self) -> Option<u64> {
        self.data
    }

    pub fn selected(&self) -> bool {
        self.selected
    }
}

/// Circular fast-scroll index driven by a rotary bezel.
#[derive(Debug)]
pub struct IndexLayout<H: Host> {
    host: H,
    tuning: IndexTuning,
    handlers: EventTable<Self>,
    items: Vec<IndexItem>,
    // exception items first, then primary items, in insertion order
    current: Vec<ItemId>,
    layout: OmitLayout,
    highlighted: usize,
    hide_timer: Option<TimerId>,
    shown: bool,
    next_id: u64,
}

impl<H: Host> IndexLayout<H> {
    pub fn new(host: H, tuning: &Tuning) -> Self {
        Self {
            host,
            tuning: tuning.index.clone(),
            handlers: Self::event_table(),
            items: Vec::new(),
            current: Vec::new(),
            layout: OmitLayout::default(),
            highlighted: 0,
            hide_timer: None,
            shown: false,
            next_id: 0,
        }
    }

    fn event_table() -> EventTable<Self> {
        EventTable::<Self>::new()
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
            .on(EventKind::Timer, |w, e| {
                if let Event::Timer(timer) = e {
                    w.on_timer(*timer)
                }
            })
            .on(EventKind::Back, |w, _| w.hide())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn layout(&self) -> &OmitLayout {
        &self.layout
    }

    pub fn item(&self, id: ItemId) -> Option<&IndexItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Items in ring order.
    pub fn current(&self) -> &[ItemId] {
        &self.current
    }

    pub fn append(&mut self, label: impl Into<String>, data: Option<u64>) -> ItemId {
        self.insert_at(self.items.len(), label, data)
    }

    pub fn prepend(&mut self, label: impl Into<String>, data: Option<u64>) -> ItemId {
        self.insert_at(0, label, data)
    }

    pub fn insert_before(
        &mut self,
        sibling: ItemId,
        label: impl Into<String>,
        data: Option<u64>,
    ) -> Result<ItemId, WidgetError> {
        let index = self.position(sibling)?;
        Ok(self.insert_at(index, label, data))
    }

    pub fn insert_after(
        &mut self,
        sibling: ItemId,
        label: impl Into<String>,
        data: Option<u64>,
    ) -> Result<ItemId, WidgetError> {
        let index = self.position(sibling)?;
        Ok(self.insert_at(index + 1, label, data))
    }

    fn insert_at(&mut self, index: usize, label: impl Into<String>, data: Option<u64>) -> ItemId {
        let id = ItemId::next(&mut self.next_id);
        let item = IndexItem {
            id,
            label: ItemLabel::new(label),
            priority: IndexPriority::default(),
            data,
            selected: self.items.is_empty(),
        };
        self.items.insert(index.min(self.items.len()), item);
        self.relayout();
        id
    }

    pub fn remove(&mut self, id: ItemId) -> Result<(), WidgetError> {
        let index = self.position(id)?;
        let removed = self.items.remove(index);
        if removed.selected {
            self.select_first_in_ring();
        }
        self.relayout();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.relayout();
    }

    /// Looks an item up by the user data it was added with.
    pub fn find(&self, data: u64) -> Option<ItemId> {
        self.items
            .iter()
            .find(|item| item.data == Some(data))
            .map(IndexItem::id)
    }

    pub fn selected_item(&self) -> Option<ItemId> {
        self.items.iter().find(|item| item.selected).map(IndexItem::id)
    }

    /// Moves the selection without notifying listeners.
    pub fn set_selected(&mut self, id: ItemId) -> Result<(), WidgetError> {
        self.position(id)?;
        for item in &mut self.items {
            item.selected = item.id == id;
        }
        self.sync_highlight();
        Ok(())
    }

    pub fn set_item_text(
        &mut self,
        id: ItemId,
        label: impl Into<String>,
    ) -> Result<(), WidgetError> {
        let index = self.position(id)?;
        self.items[index].label = ItemLabel::new(label);
        Ok(())
    }

    pub fn item_text(&self, id: ItemId) -> Option<&ItemLabel> {
        self.item(id).map(IndexItem::label)
    }

    pub fn set_priority(&mut self, id: ItemId, priority: IndexPriority) -> Result<(), WidgetError> {
        let index = self.position(id)?;
        if self.items[index].priority != priority {
            self.items[index].priority = priority;
            self.relayout();
        }
        Ok(())
    }

    fn position(&self, id: ItemId) -> Result<usize, WidgetError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or(WidgetError::UnknownItem(id))
    }

    fn select_first_in_ring(&mut self) {
        let first = self
            .items
            .iter()
            .position(|item| item.priority == IndexPriority::Exception)
            .or((!self.items.is_empty()).then_some(0));
        if let Some(first) = first {
            self.items[first].selected = true;
        }
    }

    /// Rebuilds the ring order and the omission layout from the item list.
    pub fn relayout(&mut self) {
        let (exceptions, primaries): (Vec<&IndexItem>, Vec<&IndexItem>) = self
            .items
            .iter()
            .partition(|item| item.priority == IndexPriority::Exception);
        let reserved = exceptions.len();
        self.current = exceptions
            .into_iter()
            .chain(primaries)
            .map(IndexItem::id)
            .collect();
        self.layout = OmitLayout::compute(self.current.len(), self.tuning.max_slots, reserved);
        self.sync_highlight();
    }

    fn sync_highlight(&mut self) {
        let selected = self.selected_item();
        self.highlighted = selected
            .and_then(|id| self.current.iter().position(|&c| c == id))
            .unwrap_or(0);
    }

    pub fn highlighted_slot(&self) -> Option<usize> {
        self.layout.slot_of(self.highlighted)
    }

    /// Label drawn at `slot`: the item label, or the marker glyph for a folded run.
    pub fn slot_label(&self, slot: usize) -> Option<&str> {
        let slot = self.layout.slot(slot)?;
        if slot.is_marker() {
            return Some(MARKER_LABEL);
        }
        let id = self.current.get(slot.items.start)?;
        self.item_text(*id).map(ItemLabel::as_str)
    }

    /// Highlights `slot` directly, resolving markers against the travel from the current slot.
    pub fn select_slot(&mut self, slot: usize) -> Result<ItemId, WidgetError> {
        let slots = self.layout.slot_count();
        let current = self.highlighted_slot().unwrap_or(0);
        let travel = if slot >= current {
            Travel::Forward
        } else {
            Travel::Backward
        };
        let item = self
            .layout
            .resolve(slot, self.highlighted, travel)
            .ok_or(WidgetError::OutOfRange {
                index: slot,
                len: slots,
            })?;
        self.highlight(item)
            .ok_or(WidgetError::OutOfRange { index: item, len: self.current.len() })
    }

    fn highlight(&mut self, index: usize) -> Option<ItemId> {
        let id = *self.current.get(index)?;
        if index != self.highlighted {
            self.highlighted = index;
            for item in &mut self.items {
                item.selected = item.id == id;
            }
            log::debug!("Index highlight moved to {} ({})", index, id);
            self.host.emit(Signal::Changed(id));
        }
        Some(id)
    }

    /// Returns whether the event was consumed.
    pub fn rotary(&mut self, direction: RotaryDirection) -> bool {
        if self.current.is_empty() {
            return false;
        }
        let next = Travel::from(direction).step(self.highlighted, self.current.len());
        if next != self.highlighted {
            self.highlight(next);
        }
        self.arm_hide_timer();
        true
    }

    fn arm_hide_timer(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            self.host.cancel_timer(timer);
        }
        self.hide_timer = Some(self.host.start_timer(self.tuning.hide_delay));
    }

    fn panel_scroll(&mut self, rel: f64) {
        if let Some(timer) = self.hide_timer.take() {
            self.host.cancel_timer(timer);
        }
        if rel == 1.0 {
            self.shown = true;
            self.host.emit(Signal::IndexShow);
            self.arm_hide_timer();
        } else if self.shown {
            self.shown = false;
            self.host.emit(Signal::IndexHide);
        }
    }

    fn on_timer(&mut self, timer: TimerId) {
        if self.hide_timer != Some(timer) {
            return;
        }
        self.hide_timer = None;
        self.hide();
    }

    pub fn hide(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            self.host.cancel_timer(timer);
        }
        if self.shown {
            self.shown = false;
            self.host.emit(Signal::IndexHide);
        }
    }
}

impl<H: Host> Widget for IndexLayout<H> {
    fn dispatch(&mut self, event: &Event) -> bool {
        crate::dispatch_via_table!(self, event)
    }
}
