use crate::drag::{elastic, ratio};
use crate::item::{ContentId, ItemId, TextPart};
use crate::more_option::{
    DIM_ALPHA, MAX_SCALE, MIN_DIM, MIN_SCALE, RADIUS_X_MAX, RADIUS_X_MIN, RADIUS_X_NORMAL,
    RADIUS_Z, TEXT_BAND,
};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use std::collections::BTreeMap;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

const EVEN_STYLE_CENTER: isize = 8;
const ODD_STYLE_CENTER: isize = 9;
const STYLE_SLOTS: isize = 19;

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
pub enum PanelDirection {
    Top,
    Bottom,
    Left,
    #[default]
    Right,
}

impl PanelDirection {
    pub fn is_horizontal(&self) -> bool {
        matches!(self, PanelDirection::Left | PanelDirection::Right)
    }
}

/// Background dim for a panel that is `rel` of the way open.
pub fn dim_alpha(rel: f64) -> u8 {
    (DIM_ALPHA * rel.clamp(0.0, 1.0)) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemTransform {
    pub x: f64,
    pub z: f64,
    pub depth: f64,
    pub scale: f64,
    pub angle: f64,
    pub text_alpha: f64,
    pub dim: f64,
    pub visible: bool,
}

impl ItemTransform {
    /// Places the item whose horizontal scroll position is `position_x` on the carousel ring.
    pub fn on_ring(
        index: usize,
        selected: usize,
        position_x: f64,
        item_width: f64,
        angle_step: f64,
    ) -> Self {
        let reach = if angle_step > 0.0 {
            (180.0 / angle_step) as usize
        } else {
            0
        };
        // too far from the center to matter: park it behind the ring
        let position_x = if index.abs_diff(selected) > reach {
            -(item_width * 2.0)
        } else {
            position_x
        };

        let angle = ratio(position_x, item_width) * angle_step;
        let a = angle.abs();
        let radius_x = if a <= 90.0 {
            (RADIUS_X_NORMAL - RADIUS_X_MAX) * (a / 90.0) + RADIUS_X_MAX
        } else {
            (RADIUS_X_MIN - RADIUS_X_NORMAL) * ((a - 90.0) / 90.0) + RADIUS_X_NORMAL
        };

        let rad = angle.to_radians();
        let x = rad.sin() * radius_x;
        let z = rad.cos() * RADIUS_Z - RADIUS_Z;

        Self {
            x,
            z,
            depth: z.ceil() + RADIUS_Z * 2.0,
            scale: (MAX_SCALE - MIN_SCALE) * (1.0 - z.abs() / (RADIUS_Z * 2.0)) + MIN_SCALE,
            angle,
            ..Self::default()
        }
    }

    fn shade(&mut self, screen_width: f64) {
        let band = screen_width * TEXT_BAND;
        self.text_alpha = if self.z > -RADIUS_Z && self.x.abs() < band {
            255.0 * (1.0 - ratio(self.x.abs(), band))
        } else {
            0.0
        };
        self.dim = if self.z > -RADIUS_Z {
            (1.0 - MIN_DIM) * (1.0 - self.z.abs() / RADIUS_Z) + MIN_DIM
        } else {
            MIN_DIM
        };
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoreOptionItem {
    id: ItemId,
    texts: BTreeMap<String, TextPart>,
    contents: BTreeMap<String, ContentId>,
    transform: ItemTransform,
}

impl MoreOptionItem {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            texts: BTreeMap::new(),
            contents: BTreeMap::new(),
            transform: ItemTransform::default(),
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn text(&self, part: &str) -> Option<&TextPart> {
        self.texts.get(part)
    }

    pub fn set_text(&mut self, part: &str, text: TextPart) {
        self.texts.insert(part.to_string(), text);
    }

    pub fn content(&self, part: &str) -> Option<&ContentId> {
        self.contents.get(part)
    }

    pub fn set_content(&mut self, part: &str, content: ContentId) -> Option<ContentId> {
        self.contents.insert(part.to_string(), content)
    }

    pub fn transform(&self) -> &ItemTransform {
        &self.transform
    }
}

/// Horizontal ring of items; scroll position `0` centers the first item and each further item
/// sits one item width to the left.
#[derive(Debug, Clone)]
pub struct Carousel {
    items: Vec<MoreOptionItem>,
    item_width: f64,
    angle_step: f64,
    selected: usize,
    previous: usize,
    scroll_x: f64,
    previous_scroll_x: f64,
    item_scrolled: bool,
    center_changes: Vec<usize>,
}

impl Carousel {
    pub fn new(item_width: f64, angle_step: f64) -> Self {
        Self {
            items: Vec::new(),
            item_width,
            angle_step,
            selected: 0,
            previous: 0,
            scroll_x: 0.0,
            previous_scroll_x: 0.0,
            item_scrolled: false,
            center_changes: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[MoreOptionItem] {
        &self.items
    }

    pub fn index_of(&self, id: ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    pub fn item(&self, id: ItemId) -> Option<&MoreOptionItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut MoreOptionItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn previous(&self) -> usize {
        self.previous
    }

    pub fn scroll_x(&self) -> f64 {
        self.scroll_x
    }

    /// Inserting or removing always brings the selection back to the first item.
    pub fn insert(&mut self, index: usize, item: MoreOptionItem) {
        let index = index.min(self.items.len());
        self.items.insert(index, item);
        self.selected = 0;
    }

    pub fn remove(&mut self, id: ItemId) -> Option<MoreOptionItem> {
        let index = self.index_of(id)?;
        self.selected = 0;
        Some(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }

    pub fn reset_selection(&mut self) {
        self.selected = 0;
    }

    /// Scroll position that centers `index`.
    pub fn slot_position(&self, index: usize) -> f64 {
        -(index as f64) * self.item_width
    }

    pub fn end_position(&self) -> f64 {
        self.slot_position(self.items.len().saturating_sub(1))
    }

    pub fn clamp_index(&self, index: isize) -> usize {
        let last = self.items.len().saturating_sub(1) as isize;
        index.clamp(0, last.max(0)) as usize
    }

    pub fn set_selected(&mut self, index: usize) {
        self.selected = index;
    }

    pub fn begin_scroll(&mut self) {
        self.item_scrolled = true;
        self.previous = self.selected;
        self.previous_scroll_x = self.scroll_x;
    }

    /// Returns whether a scroll was in progress.
    pub fn end_scroll(&mut self) -> bool {
        std::mem::replace(&mut self.item_scrolled, false)
    }

    pub fn scroll_by(&mut self, dx: f64, damping: f64) {
        if !self.item_scrolled {
            return;
        }
        let position = elastic(
            self.previous_scroll_x + dx,
            self.end_position(),
            0.0,
            damping,
        );
        self.set_scroll(position);
    }

    pub fn set_scroll(&mut self, x: f64) {
        self.scroll_x = x;
        self.update_transforms();
        self.invalidate();
    }

    pub fn take_center_changes(&mut self) -> Vec<usize> {
        std::mem::take(&mut self.center_changes)
    }

    fn update_transforms(&mut self) {
        let (selected, width, step, scroll) =
            (self.selected, self.item_width, self.angle_step, self.scroll_x);
        for (i, item) in self.items.iter_mut().enumerate() {
            item.transform =
                ItemTransform::on_ring(i, selected, scroll + width * i as f64, width, step);
        }
    }

    fn invalidate(&mut self) {
        let focusing = (ratio(-self.scroll_x, self.item_width) as isize).max(0);
        let half_step = self.angle_step / 2.0;

        for (i, item) in self.items.iter_mut().enumerate() {
            item.transform.shade(self.item_width);
            let i_signed = i as isize;
            item.transform.visible = i_signed >= focusing - 1 && i_signed <= focusing + 2;

            if item.transform.angle.abs() < half_step && self.selected != i {
                self.selected = i;
                self.center_changes.push(i);
            }
        }
    }

    /// Item ids back to front.
    pub fn draw_order(&self) -> Vec<ItemId> {
        let mut order: Vec<&MoreOptionItem> = self.items.iter().collect();
        order.sort_by(|a, b| a.transform.z.total_cmp(&b.transform.z));
        order.into_iter().map(|item| item.id).collect()
    }
}

/// Page indicator style per item, centered on the middle of the indicator strip. Counts that do
/// not fit the strip leave the overflowing entries unstyled.
pub fn index_styles(count: usize) -> Vec<Option<String>> {
    let even = count % 2 == 0;
    let half = (count / 2) as isize;
    let start = if even {
        EVEN_STYLE_CENTER - half + 1
    } else {
        ODD_STYLE_CENTER - half
    };

    (0..count as isize)
        .map(|i| {
            let slot = start + i;
            (0..STYLE_SLOTS).contains(&slot).then(|| {
                if even {
                    format!("item/even_{}", slot + 2)
                } else {
                    format!("item/odd_{}", slot + 1)
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel(count: u64) -> Carousel {
        let mut c = Carousel::new(360.0, 90.0);
        for id in 1..=count {
            c.insert(c.len(), MoreOptionItem::new(ItemId::from(id)));
        }
        c.set_scroll(0.0);
        c
    }

    #[test]
    fn test_center_item_faces_front() {
        let t = ItemTransform::on_ring(0, 0, 0.0, 360.0, 90.0);
        assert_eq!(t.x, 0.0);
        assert_eq!(t.z, 0.0);
        assert_eq!(t.depth, 1000.0);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn test_side_item_recedes() {
        let t = ItemTransform::on_ring(1, 0, 360.0, 360.0, 90.0);
        assert_eq!(t.angle, 90.0);
        assert!((t.x - RADIUS_X_NORMAL).abs() < 1e-9);
        assert!((t.z + RADIUS_Z).abs() < 1e-9);
        assert!((t.scale - (0.62 * 0.5 + 0.38)).abs() < 1e-9);
    }

    #[test]
    fn test_far_items_are_parked() {
        let t = ItemTransform::on_ring(5, 0, 1800.0, 360.0, 90.0);
        assert_eq!(t.angle, -180.0);
    }

    #[test]
    fn test_scroll_moves_center() {
        let mut c = carousel(4);
        assert_eq!(c.selected(), 0);
        c.set_scroll(-700.0);
        assert_eq!(c.selected(), 2);
        assert_eq!(c.take_center_changes(), vec![2]);
        assert!(c.take_center_changes().is_empty());
    }

    #[test]
    fn test_scroll_by_is_elastic() {
        let mut c = carousel(3);
        c.begin_scroll();
        c.scroll_by(90.0, 3.0);
        assert_eq!(c.scroll_x(), 30.0);
        c.scroll_by(-810.0, 3.0);
        assert_eq!(c.scroll_x(), -750.0);
        assert!(c.end_scroll());
        assert!(!c.end_scroll());
    }

    #[test]
    fn test_visibility_window() {
        let mut c = carousel(6);
        c.set_scroll(-720.0);
        let visible: Vec<bool> = c.items().iter().map(|i| i.transform().visible).collect();
        assert_eq!(visible, vec![false, true, true, true, true, false]);
    }

    #[test]
    fn test_draw_order_puts_center_last() {
        let c = carousel(3);
        assert_eq!(c.draw_order().last(), Some(&ItemId::from(1)));
    }

    #[test]
    fn test_index_styles() {
        assert_eq!(
            index_styles(2),
            vec![
                Some("item/even_10".to_string()),
                Some("item/even_11".to_string())
            ]
        );
        assert_eq!(
            index_styles(3),
            vec![
                Some("item/odd_9".to_string()),
                Some("item/odd_10".to_string()),
                Some("item/odd_11".to_string())
            ]
        );
        let crowded = index_styles(22);
        assert_eq!(crowded.len(), 22);
        assert!(crowded[0].is_none());
        assert_eq!(crowded[2].as_deref(), Some("item/even_2"));
    }

    #[test]
    fn test_dim_alpha() {
        assert_eq!(dim_alpha(0.0), 0);
        assert_eq!(dim_alpha(1.0), 127);
        assert_eq!(dim_alpha(7.0), 127);
    }
}
