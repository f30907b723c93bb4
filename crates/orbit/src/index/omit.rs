use crate::drag::Travel;
use std::ops::Range;

pub const MARKER_LABEL: &str = "*";

/// One position on the ring: either a single item or an overflow marker covering a run of items.
#[derive(Debug, Clone, PartialEq)]
pub struct OmitSlot {
    pub items: Range<usize>,
    pub angle: f64,
}

impl OmitSlot {
    pub fn is_marker(&self) -> bool {
        self.items.len() > 1
    }

    pub fn contains(&self, item: usize) -> bool {
        self.items.contains(&item)
    }
}

/// Assignment of logical items to angular slots.
///
/// `reserved` leading items are never grouped. When there are more items than slots, the
/// surplus is folded into overflow markers placed on alternating slots after the reserved run,
/// or spread evenly across the free range when the surplus is small.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OmitLayout {
    slots: Vec<OmitSlot>,
    item_slot: Vec<usize>,
}

impl OmitLayout {
    /// Surplus that does not divide evenly across the markers all lands on the last marker
    /// rather than being dealt out one per marker.
    pub fn compute(items: usize, max_slots: usize, reserved: usize) -> Self {
        if items == 0 || max_slots == 0 {
            return Self::default();
        }
        if items <= max_slots {
            return Self::from_counts(&vec![1; items]);
        }

        let reserved = if reserved >= max_slots {
            log::warn!(
                "{} reserved items do not fit {} slots, reserving {}",
                reserved,
                max_slots,
                max_slots - 1
            );
            max_slots - 1
        } else {
            reserved
        };

        let max_group_num = max_slots.saturating_sub(reserved + 1) / 2;
        let extra = items - max_slots;
        let mut counts = vec![1usize; max_slots];

        if max_group_num == 0 {
            counts[reserved] += extra;
        } else if extra > max_group_num {
            let group_size = extra / max_group_num;
            let remainder = extra % max_group_num;
            for g in 0..max_group_num {
                counts[reserved + 1 + 2 * g] += group_size;
            }
            counts[reserved + 2 * max_group_num - 1] += remainder;
        } else {
            let spacing = (max_slots - reserved) / (extra + 1);
            for k in 0..extra {
                counts[reserved + spacing * (k + 1)] += 1;
            }
        }

        log::debug!(
            "Omitted {} items into {} slots ({} reserved)",
            items,
            max_slots,
            reserved
        );
        Self::from_counts(&counts)
    }

    fn from_counts(counts: &[usize]) -> Self {
        let total = counts.len() as f64;
        let mut slots = Vec::with_capacity(counts.len());
        let mut item_slot = Vec::with_capacity(counts.iter().sum());
        let mut next = 0;

        for (i, &count) in counts.iter().enumerate() {
            slots.push(OmitSlot {
                items: next..next + count,
                angle: 360.0 / total * i as f64,
            });
            item_slot.extend(std::iter::repeat_n(i, count));
            next += count;
        }

        Self { slots, item_slot }
    }

    pub fn slots(&self) -> &[OmitSlot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&OmitSlot> {
        self.slots.get(index)
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_slot.len()
    }

    pub fn slot_of(&self, item: usize) -> Option<usize> {
        self.item_slot.get(item).copied()
    }

    pub fn is_omitted(&self) -> bool {
        self.slots.iter().any(OmitSlot::is_marker)
    }

    pub fn marker_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_marker()).count()
    }

    /// Items covered by each slot.
    pub fn omit_info(&self) -> Vec<usize> {
        self.slots.iter().map(|s| s.items.len()).collect()
    }

    /// The item that becomes active when `slot` is highlighted while `active` was.
    pub fn resolve(&self, slot: usize, active: usize, travel: Travel) -> Option<usize> {
        let slot = self.slots.get(slot)?;
        if slot.contains(active) {
            return Some(active);
        }
        match travel {
            Travel::Forward => Some(slot.items.start),
            Travel::Backward => slot.items.end.checked_sub(1),
        }
    }
}
