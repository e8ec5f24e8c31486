//! Fixed-size slot array owning every item on the board.

use super::item::{Item, ItemId};

/// Position of a slot in the grid, row-major.
pub type SlotIndex = usize;

/// Ordered, fixed-length array of slots, each holding at most one item.
///
/// The slot count is fixed at construction and never changes; indices are
/// the addressing scheme for every grid operation. Methods here are raw slot
/// manipulation without game rules; rule checks live in the grid actions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    slots: Vec<Option<Item>>,
}

impl Grid {
    /// Creates an empty grid with `size * size` slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size * size],
        }
    }

    /// Creates a grid from existing slot contents (snapshot restore, tests).
    pub fn from_slots(slots: Vec<Option<Item>>) -> Self {
        Self { slots }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn contains_index(&self, index: SlotIndex) -> bool {
        index < self.slots.len()
    }

    pub fn get(&self, index: SlotIndex) -> Option<&Item> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: SlotIndex) -> Option<&mut Item> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn is_slot_empty(&self, index: SlotIndex) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    /// First empty slot in left-to-right, top-to-bottom order.
    pub fn first_empty(&self) -> Option<SlotIndex> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Finds the slot currently holding the item with `id`.
    pub fn position_of(&self, id: ItemId) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|item| item.id == id))
    }

    pub fn find_by_id_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.slots
            .iter_mut()
            .filter_map(Option::as_mut)
            .find(|item| item.id == id)
    }

    /// Iterates `(index, item)` over occupied slots.
    pub fn items(&self) -> impl Iterator<Item = (SlotIndex, &Item)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }

    pub fn slots(&self) -> &[Option<Item>] {
        &self.slots
    }

    /// Puts `item` into `index`, returning whatever was there before.
    pub(crate) fn replace(&mut self, index: SlotIndex, item: Option<Item>) -> Option<Item> {
        core::mem::replace(&mut self.slots[index], item)
    }

    pub(crate) fn take(&mut self, index: SlotIndex) -> Option<Item> {
        self.slots[index].take()
    }

    pub(crate) fn swap(&mut self, a: SlotIndex, b: SlotIndex) {
        self.slots.swap(a, b);
    }

    /// Largest item id present, used to resume id allocation after a load.
    pub fn max_item_id(&self) -> Option<ItemId> {
        self.items().map(|(_, item)| item.id).max()
    }

    /// True when every item has a valid level and no id appears twice.
    pub fn is_consistent(&self) -> bool {
        let mut ids: Vec<ItemId> = Vec::with_capacity(self.slots.len());
        for (_, item) in self.items() {
            if !Item::is_valid_level(item.level()) || ids.contains(&item.id) {
                return false;
            }
            ids.push(item.id);
        }
        true
    }
}
