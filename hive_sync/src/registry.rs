// Copyright 2025 the Hive Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region identity and render ordering.

use alloc::vec::Vec;

use crate::gate::FrameBudget;

/// Identifier for a registered region.
///
/// A small, copyable handle made of a slot index and a generation counter.
/// Registering allocates a slot with generation `1`; unregistering frees it,
/// and reusing a freed slot bumps its generation. A stale `RegionId` never
/// aliases a different live region.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegionId(u32, u32);

impl RegionId {
    const fn new(slot: u32, generation: u32) -> Self {
        Self(slot, generation)
    }

    const fn slot(self) -> usize {
        self.0 as usize
    }

    /// Generation of the slot this id was issued for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Per-region options given at registration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RegionOptions {
    /// Author-controlled visibility. Hidden regions are measured but never
    /// drawn.
    pub visible: bool,
    /// Render order key; lower draws first. Ties keep registration order.
    pub render_priority: i32,
    /// Frame counting budget.
    pub frame_budget: FrameBudget,
    /// `true` when the region's content is authored inside the surface's
    /// own scene tree. Other regions are relayed through
    /// [`RegionRegistry::outlet`].
    pub hosted_in_surface: bool,
    /// Clear the region's pixels before drawing it.
    pub clear: bool,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            visible: true,
            render_priority: 0,
            frame_budget: FrameBudget::Unbounded,
            hosted_in_surface: false,
            clear: false,
        }
    }
}

#[derive(Clone, Debug)]
struct Entry<T> {
    value: T,
    render_priority: i32,
    hosted_in_surface: bool,
    seq: u64,
}

#[derive(Clone, Debug)]
struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

/// Generational storage of regions kept in render order.
#[derive(Clone, Debug)]
pub struct RegionRegistry<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    order: Vec<RegionId>,
    next_seq: u64,
}

impl<T> Default for RegionRegistry<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            order: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> RegionRegistry<T> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a region and returns its fresh id.
    pub fn register(&mut self, value: T, options: &RegionOptions) -> RegionId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let entry = Entry {
            value,
            render_priority: options.render_priority,
            hosted_in_surface: options.hosted_in_surface,
            seq,
        };

        let id = if let Some(slot) = self.free.pop() {
            let slot_ref = &mut self.slots[slot as usize];
            slot_ref.generation = slot_ref.generation.wrapping_add(1);
            slot_ref.entry = Some(entry);
            RegionId::new(slot, slot_ref.generation)
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "more than u32::MAX live regions is not a supported workload"
            )]
            let slot = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                entry: Some(entry),
            });
            RegionId::new(slot, 1)
        };

        let at = self.order.partition_point(|other| {
            self.key(*other)
                .is_some_and(|key| key <= (options.render_priority, seq))
        });
        self.order.insert(at, id);
        id
    }

    /// Removes a region. Returns its value, or `None` if `id` is stale.
    pub fn unregister(&mut self, id: RegionId) -> Option<T> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        let entry = slot.entry.take()?;
        self.free.push(id.0);
        self.order.retain(|other| *other != id);
        Some(entry.value)
    }

    /// Returns `true` if `id` refers to a live region.
    #[must_use]
    pub fn is_alive(&self, id: RegionId) -> bool {
        self.entry(id).is_some()
    }

    /// Number of live regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no region is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The region's value.
    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&T> {
        self.entry(id).map(|entry| &entry.value)
    }

    /// The region's value, mutably.
    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut T> {
        let slot = self.slots.get_mut(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut().map(|entry| &mut entry.value)
    }

    /// The region's render priority.
    #[must_use]
    pub fn render_priority(&self, id: RegionId) -> Option<i32> {
        self.entry(id).map(|entry| entry.render_priority)
    }

    /// Live ids in render order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.order.iter().copied()
    }

    /// Live regions in render order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &T)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(*id).map(|value| (*id, value)))
    }

    /// Visits live regions mutably in render order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(RegionId, &mut T)) {
        for id in &self.order {
            if let Some(entry) = self.slots[id.slot()].entry.as_mut() {
                f(*id, &mut entry.value);
            }
        }
    }

    /// Regions whose content the surface must mount itself, in render order.
    ///
    /// These are the regions registered with `hosted_in_surface == false`:
    /// their content is authored outside the surface's scene tree and is
    /// relayed to it here.
    pub fn outlet(&self) -> impl Iterator<Item = (RegionId, &T)> + '_ {
        self.order.iter().filter_map(|id| {
            let entry = self.entry(*id)?;
            (!entry.hosted_in_surface).then_some((*id, &entry.value))
        })
    }

    fn entry(&self, id: RegionId) -> Option<&Entry<T>> {
        let slot = self.slots.get(id.slot())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn key(&self, id: RegionId) -> Option<(i32, u64)> {
        self.entry(id)
            .map(|entry| (entry.render_priority, entry.seq))
    }
}
