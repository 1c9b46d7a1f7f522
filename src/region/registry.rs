//! Ordered region store with point, group and index queries.
//!
//! Regions keep insertion order. The positional index of a region shifts down
//! by one whenever an earlier region is removed; `RegionId` does not, and the
//! registry keeps an id to slot map current for O(1) id lookups.

use std::collections::HashMap;

use crate::region::{BoxRect, GroupId, MinSize, Region, RegionId, UNGROUPED};
use crate::trace::{trace_event, trace_warn};
use crate::util::{GlyphGroupError, GlyphGroupResult};

/// Filter for [`BoxRegistry::boxes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoxFilter {
    /// Every region.
    All,
    /// Regions whose `active` flag equals the value.
    Active(bool),
    /// Regions in the given group.
    Group(GroupId),
}

impl BoxFilter {
    fn accepts(self, region: &Region) -> bool {
        match self {
            BoxFilter::All => true,
            BoxFilter::Active(active) => region.active == active,
            BoxFilter::Group(group) => region.group == group,
        }
    }
}

/// Registry of candidate regions.
#[derive(Clone, Debug, Default)]
pub struct BoxRegistry {
    pub(super) regions: Vec<Region>,
    pub(super) slots: HashMap<RegionId, usize>,
    pub(super) min_size: MinSize,
    pub(super) max_group: GroupId,
    pub(super) next_id: u64,
}

impl BoxRegistry {
    /// Creates an empty registry that drops boxes smaller than `min_size`.
    pub fn new(min_size: MinSize) -> Self {
        Self {
            min_size,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn min_size(&self) -> MinSize {
        self.min_size
    }

    /// Largest group id ever assigned through this registry.
    pub fn max_group(&self) -> GroupId {
        self.max_group
    }

    /// Group id the next new class should use.
    pub fn next_group(&self) -> GlyphGroupResult<GroupId> {
        self.max_group
            .checked_add(1)
            .ok_or(GlyphGroupError::GroupIdsExhausted {
                max_group: self.max_group,
            })
    }

    /// All regions in index order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region at a positional index.
    pub fn get(&self, index: usize) -> Option<&Region> {
        self.regions.get(index)
    }

    /// Region with a stable id.
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.index_of(id).and_then(|index| self.regions.get(index))
    }

    /// Current positional index of a stable id.
    pub fn index_of(&self, id: RegionId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// Appends a region unless `rect` is smaller than the minimum size.
    ///
    /// Returns the new id, or `None` when the box was filtered out. Boxes
    /// with a non-positive width or height are filtered as well.
    pub fn add(&mut self, rect: BoxRect, group: GroupId) -> Option<RegionId> {
        if !self.min_size.admits(&rect) || rect.width <= 0 || rect.height <= 0 || !rect.fits() {
            trace_event!(
                "region_rejected",
                width = rect.width,
                height = rect.height,
                min_width = self.min_size.width,
                min_height = self.min_size.height
            );
            return None;
        }
        let id = self.push_region(rect, false, group);
        if group > self.max_group {
            self.max_group = group;
        }
        Some(id)
    }

    /// Adds every box from a detection pass; returns how many were kept.
    pub fn extend_from_rects<I>(&mut self, rects: I) -> usize
    where
        I: IntoIterator<Item = BoxRect>,
    {
        rects
            .into_iter()
            .filter_map(|rect| self.add(rect, UNGROUPED))
            .count()
    }

    pub(super) fn push_region(&mut self, rect: BoxRect, active: bool, group: GroupId) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id += 1;
        self.slots.insert(id, self.regions.len());
        self.regions.push(Region {
            id,
            rect,
            active,
            group,
        });
        id
    }

    /// Removes the region at `index`; later regions shift down by one.
    pub fn remove(&mut self, index: usize) -> GlyphGroupResult<Region> {
        self.check_index(index)?;
        let removed = self.regions.remove(index);
        self.slots.remove(&removed.id);
        for (slot, region) in self.regions.iter().enumerate().skip(index) {
            self.slots.insert(region.id, slot);
        }
        trace_event!("region_removed", index = index, remaining = self.regions.len());
        Ok(removed)
    }

    /// Index of the earliest inserted region containing the point.
    pub fn index_at_point(&self, x: i32, y: i32) -> Option<usize> {
        self.regions.iter().position(|region| region.rect.contains(x, y))
    }

    /// Like [`index_at_point`](Self::index_at_point) but reports a miss as
    /// `RegionNotFound`.
    pub fn find_index(&self, x: i32, y: i32) -> GlyphGroupResult<usize> {
        self.index_at_point(x, y).ok_or_else(|| {
            trace_warn!("region_not_found", x = x, y = y);
            GlyphGroupError::RegionNotFound { x, y }
        })
    }

    pub fn box_at(&self, index: usize) -> GlyphGroupResult<BoxRect> {
        self.checked(index).map(|region| region.rect)
    }

    pub fn box_at_point(&self, x: i32, y: i32) -> GlyphGroupResult<BoxRect> {
        let index = self.find_index(x, y)?;
        self.box_at(index)
    }

    /// Sets the group of one region, or of none when `index` is `None`.
    ///
    /// `max_group` is raised to `group` in every case, including when no
    /// region is touched or the index turns out to be invalid.
    pub fn set_group(&mut self, group: GroupId, index: Option<usize>) -> GlyphGroupResult<()> {
        self.max_group = self.max_group.max(group);
        if let Some(index) = index {
            self.checked_mut(index)?.group = group;
        }
        Ok(())
    }

    /// Sets the group of every region and raises `max_group`.
    pub fn set_group_all(&mut self, group: GroupId) {
        self.max_group = self.max_group.max(group);
        for region in &mut self.regions {
            region.group = group;
        }
    }

    pub fn group_of(&self, index: usize) -> GlyphGroupResult<GroupId> {
        self.checked(index).map(|region| region.group)
    }

    /// Group of the first active region in index order, or `UNGROUPED` when
    /// nothing is active.
    ///
    /// Only the first active region counts even if several active regions
    /// belong to different groups; editing modes rely on that.
    pub fn selected_group(&self) -> GroupId {
        self.regions
            .iter()
            .find(|region| region.active)
            .map_or(UNGROUPED, |region| region.group)
    }

    /// Activates the region under the point and returns its index.
    pub fn select_at(&mut self, x: i32, y: i32) -> GlyphGroupResult<usize> {
        let index = self.find_index(x, y)?;
        self.regions[index].active = true;
        Ok(index)
    }

    /// Activates every region in `group`; others are left untouched.
    pub fn select_group(&mut self, group: GroupId) -> usize {
        let mut count = 0;
        for region in self.regions.iter_mut().filter(|r| r.group == group) {
            region.active = true;
            count += 1;
        }
        count
    }

    pub fn select_index(&mut self, index: usize) -> GlyphGroupResult<()> {
        self.checked_mut(index)?.active = true;
        Ok(())
    }

    /// Clears the region under the point and returns its index.
    pub fn unselect_at(&mut self, x: i32, y: i32) -> GlyphGroupResult<usize> {
        let index = self.find_index(x, y)?;
        self.regions[index].active = false;
        Ok(index)
    }

    pub fn unselect_all(&mut self) {
        for region in &mut self.regions {
            region.active = false;
        }
    }

    pub fn unselect_index(&mut self, index: usize) -> GlyphGroupResult<()> {
        self.checked_mut(index)?.active = false;
        Ok(())
    }

    /// Boxes passing `filter`, evaluated lazily against current state.
    pub fn boxes(&self, filter: BoxFilter) -> impl Iterator<Item = BoxRect> + '_ {
        self.regions
            .iter()
            .filter(move |region| filter.accepts(region))
            .map(|region| region.rect)
    }

    fn check_index(&self, index: usize) -> GlyphGroupResult<()> {
        if index < self.regions.len() {
            Ok(())
        } else {
            Err(GlyphGroupError::IndexOutOfRange {
                index,
                len: self.regions.len(),
            })
        }
    }

    fn checked(&self, index: usize) -> GlyphGroupResult<&Region> {
        self.check_index(index)?;
        Ok(&self.regions[index])
    }

    fn checked_mut(&mut self, index: usize) -> GlyphGroupResult<&mut Region> {
        self.check_index(index)?;
        Ok(&mut self.regions[index])
    }
}
