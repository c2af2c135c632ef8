/*
 *  Copyright (C) 2025  Markus Elias Gerber
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

use core::fmt;

use crate::{
    error::{MemoryError, MemoryResult},
    util::{align_down, align_up},
};

/// Id of the data area, grows upwards from address 0
pub const DATA_VMA_ID: usize = 0;

/// Id of the heap area, grows downwards from the end of the virtual memory
pub const HEAP_VMA_ID: usize = 1;

/// A contiguous span `[start, end)` of virtual addresses inside of one area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(serde::Serialize))]
pub struct Region {
    pub start: usize,
    pub end: usize,
    pub vma_id: usize,
}

impl Region {
    pub fn new(start: usize, end: usize, vma_id: usize) -> Self {
        debug_assert!(start <= end, "invalid region [{}, {})", start, end);

        Self { start, end, vma_id }
    }

    pub fn size(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if `other` lies completely inside of this region
    pub fn contains(&self, other: &Region) -> bool {
        self.vma_id == other.vma_id && self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rg[{}->{}<at>vma={}]", self.start, self.end, self.vma_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(serde::Serialize))]
pub enum GrowthDirection {
    Up,
    Down,
}

/// Result of planning the growth of an area by some bytes.
///
/// Nothing is changed until the plan is applied, so a failed frame allocation
/// does not leave the area half grown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GrowthPlan {
    /// the newly reserved region
    pub(crate) region: Region,
    pub(crate) new_break_point: usize,
    pub(crate) new_end: usize,

    /// first (lowest) address of the pages that have to be mapped
    pub(crate) map_start: usize,
    pub(crate) page_count: usize,
}

/// One logically distinct part of the virtual address space.
///
/// `end` is the mapped water mark and `break_point` the boundary of reserved memory.
/// For areas growing upwards `start <= break_point <= end` holds,
/// for areas growing downwards `end <= break_point <= start`.
#[derive(Debug)]
pub struct VirtualMemoryArea {
    id: usize,
    start: usize,
    end: usize,
    break_point: usize,
    direction: GrowthDirection,

    /// free list, head at the back
    free_regions: Vec<Region>,
}

impl VirtualMemoryArea {
    /// Creates an empty area at `start` with a single zero sized free region
    pub(crate) fn new(id: usize, start: usize, direction: GrowthDirection) -> Self {
        Self {
            id,
            start,
            end: start,
            break_point: start,
            direction,
            free_regions: vec![Region::new(start, start, id)],
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn break_point(&self) -> usize {
        self.break_point
    }

    pub fn direction(&self) -> GrowthDirection {
        self.direction
    }

    /// Free regions, newest first
    pub fn free_regions(&self) -> impl Iterator<Item = &Region> + '_ {
        self.free_regions.iter().rev()
    }

    /// Takes `size` bytes from the first free region that is large enough.
    ///
    /// The list is searched newest first. An exact fit removes the region,
    /// otherwise the front is carved off and the rest stays in the list.
    pub(crate) fn take_free_region(&mut self, size: usize) -> Option<Region> {
        let index = self
            .free_regions
            .iter()
            .rposition(|region| region.size() >= size)?;

        let region = &mut self.free_regions[index];
        if region.size() == size {
            return Some(self.free_regions.remove(index));
        }

        let taken = Region::new(region.start, region.start + size, self.id);
        region.start += size;

        Some(taken)
    }

    /// Pushes `region` to the head of the free list. Neighbours are not merged.
    pub(crate) fn push_free_region(&mut self, region: Region) {
        debug_assert_eq!(region.vma_id, self.id);
        debug_assert!(
            self.free_regions
                .iter()
                .all(|free| free.size() == 0 || region.size() == 0
                    || region.end <= free.start || free.end <= region.start),
            "free region {} overlaps existing free region",
            region
        );

        self.free_regions.push(region);
    }

    /// Plans moving the break point by `size` bytes in growth direction.
    ///
    /// `limit` is the address the mapped pages must not cross,
    /// usually the water mark of the neighbouring area.
    pub(crate) fn plan_growth(
        &self,
        size: usize,
        page_size: usize,
        limit: usize,
    ) -> MemoryResult<GrowthPlan> {
        let overlap = MemoryError::AreaOverlap { vma_id: self.id };
        // nothing mapped yet, even if `start` is not page aligned
        let untouched = self.end == self.start;

        match self.direction {
            GrowthDirection::Up => {
                let new_break_point = self.break_point.checked_add(size).ok_or(overlap)?;
                let region = Region::new(self.break_point, new_break_point, self.id);

                if new_break_point <= self.end {
                    // still inside of already mapped pages
                    return Ok(GrowthPlan {
                        region,
                        new_break_point,
                        new_end: self.end,
                        map_start: self.end,
                        page_count: 0,
                    });
                }

                if new_break_point > limit {
                    return Err(overlap);
                }

                let map_start = if untouched { align_down(self.start, page_size) } else { self.end };
                let new_end = align_up(new_break_point, page_size);
                if new_end > limit {
                    return Err(overlap);
                }

                Ok(GrowthPlan {
                    region,
                    new_break_point,
                    new_end,
                    map_start,
                    page_count: (new_end - map_start) / page_size,
                })
            }
            GrowthDirection::Down => {
                let new_break_point = self.break_point.checked_sub(size).ok_or(overlap)?;
                let region = Region::new(new_break_point, self.break_point, self.id);

                if new_break_point >= self.end {
                    return Ok(GrowthPlan {
                        region,
                        new_break_point,
                        new_end: self.end,
                        map_start: self.end,
                        page_count: 0,
                    });
                }

                let map_end = if untouched { align_up(self.start, page_size) } else { self.end };
                let new_end = align_down(new_break_point, page_size);
                if new_end < limit {
                    return Err(overlap);
                }

                Ok(GrowthPlan {
                    region,
                    new_break_point,
                    new_end,
                    map_start: new_end,
                    page_count: (map_end - new_end) / page_size,
                })
            }
        }
    }

    pub(crate) fn apply_growth(&mut self, plan: &GrowthPlan) {
        self.break_point = plan.new_break_point;
        self.end = plan.new_end;

        debug_assert!(match self.direction {
            GrowthDirection::Up => self.start <= self.break_point && self.break_point <= self.end,
            GrowthDirection::Down => self.end <= self.break_point && self.break_point <= self.start,
        });
    }
}

impl fmt::Display for VirtualMemoryArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "va[{}->{}]", self.start, self.end)
    }
}
