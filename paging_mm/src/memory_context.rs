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

use log::{debug, trace};

use crate::{
    error::{MemoryError, MemoryResult},
    frame_allocator::allocate_frames,
    mm_config::MMConfig,
    modules::{
        physical_memory::PhysicalMemoryModule,
        victim_selection::{FifoVictimSelectionModule, VictimSelectionModule},
    },
    page_mapper::map_page_range,
    page_table_entry::PageTableEntry,
    util::{align_down, align_up},
    vm_area::{GrowthDirection, Region, VirtualMemoryArea, DATA_VMA_ID, HEAP_VMA_ID},
};

/// Virtual memory state of one simulated process.
///
/// Owns the page table, the virtual memory areas (stored in id order),
/// the symbol table of allocated regions and the victim selection module
/// that tracks which pages are resident.
pub struct MemoryContext<V: VictimSelectionModule = FifoVictimSelectionModule> {
    pub(crate) config: MMConfig,
    pub(crate) page_table: Vec<PageTableEntry>,
    pub(crate) areas: Vec<VirtualMemoryArea>,
    pub(crate) symbol_table: Vec<Option<Region>>,
    pub(crate) victims: V,
}

impl<V: VictimSelectionModule> MemoryContext<V> {
    /// Sets up the data area at `[0, 0)` and the heap area at `vmemsz`,
    /// each with one zero sized free region.
    pub fn new(vmemsz: usize, config: MMConfig) -> MemoryResult<Self> {
        if config.page_size == 0 || vmemsz > config.address_space_size() {
            return Err(MemoryError::InvalidArgument);
        }

        let areas = vec![
            VirtualMemoryArea::new(DATA_VMA_ID, 0, GrowthDirection::Up),
            VirtualMemoryArea::new(HEAP_VMA_ID, vmemsz, GrowthDirection::Down),
        ];

        debug!(
            "Initialized memory context with vmemsz={} ({} pages of {} bytes)",
            vmemsz, config.max_page_count, config.page_size
        );

        Ok(Self {
            config,
            page_table: vec![PageTableEntry::default(); config.max_page_count],
            areas,
            symbol_table: vec![None; config.symbol_table_size],
            victims: V::new(),
        })
    }

    pub fn config(&self) -> &MMConfig {
        &self.config
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.config.page_size
    }

    pub fn page_table(&self) -> &[PageTableEntry] {
        &self.page_table
    }

    pub fn page_table_entry(&self, page: usize) -> MemoryResult<PageTableEntry> {
        self.page_table
            .get(page)
            .copied()
            .ok_or_else(|| self.page_out_of_range(page))
    }

    pub(crate) fn page_table_entry_mut(&mut self, page: usize) -> MemoryResult<&mut PageTableEntry> {
        if page >= self.page_table.len() {
            return Err(self.page_out_of_range(page));
        }

        Ok(&mut self.page_table[page])
    }

    fn page_out_of_range(&self, page: usize) -> MemoryError {
        MemoryError::OutOfRange {
            address: page.saturating_mul(self.config.page_size),
            capacity: self.config.address_space_size(),
        }
    }

    pub fn areas(&self) -> &[VirtualMemoryArea] {
        &self.areas
    }

    pub fn area(&self, vma_id: usize) -> MemoryResult<&VirtualMemoryArea> {
        self.areas.get(vma_id).ok_or(MemoryError::InvalidArgument)
    }

    fn area_mut(&mut self, vma_id: usize) -> MemoryResult<&mut VirtualMemoryArea> {
        self.areas.get_mut(vma_id).ok_or(MemoryError::InvalidArgument)
    }

    pub fn victims(&self) -> &V {
        &self.victims
    }

    pub fn symbol_table(&self) -> &[Option<Region>] {
        &self.symbol_table
    }

    /// The region stored under `region_id`, if any
    pub fn region(&self, region_id: usize) -> Option<Region> {
        self.symbol_table.get(region_id).copied().flatten()
    }

    /// Address the mapped pages of `vma_id` must not cross when growing
    fn growth_limit(&self, vma_id: usize) -> MemoryResult<usize> {
        let page_size = self.config.page_size;

        match vma_id {
            DATA_VMA_ID => {
                let heap = self.area(HEAP_VMA_ID)?;
                Ok(align_down(heap.end(), page_size))
            }
            HEAP_VMA_ID => {
                let data = self.area(DATA_VMA_ID)?;
                Ok(align_up(data.end(), page_size))
            }
            _ => Err(MemoryError::InvalidArgument),
        }
    }

    /// Reserves `size` bytes in area `vma_id`.
    ///
    /// Free regions are reused first. Otherwise the area grows and
    /// the pages it grows into are backed by frames from `ram`, evicting
    /// resident pages to `swap` if needed.
    pub fn request_region<R: PhysicalMemoryModule, S: PhysicalMemoryModule>(
        &mut self,
        ram: &mut R,
        swap: &mut S,
        vma_id: usize,
        size: usize,
    ) -> MemoryResult<Region> {
        if size == 0 {
            return Err(MemoryError::InvalidArgument);
        }

        if let Some(region) = self.area_mut(vma_id)?.take_free_region(size) {
            trace!("Reusing free region {}", region);
            return Ok(region);
        }

        let limit = self.growth_limit(vma_id)?;
        let plan = self.area(vma_id)?.plan_growth(size, self.config.page_size, limit)?;

        if plan.page_count > 0 {
            let frames = allocate_frames(self, ram, swap, plan.page_count)?;
            map_page_range(self, plan.map_start, plan.page_count, frames, vma_id)?;
        }

        self.area_mut(vma_id)?.apply_growth(&plan);

        debug!(
            "Grew vma {} by {} pages, new region {}",
            vma_id, plan.page_count, plan.region
        );
        Ok(plan.region)
    }

    /// Hands `region` back to the free list of its area
    pub fn release_region(&mut self, region: Region) -> MemoryResult<()> {
        trace!("Releasing region {}", region);
        self.area_mut(region.vma_id)?.push_free_region(region);

        Ok(())
    }

    /// Reserves `size` bytes in area `vma_id` and stores the region under `region_id`
    pub fn alloc<R: PhysicalMemoryModule, S: PhysicalMemoryModule>(
        &mut self,
        ram: &mut R,
        swap: &mut S,
        region_id: usize,
        vma_id: usize,
        size: usize,
    ) -> MemoryResult<Region> {
        match self.symbol_table.get(region_id) {
            Some(None) => {}
            // unknown id or slot already in use
            _ => return Err(MemoryError::InvalidArgument),
        }

        let region = self.request_region(ram, swap, vma_id, size)?;
        self.symbol_table[region_id] = Some(region);

        Ok(region)
    }

    /// Removes the region stored under `region_id` and puts it on its free list
    pub fn free(&mut self, region_id: usize) -> MemoryResult<Region> {
        let region = self
            .symbol_table
            .get_mut(region_id)
            .and_then(|slot| slot.take())
            .ok_or(MemoryError::InvalidArgument)?;

        self.release_region(region)?;

        Ok(region)
    }
}
