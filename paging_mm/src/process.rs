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

use log::{info, trace};

use crate::{
    error::{MemoryError, MemoryResult},
    frame_allocator::page_in,
    memory_context::MemoryContext,
    mm_config::MMConfig,
    modules::{
        physical_memory::PhysicalMemoryModule,
        victim_selection::{FifoVictimSelectionModule, VictimSelectionModule},
    },
    page_table_entry::{MAX_FRAME_NUMBER, MAX_SWAP_OFFSET},
    vm_area::Region,
};

/// A simulated process: its virtual memory size, its memory context,
/// the RAM device and the active swap device.
///
/// All memory operations take `&mut self`, so one process is only ever
/// modified by one caller at a time.
pub struct Process<R, S, V = FifoVictimSelectionModule>
where
    R: PhysicalMemoryModule,
    S: PhysicalMemoryModule,
    V: VictimSelectionModule,
{
    pid: u32,
    vmemsz: usize,
    mm: MemoryContext<V>,
    ram: R,
    swap: S,
}

impl<R, S, V> Process<R, S, V>
where
    R: PhysicalMemoryModule,
    S: PhysicalMemoryModule,
    V: VictimSelectionModule,
{
    pub fn new(pid: u32, vmemsz: usize, ram: R, swap: S, config: MMConfig) -> MemoryResult<Self> {
        if ram.page_size() != config.page_size || swap.page_size() != config.page_size {
            return Err(MemoryError::InvalidArgument);
        }

        // every frame has to be expressible in a page table entry
        if ram.frame_count() > MAX_FRAME_NUMBER + 1 || swap.frame_count() > MAX_SWAP_OFFSET + 1 {
            return Err(MemoryError::InvalidArgument);
        }

        let mm = MemoryContext::new(vmemsz, config)?;

        info!(
            "Created process {} with {} bytes of virtual memory, {} ram frames and {} swap frames",
            pid,
            vmemsz,
            ram.frame_count(),
            swap.frame_count()
        );

        Ok(Self {
            pid,
            vmemsz,
            mm,
            ram,
            swap,
        })
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn vmemsz(&self) -> usize {
        self.vmemsz
    }

    pub fn mm(&self) -> &MemoryContext<V> {
        &self.mm
    }

    pub fn ram(&self) -> &R {
        &self.ram
    }

    pub fn swap(&self) -> &S {
        &self.swap
    }

    /// Splits the process into its parts, for calling the core functions directly
    pub fn parts_mut(&mut self) -> (&mut MemoryContext<V>, &mut R, &mut S) {
        (&mut self.mm, &mut self.ram, &mut self.swap)
    }

    /// Allocates `size` bytes in area `vma_id` and registers the region as `region_id`
    pub fn alloc(&mut self, region_id: usize, vma_id: usize, size: usize) -> MemoryResult<Region> {
        let region = self
            .mm
            .alloc(&mut self.ram, &mut self.swap, region_id, vma_id, size)?;

        trace!("Process {} allocated region {} as {}", self.pid, region, region_id);
        Ok(region)
    }

    /// Frees the region registered as `region_id`
    pub fn free(&mut self, region_id: usize) -> MemoryResult<Region> {
        let region = self.mm.free(region_id)?;

        trace!("Process {} freed region {} ({})", self.pid, region, region_id);
        Ok(region)
    }

    /// Reads the byte at `offset` inside of region `region_id`, swapping its page in if needed
    pub fn read_byte(&mut self, region_id: usize, offset: usize) -> MemoryResult<u8> {
        let address = self.physical_address(region_id, offset)?;
        self.ram.read_byte(address)
    }

    /// Writes the byte at `offset` inside of region `region_id` and marks its page dirty
    pub fn write_byte(&mut self, region_id: usize, offset: usize, value: u8) -> MemoryResult<()> {
        let address = self.physical_address(region_id, offset)?;
        self.ram.write_byte(address, value)?;

        let page = self.virtual_address(region_id, offset)? / self.mm.page_size();
        self.mm.page_table_entry_mut(page)?.mark_dirty();

        Ok(())
    }

    fn virtual_address(&self, region_id: usize, offset: usize) -> MemoryResult<usize> {
        let region = self.mm.region(region_id).ok_or(MemoryError::InvalidArgument)?;
        if offset >= region.size() {
            return Err(MemoryError::OutOfRange {
                address: offset,
                capacity: region.size(),
            });
        }

        Ok(region.start + offset)
    }

    /// Translates to a RAM address, loading the page from swap first if necessary
    fn physical_address(&mut self, region_id: usize, offset: usize) -> MemoryResult<usize> {
        let address = self.virtual_address(region_id, offset)?;
        let page_size = self.mm.page_size();

        let frame = page_in(&mut self.mm, &mut self.ram, &mut self.swap, address / page_size)?;
        Ok(frame * page_size + address % page_size)
    }
}
