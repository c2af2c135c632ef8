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

use log::{debug, trace, warn};

use crate::{
    error::{MemoryError, MemoryResult},
    memory_context::MemoryContext,
    modules::{physical_memory::PhysicalMemoryModule, victim_selection::VictimSelectionModule},
};

/// Swap type written into the entries of evicted pages.
/// Only one swap device is active per process.
pub const ACTIVE_SWAP_TYPE: usize = 0;

/// Copies the content of frame `src_frame` of `src` into frame `dst_frame` of `dst`, byte by byte
pub fn swap_copy_page<S: PhysicalMemoryModule + ?Sized, D: PhysicalMemoryModule + ?Sized>(
    src: &mut S,
    src_frame: usize,
    dst: &mut D,
    dst_frame: usize,
) -> MemoryResult<()> {
    let page_size = src.page_size();
    debug_assert_eq!(page_size, dst.page_size(), "devices have different page sizes");

    for cell in 0..page_size {
        let data = src.read_byte(src_frame * page_size + cell)?;
        dst.write_byte(dst_frame * page_size + cell, data)?;
    }

    Ok(())
}

/// Gets `requested_page_count` frames from `ram`.
///
/// If `ram` is full, the page chosen by the victim selection module is copied to a
/// free frame of `swap`, its entry is rewritten to point to swap and its frame is reused.
/// Every frame is pushed to the head of the list, which is the **end** of the returned `Vec`.
///
/// Fails with [`MemoryError::OutOfMemory`] if there is neither a free frame nor a page to evict.
/// Frames reserved and pages evicted before the failure are not given back.
pub fn allocate_frames<V, R, S>(
    mm: &mut MemoryContext<V>,
    ram: &mut R,
    swap: &mut S,
    requested_page_count: usize,
) -> MemoryResult<Vec<usize>>
where
    V: VictimSelectionModule,
    R: PhysicalMemoryModule,
    S: PhysicalMemoryModule,
{
    let mut frames = Vec::with_capacity(requested_page_count);

    for _ in 0..requested_page_count {
        let frame = match ram.allocate_free_frame() {
            Ok(frame) => frame,
            Err(MemoryError::OutOfMemory) => evict_victim(mm, ram, swap).map_err(|err| {
                warn!(
                    "Frame allocation failed after {} of {} frames: {}",
                    frames.len(),
                    requested_page_count,
                    err
                );
                err
            })?,
            Err(err) => return Err(err),
        };

        frames.push(frame);
    }

    trace!("Allocated frames {:?}", frames);
    Ok(frames)
}

/// Swaps out the next victim page and returns the RAM frame it occupied
fn evict_victim<V, R, S>(mm: &mut MemoryContext<V>, ram: &mut R, swap: &mut S) -> MemoryResult<usize>
where
    V: VictimSelectionModule,
    R: PhysicalMemoryModule,
    S: PhysicalMemoryModule,
{
    // nothing resident means nothing that could make room
    let victim = mm.victims.next_victim().ok_or(MemoryError::OutOfMemory)?;
    let frame = mm
        .page_table_entry(victim)?
        .frame_number_of()
        .ok_or(MemoryError::InvalidArgument)?;

    // the victim only leaves the queue once its content is safe in swap
    let swap_frame = swap.allocate_free_frame()?;
    if let Err(err) = swap_copy_page(ram, frame, swap, swap_frame) {
        swap.release_frame(swap_frame)?;
        return Err(err);
    }

    mm.page_table_entry_mut(victim)?
        .encode_swapped(ACTIVE_SWAP_TYPE, swap_frame)?;
    mm.victims.select_victim();

    debug!(
        "Swapped out page {} from frame {} to swap frame {}",
        victim, frame, swap_frame
    );
    Ok(frame)
}

/// Makes sure `page` is resident and returns its frame.
///
/// A swapped page is copied back into a free RAM frame, or into the frame of an
/// evicted victim if RAM is full. Its swap frame is released afterwards.
pub fn page_in<V, R, S>(
    mm: &mut MemoryContext<V>,
    ram: &mut R,
    swap: &mut S,
    page: usize,
) -> MemoryResult<usize>
where
    V: VictimSelectionModule,
    R: PhysicalMemoryModule,
    S: PhysicalMemoryModule,
{
    let entry = mm.page_table_entry(page)?;
    if !entry.is_present() {
        return Err(MemoryError::UnmappedPage(page));
    }

    if let Some(frame) = entry.frame_number_of() {
        return Ok(frame);
    }

    let swap_frame = entry.swap_offset().ok_or(MemoryError::InvalidArgument)?;

    let frame = match ram.allocate_free_frame() {
        Ok(frame) => frame,
        Err(MemoryError::OutOfMemory) => evict_victim(mm, ram, swap)?,
        Err(err) => return Err(err),
    };

    swap_copy_page(swap, swap_frame, ram, frame)?;
    swap.release_frame(swap_frame)?;

    mm.page_table_entry_mut(page)?.encode_resident(Some(frame))?;
    mm.victims.page_mapped(page);

    debug!(
        "Swapped in page {} from swap frame {} to frame {}",
        page, swap_frame, frame
    );
    Ok(frame)
}

#[cfg(test)]
mod test {
    use super::{allocate_frames, page_in, swap_copy_page, ACTIVE_SWAP_TYPE};
    use crate::{
        error::{MemoryError, MemoryResult},
        memory_context::MemoryContext,
        mm_config::MMConfig,
        modules::{
            physical_memory::{FrameTracker, PhysicalMemoryModule, RamPhysicalMemoryModule},
            victim_selection::VictimSelectionModule,
        },
        page_mapper::map_page_range,
        vm_area::DATA_VMA_ID,
    };

    const PAGE_SIZE: usize = 16;

    /// Swap device whose backing store rejects every write
    struct BrokenSwap {
        frames: FrameTracker,
    }

    impl PhysicalMemoryModule for BrokenSwap {
        fn read_byte(&mut self, _address: usize) -> MemoryResult<u8> {
            Err(MemoryError::Storage)
        }

        fn write_byte(&mut self, _address: usize, _value: u8) -> MemoryResult<()> {
            Err(MemoryError::Storage)
        }

        fn get_max_size(&self) -> usize {
            self.frames.frame_count() * PAGE_SIZE
        }

        fn frame_tracker(&self) -> &FrameTracker {
            &self.frames
        }

        fn frame_tracker_mut(&mut self) -> &mut FrameTracker {
            &mut self.frames
        }
    }

    fn test_context() -> MemoryContext {
        MemoryContext::new(
            512,
            MMConfig {
                page_size: PAGE_SIZE,
                max_page_count: 32,
                symbol_table_size: 4,
            },
        )
        .unwrap()
    }

    fn fill_frame(ram: &mut RamPhysicalMemoryModule, frame: usize, seed: u8) {
        for i in 0..PAGE_SIZE {
            ram.write_byte(frame * PAGE_SIZE + i, seed.wrapping_mul(7).wrapping_add(i as u8))
                .unwrap();
        }
    }

    #[test]
    fn test_swap_copy_page() {
        let mut ram = RamPhysicalMemoryModule::new(4 * PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(4 * PAGE_SIZE, PAGE_SIZE);

        fill_frame(&mut ram, 2, 9);
        swap_copy_page(&mut ram, 2, &mut swap, 3).unwrap();

        for i in 0..PAGE_SIZE {
            assert_eq!(swap.read_byte(3 * PAGE_SIZE + i), ram.read_byte(2 * PAGE_SIZE + i));
            // other frames stay untouched
            assert_eq!(swap.read_byte(2 * PAGE_SIZE + i), Ok(0));
        }

        assert!(matches!(
            swap_copy_page(&mut ram, 0, &mut swap, 4),
            Err(MemoryError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_allocate_without_eviction() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(3 * PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(3 * PAGE_SIZE, PAGE_SIZE);

        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 2).unwrap();
        // head of the list is the newest frame
        assert_eq!(frames, vec![0, 1]);
        assert_eq!(ram.free_frame_count(), 1);
        assert_eq!(swap.free_frame_count(), 3);
    }

    #[test]
    fn test_allocate_with_eviction() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(2 * PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(4 * PAGE_SIZE, PAGE_SIZE);

        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 2).unwrap();
        map_page_range(&mut mm, 0, 2, frames, DATA_VMA_ID).unwrap();
        let victim_frame = mm.page_table_entry(0).unwrap().frame_number_of().unwrap();
        fill_frame(&mut ram, victim_frame, 1);

        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 1).unwrap();
        assert_eq!(frames, vec![victim_frame]);

        let entry = mm.page_table_entry(0).unwrap();
        assert!(entry.is_present() && entry.is_swapped());
        assert_eq!(entry.swap_type(), Some(ACTIVE_SWAP_TYPE));
        assert_eq!(entry.swap_offset(), Some(0));
        assert_eq!(mm.victims().pages(), vec![1]);

        for i in 0..PAGE_SIZE {
            assert_eq!(
                swap.read_byte(i),
                ram.read_byte(victim_frame * PAGE_SIZE + i),
                "swapped content differs at {}",
                i
            );
        }
    }

    #[test]
    fn test_out_of_memory_without_victims() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(2 * PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(4 * PAGE_SIZE, PAGE_SIZE);

        let before = mm.page_table().to_vec();
        assert_eq!(
            allocate_frames(&mut mm, &mut ram, &mut swap, 3),
            Err(MemoryError::OutOfMemory)
        );
        assert_eq!(mm.page_table(), &before[..]);
        assert_eq!(swap.free_frame_count(), 4);
    }

    #[test]
    fn test_out_of_memory_with_full_swap() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(0, PAGE_SIZE);

        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 1).unwrap();
        map_page_range(&mut mm, 0, 1, frames, DATA_VMA_ID).unwrap();

        assert_eq!(
            allocate_frames(&mut mm, &mut ram, &mut swap, 1),
            Err(MemoryError::OutOfMemory)
        );
        // the victim is kept since it could not be moved
        assert_eq!(mm.victims().pages(), vec![0]);
        assert_eq!(mm.page_table_entry(0).unwrap().frame_number_of(), Some(0));
    }

    #[test]
    fn test_page_in() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(2 * PAGE_SIZE, PAGE_SIZE);

        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 1).unwrap();
        map_page_range(&mut mm, 0, 1, frames, DATA_VMA_ID).unwrap();
        fill_frame(&mut ram, 0, 3);
        let original: Vec<u8> = (0..PAGE_SIZE).map(|i| ram.read_byte(i).unwrap()).collect();

        // page 0 goes to swap, page 1 takes its frame
        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 1).unwrap();
        map_page_range(&mut mm, PAGE_SIZE, 1, frames, DATA_VMA_ID).unwrap();
        fill_frame(&mut ram, 0, 4);

        // bringing page 0 back evicts page 1
        assert_eq!(page_in(&mut mm, &mut ram, &mut swap, 0), Ok(0));
        let restored: Vec<u8> = (0..PAGE_SIZE).map(|i| ram.read_byte(i).unwrap()).collect();
        assert_eq!(restored, original);

        assert!(mm.page_table_entry(1).unwrap().is_swapped());
        assert_eq!(mm.page_table_entry(0).unwrap().frame_number_of(), Some(0));
        assert_eq!(mm.victims().pages(), vec![0]);
        // swap frame 0 was given back, frame 1 holds page 1
        assert_eq!(mm.page_table_entry(1).unwrap().swap_offset(), Some(1));
        assert_eq!(swap.free_frame_count(), 1);

        // resident pages are returned as they are
        assert_eq!(page_in(&mut mm, &mut ram, &mut swap, 0), Ok(0));
        assert_eq!(
            page_in(&mut mm, &mut ram, &mut swap, 5),
            Err(MemoryError::UnmappedPage(5))
        );
    }

    #[test]
    fn test_failed_swap_copy_keeps_victim() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(2 * PAGE_SIZE, PAGE_SIZE);
        let mut swap = BrokenSwap {
            frames: FrameTracker::new(4 * PAGE_SIZE, PAGE_SIZE),
        };

        let frames = allocate_frames(&mut mm, &mut ram, &mut swap, 2).unwrap();
        map_page_range(&mut mm, 0, 2, frames, DATA_VMA_ID).unwrap();
        let before = mm.page_table().to_vec();

        assert_eq!(
            allocate_frames(&mut mm, &mut ram, &mut swap, 1),
            Err(MemoryError::Storage)
        );

        // the victim is still resident, still selectable and no swap frame is lost
        assert_eq!(mm.page_table(), &before[..]);
        assert_eq!(mm.victims().pages(), vec![0, 1]);
        assert_eq!(swap.free_frame_count(), 4);
    }

    #[test]
    fn test_page_in_outside_of_page_table() {
        let mut mm = test_context();
        let mut ram = RamPhysicalMemoryModule::new(2 * PAGE_SIZE, PAGE_SIZE);
        let mut swap = RamPhysicalMemoryModule::new(2 * PAGE_SIZE, PAGE_SIZE);

        assert_eq!(
            page_in(&mut mm, &mut ram, &mut swap, 32),
            Err(MemoryError::OutOfRange {
                address: 32 * PAGE_SIZE,
                capacity: 32 * PAGE_SIZE
            })
        );
        assert_eq!(
            page_in(&mut mm, &mut ram, &mut swap, usize::MAX / 2),
            Err(MemoryError::OutOfRange {
                address: usize::MAX,
                capacity: 32 * PAGE_SIZE
            })
        );
        assert!(matches!(
            ram.release_frame(usize::MAX),
            Err(MemoryError::OutOfRange { .. })
        ));
    }
}
