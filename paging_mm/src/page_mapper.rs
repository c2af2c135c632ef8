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

use log::trace;

use crate::{
    error::{MemoryError, MemoryResult},
    memory_context::MemoryContext,
    modules::victim_selection::VictimSelectionModule,
    vm_area::{Region, DATA_VMA_ID, HEAP_VMA_ID},
};

/// Maps `page_count` pages starting at `virtual_address` to the frames of `frames`.
///
/// Frames are taken from the head of the list (the end of the `Vec`), one per page,
/// walking the pages in ascending order. Afterwards the pages are recorded as resident:
/// the data area records them lowest page first, the heap area highest page first
/// since it grows downwards. This changes which page of a batch is evicted first.
///
/// Returns the region `[virtual_address, virtual_address + page_count * page_size)`.
pub fn map_page_range<V: VictimSelectionModule>(
    mm: &mut MemoryContext<V>,
    virtual_address: usize,
    page_count: usize,
    mut frames: Vec<usize>,
    vma_id: usize,
) -> MemoryResult<Region> {
    let page_size = mm.page_size();
    let first_page = virtual_address / page_size;
    let end_page = first_page + page_count;

    if vma_id != DATA_VMA_ID && vma_id != HEAP_VMA_ID {
        return Err(MemoryError::InvalidArgument);
    }
    if frames.len() < page_count {
        return Err(MemoryError::InvalidArgument);
    }
    if end_page > mm.page_table.len() {
        return Err(MemoryError::OutOfRange {
            address: end_page * page_size,
            capacity: mm.config.address_space_size(),
        });
    }

    for page in first_page..end_page {
        let frame = frames.pop().ok_or(MemoryError::InvalidArgument)?;
        mm.page_table[page].encode_resident(Some(frame))?;

        trace!("Mapped page {} to frame {}", page, frame);
    }

    if vma_id == DATA_VMA_ID {
        for page in first_page..end_page {
            mm.victims.page_mapped(page);
        }
    } else {
        for page in (first_page..end_page).rev() {
            mm.victims.page_mapped(page);
        }
    }

    Ok(Region::new(
        virtual_address,
        virtual_address + page_count * page_size,
        vma_id,
    ))
}
