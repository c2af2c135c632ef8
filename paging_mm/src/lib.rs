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

mod error;
mod frame_allocator;
mod memory_context;
mod mm_config;
mod page_mapper;
mod page_table_entry;
mod process;
mod util;
mod vm_area;

#[cfg(test)]
mod test;

pub mod inspect;
pub mod modules;

pub use error::{MemoryError, MemoryResult};
pub use frame_allocator::{allocate_frames, page_in, swap_copy_page, ACTIVE_SWAP_TYPE};
pub use memory_context::MemoryContext;
pub use mm_config::MMConfig;
pub use page_mapper::map_page_range;
pub use page_table_entry::{PageTableEntry, MAX_FRAME_NUMBER, MAX_SWAP_OFFSET, MAX_SWAP_TYPE};
pub use process::Process;
pub use vm_area::{GrowthDirection, Region, VirtualMemoryArea, DATA_VMA_ID, HEAP_VMA_ID};
