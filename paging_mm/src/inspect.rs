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

use crate::{
    error::{MemoryError, MemoryResult},
    memory_context::MemoryContext,
    modules::victim_selection::VictimSelectionModule,
    util::ceil_div,
    vm_area::VirtualMemoryArea,
};

/// Dumps the entries of all pages touched by the virtual range `[start, end)`.
///
/// One line per page: the entry's byte offset inside of the table and its raw value.
pub fn page_table_dump<V: VictimSelectionModule>(
    mm: &MemoryContext<V>,
    start: usize,
    end: usize,
) -> MemoryResult<String> {
    if start > end {
        return Err(MemoryError::InvalidArgument);
    }

    let page_size = mm.page_size();
    let first_page = start / page_size;
    let end_page = ceil_div(end, page_size);

    let mut out = String::new();
    out.push_str(&format!("print_pgtbl: {} - {}\n", start, end));
    for page in first_page..end_page {
        let entry = mm.page_table_entry(page)?;
        out.push_str(&format!("{:08}: {}\n", page * 4, entry));
    }

    Ok(out)
}

/// Lists the free regions of `area`, head of the free list first
pub fn free_regions_dump(area: &VirtualMemoryArea) -> String {
    let mut out = String::from("print_list_rg:\n");
    for region in area.free_regions() {
        out.push_str(&format!("{}\n", region));
    }

    out
}

/// Lists all areas of `mm` in id order together with their free regions
pub fn vma_dump<V: VictimSelectionModule>(mm: &MemoryContext<V>) -> String {
    let mut out = String::from("print_list_vma:\n");
    for area in mm.areas() {
        out.push_str(&format!("{} break={}\n", area, area.break_point()));
        for region in area.free_regions() {
            out.push_str(&format!("  {}\n", region));
        }
    }

    out
}

/// Lists the resident pages in eviction order, next victim first
pub fn fifo_dump<V: VictimSelectionModule>(mm: &MemoryContext<V>) -> String {
    let mut out = String::from("print_list_pgn:\n");
    for page in mm.victims().pages() {
        out.push_str(&format!("va[{}]-", page));
    }
    out.push('\n');

    out
}

/// Lists a frame list starting at its head (the end of the slice)
pub fn frame_list_dump(frames: &[usize]) -> String {
    let mut out = String::from("print_list_fp:\n");
    for frame in frames.iter().rev() {
        out.push_str(&format!("fp[{}]", frame));
    }
    out.push('\n');

    out
}

#[cfg(feature = "snapshot")]
mod snapshot {
    use serde::Serialize;

    use crate::{
        memory_context::MemoryContext,
        modules::victim_selection::VictimSelectionModule,
        vm_area::{GrowthDirection, Region},
    };

    #[derive(Serialize, Debug)]
    pub struct AreaSnapshot {
        pub id: usize,
        pub start: usize,
        pub end: usize,
        pub break_point: usize,
        pub direction: GrowthDirection,
        pub free_regions: Vec<Region>,
    }

    #[derive(Serialize, Debug)]
    pub struct ResidentPage {
        pub page: usize,
        pub frame: usize,
        pub dirty: bool,
    }

    #[derive(Serialize, Debug)]
    pub struct SwappedPage {
        pub page: usize,
        pub swap_type: usize,
        pub swap_offset: usize,
    }

    /// Serializable view of a memory context, only present pages are listed
    #[derive(Serialize, Debug)]
    pub struct MemorySnapshot {
        pub page_size: usize,
        pub areas: Vec<AreaSnapshot>,
        pub regions: Vec<(usize, Region)>,
        pub resident_pages: Vec<ResidentPage>,
        pub swapped_pages: Vec<SwappedPage>,
        pub fifo: Vec<usize>,
    }

    pub fn snapshot<V: VictimSelectionModule>(mm: &MemoryContext<V>) -> MemorySnapshot {
        let areas = mm
            .areas()
            .iter()
            .map(|area| AreaSnapshot {
                id: area.id(),
                start: area.start(),
                end: area.end(),
                break_point: area.break_point(),
                direction: area.direction(),
                free_regions: area.free_regions().copied().collect(),
            })
            .collect();

        let regions = mm
            .symbol_table()
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.map(|region| (id, region)))
            .collect();

        let mut resident_pages = vec![];
        let mut swapped_pages = vec![];
        for (page, entry) in mm.page_table().iter().enumerate() {
            if let Some(frame) = entry.frame_number_of() {
                resident_pages.push(ResidentPage {
                    page,
                    frame,
                    dirty: entry.is_dirty(),
                });
            } else if let (Some(swap_type), Some(swap_offset)) = (entry.swap_type(), entry.swap_offset()) {
                swapped_pages.push(SwappedPage {
                    page,
                    swap_type,
                    swap_offset,
                });
            }
        }

        MemorySnapshot {
            page_size: mm.page_size(),
            areas,
            regions,
            resident_pages,
            swapped_pages,
            fifo: mm.victims().pages(),
        }
    }

    pub fn snapshot_json<V: VictimSelectionModule>(mm: &MemoryContext<V>) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&snapshot(mm))
    }
}

#[cfg(feature = "snapshot")]
pub use snapshot::{snapshot, snapshot_json, AreaSnapshot, MemorySnapshot, ResidentPage, SwappedPage};
