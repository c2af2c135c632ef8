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

use super::{get_test_process, TEST_PAGE_SIZE};
use crate::{
    modules::{physical_memory::PhysicalMemoryModule, victim_selection::VictimSelectionModule},
    MemoryError, DATA_VMA_ID, HEAP_VMA_ID,
};

#[test]
fn test_out_of_memory_leaves_page_table_untouched() {
    let mut process = get_test_process("test_out_of_memory_leaves_page_table_untouched", 2, 4);
    let before = process.mm().page_table().to_vec();

    assert_eq!(
        process.alloc(0, DATA_VMA_ID, 3 * TEST_PAGE_SIZE),
        Err(MemoryError::OutOfMemory)
    );

    assert_eq!(process.mm().page_table(), &before[..]);
    assert_eq!(process.mm().region(0), None);
    assert_eq!(process.swap().free_frame_count(), 4);

    let data = process.mm().area(DATA_VMA_ID).unwrap();
    assert_eq!((data.end(), data.break_point()), (0, 0));
}

#[test]
fn test_one_victim_per_missing_frame() {
    let mut process = get_test_process("test_one_victim_per_missing_frame", 4, 8);

    process.alloc(0, DATA_VMA_ID, 4 * TEST_PAGE_SIZE).unwrap();
    assert_eq!(process.ram().free_frame_count(), 0);

    // three more pages, so the three oldest pages have to go
    process.alloc(1, DATA_VMA_ID, 3 * TEST_PAGE_SIZE).unwrap();

    let mm = process.mm();
    for page in 0..3 {
        let entry = mm.page_table_entry(page).unwrap();
        assert!(entry.is_swapped(), "page {} should be swapped out", page);
        assert!(entry.swap_offset().unwrap() < process.swap().frame_count());
    }
    for page in 3..7 {
        assert!(mm.page_table_entry(page).unwrap().frame_number_of().is_some());
    }

    assert_eq!(mm.victims().pages(), vec![3, 4, 5, 6]);
    assert_eq!(process.swap().free_frame_count(), 5);
}

#[test]
fn test_fifo_order_depends_on_area() {
    let mut process = get_test_process("test_fifo_order_depends_on_area", 8, 4);
    let vmemsz = process.vmemsz();
    let last_page = vmemsz / TEST_PAGE_SIZE - 1;

    // the heap grows downwards, so its batch is recorded highest page first
    process.alloc(0, HEAP_VMA_ID, 600).unwrap();
    process.alloc(1, DATA_VMA_ID, 300).unwrap();

    assert_eq!(
        process.mm().victims().pages(),
        vec![last_page, last_page - 1, last_page - 2, 0, 1]
    );
}
