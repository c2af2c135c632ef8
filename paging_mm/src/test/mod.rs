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
    modules::physical_memory::{test::get_test_swap, FilePhysicalMemoryModule, RamPhysicalMemoryModule},
    MMConfig, Process,
};

mod eviction;
mod regions;

pub(crate) const TEST_PAGE_SIZE: usize = 256;

pub(crate) fn test_config() -> MMConfig {
    MMConfig {
        page_size: TEST_PAGE_SIZE,
        max_page_count: 64,
        symbol_table_size: 10,
    }
}

/// Process spanning the whole test address space with a RAM device
/// of `ram_frames` frames and a file backed swap device of `swap_frames` frames
pub(crate) fn get_test_process(
    test_name: &str,
    ram_frames: usize,
    swap_frames: usize,
) -> Process<RamPhysicalMemoryModule, FilePhysicalMemoryModule> {
    let _ = env_logger::builder().is_test(true).try_init();

    let config = test_config();
    let ram = RamPhysicalMemoryModule::new(ram_frames * TEST_PAGE_SIZE, TEST_PAGE_SIZE);
    let swap = get_test_swap(test_name, swap_frames * TEST_PAGE_SIZE, TEST_PAGE_SIZE);

    Process::new(1, config.address_space_size(), ram, swap, config).unwrap()
}
