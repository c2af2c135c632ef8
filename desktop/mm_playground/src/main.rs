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

use std::error::Error;

use env_logger::{Builder, Env};
use log::info;
use paging_mm::{
    inspect::{fifo_dump, page_table_dump, snapshot_json, vma_dump},
    modules::physical_memory::{FilePhysicalMemoryModule, RamPhysicalMemoryModule},
    MMConfig, Process, DATA_VMA_ID, HEAP_VMA_ID,
};

const PAGE_SIZE: usize = 256;
const RAM_FRAMES: usize = 4;
const SWAP_FRAMES: usize = 16;
const VMEMSZ: usize = 16 * 1024;

fn main() -> Result<(), Box<dyn Error>> {
    Builder::from_env(Env::default())
        .filter_level(log::LevelFilter::Debug)
        .format_module_path(false)
        .init();

    let config = MMConfig {
        page_size: PAGE_SIZE,
        max_page_count: VMEMSZ / PAGE_SIZE,
        symbol_table_size: 30,
    };
    let ram = RamPhysicalMemoryModule::new(RAM_FRAMES * PAGE_SIZE, PAGE_SIZE);
    let swap = FilePhysicalMemoryModule::new(
        "/tmp/mm_playground_swap.data".to_string(),
        SWAP_FRAMES * PAGE_SIZE,
        PAGE_SIZE,
    )?;

    let mut process: Process<_, _> = Process::new(1, VMEMSZ, ram, swap, config)?;

    // more pages than ram frames, so the first pages end up in swap
    process.alloc(0, DATA_VMA_ID, 3 * PAGE_SIZE)?;
    process.alloc(1, HEAP_VMA_ID, 2 * PAGE_SIZE + 100)?;

    for offset in 0..16 {
        process.write_byte(0, offset, offset as u8 * 3)?;
    }
    info!("region 0 starts with {}", process.read_byte(0, 5)?);

    process.free(1)?;
    process.alloc(2, HEAP_VMA_ID, 100)?;

    let mm = process.mm();
    print!("{}", vma_dump(mm));
    print!("{}", fifo_dump(mm));
    print!("{}", page_table_dump(mm, 0, 4 * PAGE_SIZE)?);
    println!("{}", snapshot_json(mm)?);

    Ok(())
}
