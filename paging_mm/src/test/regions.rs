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

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::get_test_process;
use crate::{MemoryError, DATA_VMA_ID, HEAP_VMA_ID};

#[test]
fn test_released_region_is_reused() {
    let mut process = get_test_process("test_released_region_is_reused", 48, 4);
    let mut rng = SmallRng::seed_from_u64(0x1a2b3c4d);

    for _ in 0..30 {
        let vma_id = if rng.gen_bool(0.5) { DATA_VMA_ID } else { HEAP_VMA_ID };
        let size = rng.gen_range(1..=300);

        let released = process.alloc(0, vma_id, size).unwrap();
        process.free(0).unwrap();

        let smaller = rng.gen_range(1..=size);
        let reused = process.alloc(1, vma_id, smaller).unwrap();
        assert!(
            released.contains(&reused),
            "{} should lie inside of {}",
            reused,
            released
        );

        process.free(1).unwrap();
    }
}

#[test]
fn test_symbol_table_ids() {
    let mut process = get_test_process("test_symbol_table_ids", 4, 4);

    let region = process.alloc(9, DATA_VMA_ID, 10).unwrap();
    assert_eq!(process.mm().region(9), Some(region));

    assert_eq!(process.alloc(9, DATA_VMA_ID, 10), Err(MemoryError::InvalidArgument));
    assert_eq!(process.alloc(10, DATA_VMA_ID, 10), Err(MemoryError::InvalidArgument));
    assert_eq!(process.alloc(0, DATA_VMA_ID, 0), Err(MemoryError::InvalidArgument));
    assert_eq!(process.free(3), Err(MemoryError::InvalidArgument));

    assert_eq!(process.free(9), Ok(region));
    assert_eq!(process.mm().region(9), None);
}
