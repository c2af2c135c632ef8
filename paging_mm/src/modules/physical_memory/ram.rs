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

use super::{check_address, FrameTracker, PhysicalMemoryModule};
use crate::error::MemoryResult;

/// Physical memory that lives in a heap allocated buffer
pub struct RamPhysicalMemoryModule {
    data: Vec<u8>,
    frames: FrameTracker,
}

impl RamPhysicalMemoryModule {
    /// Creates a zeroed device of `size` bytes split into frames of `page_size` bytes
    pub fn new(size: usize, page_size: usize) -> Self {
        Self {
            data: vec![0u8; size],
            frames: FrameTracker::new(size, page_size),
        }
    }
}

impl PhysicalMemoryModule for RamPhysicalMemoryModule {
    #[inline]
    fn read_byte(&mut self, address: usize) -> MemoryResult<u8> {
        check_address(address, self.data.len())?;
        Ok(self.data[address])
    }

    #[inline]
    fn write_byte(&mut self, address: usize, value: u8) -> MemoryResult<()> {
        check_address(address, self.data.len())?;
        self.data[address] = value;
        Ok(())
    }

    fn get_max_size(&self) -> usize {
        self.data.len()
    }

    fn frame_tracker(&self) -> &FrameTracker {
        &self.frames
    }

    fn frame_tracker_mut(&mut self) -> &mut FrameTracker {
        &mut self.frames
    }
}
