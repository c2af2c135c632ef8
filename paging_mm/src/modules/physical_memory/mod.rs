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

mod file_storage;
mod ram;

pub use file_storage::FilePhysicalMemoryModule;
pub use ram::RamPhysicalMemoryModule;

use log::trace;

use crate::{
    error::{MemoryError, MemoryResult},
    util::bit_array::BitArray,
};

/// Keeps track of which frames of a device are in use
pub struct FrameTracker {
    used: BitArray,
    page_size: usize,
}

impl FrameTracker {
    /// Tracks the `capacity / page_size` whole frames of a device with `capacity` bytes
    pub fn new(capacity: usize, page_size: usize) -> Self {
        assert!(page_size > 0, "page size has to be greater than zero");

        Self {
            used: BitArray::new(capacity / page_size),
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn frame_count(&self) -> usize {
        self.used.len()
    }

    pub fn free_frame_count(&self) -> usize {
        self.used.len() - self.used.count_set()
    }

    pub fn is_used(&self, frame: usize) -> bool {
        frame < self.used.len() && self.used.is_set(frame)
    }
}

/// A byte addressable physical store that is split into frames of `page_size` bytes.
///
/// Both RAM and swap are implemented as a physical memory module,
/// so pages can be copied between them in either direction.
pub trait PhysicalMemoryModule {
    /// Reads the byte at `address`
    fn read_byte(&mut self, address: usize) -> MemoryResult<u8>;

    /// Writes `value` to `address`
    fn write_byte(&mut self, address: usize, value: u8) -> MemoryResult<()>;

    /// Returns the size in bytes of this device
    fn get_max_size(&self) -> usize;

    fn frame_tracker(&self) -> &FrameTracker;

    fn frame_tracker_mut(&mut self) -> &mut FrameTracker;

    /// Reserves the lowest free frame and returns its number
    fn allocate_free_frame(&mut self) -> MemoryResult<usize> {
        let tracker = self.frame_tracker_mut();
        let frame = tracker.used.first_unset().ok_or(MemoryError::OutOfMemory)?;
        tracker.used.set(true, frame);

        trace!("Reserved frame {}", frame);
        Ok(frame)
    }

    /// Returns `frame` to the pool of free frames
    fn release_frame(&mut self, frame: usize) -> MemoryResult<()> {
        let tracker = self.frame_tracker_mut();
        if frame >= tracker.frame_count() {
            return Err(MemoryError::OutOfRange {
                address: frame.saturating_mul(tracker.page_size),
                capacity: tracker.frame_count() * tracker.page_size,
            });
        }

        debug_assert!(tracker.used.is_set(frame), "releasing unused frame {}", frame);
        tracker.used.set(false, frame);

        trace!("Released frame {}", frame);
        Ok(())
    }

    fn page_size(&self) -> usize {
        self.frame_tracker().page_size()
    }

    fn frame_count(&self) -> usize {
        self.frame_tracker().frame_count()
    }

    fn free_frame_count(&self) -> usize {
        self.frame_tracker().free_frame_count()
    }
}

/// Returns an error if `address` is outside of `[0, capacity)`
#[inline]
pub(crate) fn check_address(address: usize, capacity: usize) -> MemoryResult<()> {
    if address < capacity {
        Ok(())
    } else {
        Err(MemoryError::OutOfRange { address, capacity })
    }
}
