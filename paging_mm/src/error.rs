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

use core::fmt;

/// Errors reported by the memory management core.
///
/// Every error is returned to the immediate caller. The only recovery done
/// internally is the single victim eviction inside frame allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// Malformed request, e.g. a resident entry without a frame number,
    /// an unknown region id or a zero sized allocation.
    InvalidArgument,

    /// No frame is available, even after trying to evict a victim page.
    OutOfMemory,

    /// `address` lies outside of `[0, capacity)`.
    OutOfRange { address: usize, capacity: usize },

    /// The page was never mapped, so there is nothing to load.
    UnmappedPage(usize),

    /// Growing area `vma_id` would run into its neighbour.
    AreaOverlap { vma_id: usize },

    /// The backing store of a device failed.
    Storage,
}

pub type MemoryResult<T> = Result<T, MemoryError>;

impl fmt::Display for MemoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryError::InvalidArgument => write!(f, "invalid argument"),
            MemoryError::OutOfMemory => write!(f, "out of memory"),
            MemoryError::OutOfRange { address, capacity } => {
                write!(f, "address {} out of range (capacity {})", address, capacity)
            }
            MemoryError::UnmappedPage(page) => write!(f, "page {} is not mapped", page),
            MemoryError::AreaOverlap { vma_id } => {
                write!(f, "growing vma {} would overlap another area", vma_id)
            }
            MemoryError::Storage => write!(f, "storage failure"),
        }
    }
}

impl std::error::Error for MemoryError {}
