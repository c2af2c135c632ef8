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

use static_assertions::{const_assert, const_assert_eq};

use crate::error::{MemoryError, MemoryResult};

const PRESENT_BIT: u32 = 1 << 31;
const SWAPPED_BIT: u32 = 1 << 30;
const DIRTY_BIT: u32 = 1 << 28;

const FPN_LOBIT: u32 = 0;
const FPN_MASK: u32 = field_mask(0, 12);

const SWPTYP_LOBIT: u32 = 0;
const SWPTYP_MASK: u32 = field_mask(0, 4);

const SWPOFF_LOBIT: u32 = 5;
const SWPOFF_MASK: u32 = field_mask(5, 25);

/// Mask covering the bits `[lo, hi]`
const fn field_mask(lo: u32, hi: u32) -> u32 {
    ((1u32 << (hi - lo + 1)) - 1) << lo
}

// value fields must never clobber the flag bits
const_assert_eq!(FPN_MASK & (PRESENT_BIT | SWAPPED_BIT | DIRTY_BIT), 0);
const_assert_eq!(SWPTYP_MASK & (PRESENT_BIT | SWAPPED_BIT | DIRTY_BIT), 0);
const_assert_eq!(SWPOFF_MASK & (PRESENT_BIT | SWAPPED_BIT | DIRTY_BIT), 0);
const_assert_eq!(SWPTYP_MASK & SWPOFF_MASK, 0);
const_assert!(SWPOFF_MASK > FPN_MASK);

/// Largest frame number a resident entry can hold
pub const MAX_FRAME_NUMBER: usize = (FPN_MASK >> FPN_LOBIT) as usize;

/// Largest swap type an entry can hold
pub const MAX_SWAP_TYPE: usize = (SWPTYP_MASK >> SWPTYP_LOBIT) as usize;

/// Largest swap offset an entry can hold
pub const MAX_SWAP_OFFSET: usize = (SWPOFF_MASK >> SWPOFF_LOBIT) as usize;

/// A 32 bit page table entry.
///
/// If `present` is set, the entry either holds a frame number (`swapped` unset)
/// or a swap type and swap offset (`swapped` set). A default entry is not present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageTableEntry(u32);

impl PageTableEntry {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Marks the page as resident in `frame_number`, clears the swapped and dirty flags.
    ///
    /// A missing frame number or one that does not fit the frame field is rejected.
    pub fn encode_resident(&mut self, frame_number: Option<usize>) -> MemoryResult<()> {
        let frame_number = match frame_number {
            Some(fpn) if fpn <= MAX_FRAME_NUMBER => fpn as u32,
            _ => return Err(MemoryError::InvalidArgument),
        };

        self.0 |= PRESENT_BIT;
        // stale swap offset bits above the frame field go as well
        self.0 &= !(SWAPPED_BIT | DIRTY_BIT | SWPOFF_MASK);
        self.set_field(frame_number, FPN_MASK, FPN_LOBIT);

        Ok(())
    }

    /// Marks the page as swapped out to `swap_offset` of swap device `swap_type`
    pub fn encode_swapped(&mut self, swap_type: usize, swap_offset: usize) -> MemoryResult<()> {
        if swap_type > MAX_SWAP_TYPE || swap_offset > MAX_SWAP_OFFSET {
            return Err(MemoryError::InvalidArgument);
        }

        self.0 |= PRESENT_BIT | SWAPPED_BIT;
        self.0 &= !DIRTY_BIT;
        self.set_field(swap_type as u32, SWPTYP_MASK, SWPTYP_LOBIT);
        self.set_field(swap_offset as u32, SWPOFF_MASK, SWPOFF_LOBIT);

        Ok(())
    }

    #[inline]
    fn set_field(&mut self, value: u32, mask: u32, lobit: u32) {
        self.0 = (self.0 & !mask) | ((value << lobit) & mask);
    }

    #[inline]
    fn get_field(&self, mask: u32, lobit: u32) -> usize {
        ((self.0 & mask) >> lobit) as usize
    }

    /// Frame number of a resident page, `None` if the page is not resident
    pub fn frame_number_of(&self) -> Option<usize> {
        if self.is_present() && !self.is_swapped() {
            Some(self.get_field(FPN_MASK, FPN_LOBIT))
        } else {
            None
        }
    }

    pub fn swap_type(&self) -> Option<usize> {
        if self.is_present() && self.is_swapped() {
            Some(self.get_field(SWPTYP_MASK, SWPTYP_LOBIT))
        } else {
            None
        }
    }

    pub fn swap_offset(&self) -> Option<usize> {
        if self.is_present() && self.is_swapped() {
            Some(self.get_field(SWPOFF_MASK, SWPOFF_LOBIT))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.0 & PRESENT_BIT != 0
    }

    #[inline]
    pub fn is_swapped(&self) -> bool {
        self.0 & SWAPPED_BIT != 0
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.0 & DIRTY_BIT != 0
    }

    pub fn mark_dirty(&mut self) {
        self.0 |= DIRTY_BIT;
    }
}

impl fmt::Display for PageTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}
