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

/// Sizing of a simulated address space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MMConfig {
    /// Size of one page (and one frame) in bytes
    pub page_size: usize,

    /// Number of entries in the page table.
    /// Virtual addresses have to stay below `page_size * max_page_count`.
    pub max_page_count: usize,

    /// Number of slots in the symbol table
    pub symbol_table_size: usize,
}

impl MMConfig {
    /// Size of the virtual address space in bytes
    pub fn address_space_size(&self) -> usize {
        self.page_size * self.max_page_count
    }
}

impl Default for MMConfig {
    fn default() -> Self {
        // 22 bit address bus with 256 byte pages
        Self {
            page_size: 256,
            max_page_count: 1 << 14,
            symbol_table_size: 30,
        }
    }
}
