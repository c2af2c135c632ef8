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

mod fifo;

pub use fifo::FifoVictimSelectionModule;

/// Decides which resident page gets swapped out when RAM runs out of frames.
pub trait VictimSelectionModule {
    /// Creates a new module that does not know about any resident page
    fn new() -> Self;

    /// Records that `page` became resident
    fn page_mapped(&mut self, page: usize);

    /// The page that would be evicted next, without removing it
    fn next_victim(&self) -> Option<usize>;

    /// Removes and returns the page that should be evicted next,
    /// `None` if there is no resident page left
    fn select_victim(&mut self) -> Option<usize>;

    /// Resident pages in eviction order
    fn pages(&self) -> Vec<usize>;

    /// Number of pages that can be selected as victim
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
