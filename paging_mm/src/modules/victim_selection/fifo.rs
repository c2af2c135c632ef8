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

use std::collections::VecDeque;

use super::VictimSelectionModule;

/// Evicts the page that became resident first
pub struct FifoVictimSelectionModule {
    /// oldest page at the front
    queue: VecDeque<usize>,
}

impl VictimSelectionModule for FifoVictimSelectionModule {
    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    fn page_mapped(&mut self, page: usize) {
        self.queue.push_back(page);
    }

    fn next_victim(&self) -> Option<usize> {
        self.queue.front().copied()
    }

    fn select_victim(&mut self) -> Option<usize> {
        self.queue.pop_front()
    }

    fn pages(&self) -> Vec<usize> {
        self.queue.iter().copied().collect()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}
