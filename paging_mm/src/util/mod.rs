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

pub(crate) mod bit_array;

/// efficient way to calculate: ceil(x / y)
pub(crate) fn ceil_div(x: usize, y: usize) -> usize {
    x / y + (x % y != 0) as usize
}

/// Rounds `value` down to a multiple of `alignment`
pub(crate) fn align_down(value: usize, alignment: usize) -> usize {
    value - (value % alignment)
}

/// Rounds `value` up to the next multiple of `alignment`
pub(crate) fn align_up(value: usize, alignment: usize) -> usize {
    ceil_div(value, alignment) * alignment
}
