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

use std::{
    fs::{remove_file, File},
    io::{Read, Seek, SeekFrom, Write},
    mem::ManuallyDrop,
    path::Path,
};

use log::warn;

use super::{check_address, FrameTracker, PhysicalMemoryModule};
use crate::error::{MemoryError, MemoryResult};

/// Physical memory backed by a scratch file, typically used as swap device.
///
/// The file is removed again once the module is dropped.
pub struct FilePhysicalMemoryModule {
    /// underlying file
    file: ManuallyDrop<File>,

    /// path of file, save for deleting file later
    file_path: String,

    /// cached file size, so no `metadata` call necessary
    file_size: usize,

    frames: FrameTracker,
}

impl FilePhysicalMemoryModule {
    /// Creates a zeroed file of `size` bytes at `filepath`, split into frames of `page_size` bytes
    pub fn new(filepath: String, size: usize, page_size: usize) -> std::io::Result<Self> {
        let file = File::options()
            .read(true)
            .write(true)
            .truncate(true)
            .create(true)
            .open(filepath.clone())?;

        file.set_len(size as u64)?;

        Ok(Self {
            file: ManuallyDrop::new(file),
            file_path: filepath,
            file_size: size,
            frames: FrameTracker::new(size, page_size),
        })
    }
}

impl PhysicalMemoryModule for FilePhysicalMemoryModule {
    fn read_byte(&mut self, address: usize) -> MemoryResult<u8> {
        check_address(address, self.file_size)?;

        let mut buffer = [0u8; 1];
        self.file
            .seek(SeekFrom::Start(address as u64))
            .map_err(|_| MemoryError::Storage)?;
        self.file
            .read_exact(&mut buffer)
            .map_err(|_| MemoryError::Storage)?;

        Ok(buffer[0])
    }

    fn write_byte(&mut self, address: usize, value: u8) -> MemoryResult<()> {
        check_address(address, self.file_size)?;

        self.file
            .seek(SeekFrom::Start(address as u64))
            .map_err(|_| MemoryError::Storage)?;
        self.file
            .write_all(&[value])
            .map_err(|_| MemoryError::Storage)?;

        Ok(())
    }

    fn get_max_size(&self) -> usize {
        self.file_size
    }

    fn frame_tracker(&self) -> &FrameTracker {
        &self.frames
    }

    fn frame_tracker_mut(&mut self) -> &mut FrameTracker {
        &mut self.frames
    }
}

impl Drop for FilePhysicalMemoryModule {
    fn drop(&mut self) {
        // drop and close file before removing
        // note that after this call, file should never be accessed again...
        unsafe {
            ManuallyDrop::drop(&mut self.file);
        }

        if Path::new(self.file_path.as_str()).exists() {
            if remove_file(self.file_path.as_str()).is_err() {
                warn!("Could not remove swap file {}", self.file_path);
            }
        }
    }
}
