//! File helpers used by the signature builder and the apply writer

use std::fs::{File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::Path;

use chrono::{DateTime, Utc};

/// Size and modification time of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u64,
    pub modified: DateTime<Utc>,
}

impl FileStat {
    /// Stat an already open file
    pub fn of(file: &File) -> io::Result<Self> {
        let metadata = file.metadata()?;
        Ok(Self {
            size: metadata.len(),
            modified: metadata.modified()?.into(),
        })
    }
}

/// Open a file for reading
pub fn open_file(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Open a file for positional writes, creating it when absent.
///
/// Existing content is kept; nothing is truncated on open.
pub fn open_for_write(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
}

/// Stat the file at `path`
pub fn stat(path: &Path) -> io::Result<FileStat> {
    FileStat::of(&open_file(path)?)
}

/// Overwrite `data.len()` bytes at `offset`
pub fn write_at(file: &mut File, offset: u64, data: &[u8]) -> io::Result<()> {
    file.seek(SeekFrom::Start(offset))?;
    file.write_all(data)
}

/// Append `data` to the current end of the file
pub fn append(file: &mut File, data: &[u8]) -> io::Result<()> {
    file.seek(SeekFrom::End(0))?;
    file.write_all(data)
}

/// Replace the whole content of the file at `path`
pub fn write_to_file(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
