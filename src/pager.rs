//! Fixed-size page I/O over a single file.
//!
//! Pages are addressed by a zero-based id and read/written by seeking to
//! `id * PAGE_SIZE`. New pages are appended to the end of the file.

use crate::error::{Error, Result};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

pub const PAGE_SIZE: usize = 4096;

pub type Page = [u8; PAGE_SIZE];

pub fn zeroed_page() -> Page {
    [0u8; PAGE_SIZE]
}

/// Owns one open file and hands out fixed-size pages by id.
///
/// There is no dirty-page list or write-back cache: every `write_page`
/// call is a synchronous write-through.
pub struct Pager {
    file: File,
    page_count: u32,
}

impl Pager {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        let len = file.metadata()?.len();
        let page_count = (len / PAGE_SIZE as u64) as u32;
        log::debug!("pager opened {:?} with {page_count} pages", path);
        Ok(Pager { file, page_count })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn read_page(&mut self, id: u32) -> Result<Page> {
        if id >= self.page_count {
            return Err(Error::OutOfRange {
                id,
                page_count: self.page_count,
            });
        }
        let mut buf = zeroed_page();
        self.file.seek(SeekFrom::Start(offset_of(id)))?;
        self.file.read_exact(&mut buf)?;
        Ok(buf)
    }

    pub fn write_page(&mut self, id: u32, bytes: &Page) -> Result<()> {
        if id >= self.page_count {
            return Err(Error::OutOfRange {
                id,
                page_count: self.page_count,
            });
        }
        self.file.seek(SeekFrom::Start(offset_of(id)))?;
        self.file.write_all(bytes)?;
        Ok(())
    }

    /// Extend the file by one zero-filled page, returning its id. Ids are
    /// assigned sequentially starting at 0; pages are never freed.
    pub fn allocate_page(&mut self) -> Result<(u32, Page)> {
        let id = self.page_count;
        let page = zeroed_page();
        self.file.seek(SeekFrom::Start(offset_of(id)))?;
        self.file.write_all(&page)?;
        self.page_count += 1;
        log::trace!("allocated page {id}");
        Ok((id, page))
    }

    pub fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }
}

fn offset_of(id: u32) -> u64 {
    id as u64 * PAGE_SIZE as u64
}
