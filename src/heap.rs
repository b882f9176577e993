//! Slotted-page row store over a `Pager`.
//!
//! Every page is laid out as a small slot directory growing from the
//! front of the page and row payloads growing from the back:
//!
//! ```text
//! [ num_slots:u16 | reserved:u16 | slot 0 | slot 1 | ... | free space | ... | row 1 | row 0 ]
//! ```
//!
//! Each slot is `(offset: u32, length: u32)`; `(0, 0)` marks a tombstone.
//! Row payloads are UTF-8 JSON via `serde_json`, one row per payload.

use crate::error::{Error, Result};
use crate::pager::{Page, Pager, PAGE_SIZE};
use crate::value::Row;
use std::path::Path;

const SLOT_DIR_HEADER: usize = 4; // num_slots:u16 + reserved:u16
const SLOT_SIZE: usize = 8; // offset:u32 + length:u32

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct Rid {
    pub page_id: u32,
    pub slot_id: u16,
}

impl Rid {
    pub fn new(page_id: u32, slot_id: u16) -> Self {
        Rid { page_id, slot_id }
    }
}

impl std::fmt::Display for Rid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}:{})", self.page_id, self.slot_id)
    }
}

#[derive(Clone, Copy)]
struct Slot {
    offset: u32,
    length: u32,
}

impl Slot {
    fn tombstone() -> Self {
        Slot { offset: 0, length: 0 }
    }

    fn is_tombstone(&self) -> bool {
        self.offset == 0 && self.length == 0
    }
}

fn read_slot(page: &Page, idx: usize) -> Slot {
    let at = SLOT_DIR_HEADER + idx * SLOT_SIZE;
    let offset = u32::from_le_bytes(page[at..at + 4].try_into().unwrap());
    let length = u32::from_le_bytes(page[at + 4..at + 8].try_into().unwrap());
    Slot { offset, length }
}

fn write_slot(page: &mut Page, idx: usize, slot: Slot) {
    let at = SLOT_DIR_HEADER + idx * SLOT_SIZE;
    page[at..at + 4].copy_from_slice(&slot.offset.to_le_bytes());
    page[at + 4..at + 8].copy_from_slice(&slot.length.to_le_bytes());
}

fn num_slots(page: &Page) -> u16 {
    u16::from_le_bytes([page[0], page[1]])
}

fn set_num_slots(page: &mut Page, n: u16) {
    page[0..2].copy_from_slice(&n.to_le_bytes());
}

/// Offset of the lowest live payload byte currently used in `page`; the
/// tail of free space starts here and grows toward the slot directory.
fn lowest_live_offset(page: &Page, slots: u16) -> usize {
    let mut lowest = PAGE_SIZE;
    for i in 0..slots {
        let slot = read_slot(page, i as usize);
        if !slot.is_tombstone() && (slot.offset as usize) < lowest {
            lowest = slot.offset as usize;
        }
    }
    lowest
}

fn free_space(page: &Page) -> usize {
    let slots = num_slots(page);
    let slot_dir_end = SLOT_DIR_HEADER + slots as usize * SLOT_SIZE;
    lowest_live_offset(page, slots).saturating_sub(slot_dir_end)
}

pub struct HeapFile {
    pager: Pager,
}

impl HeapFile {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(HeapFile {
            pager: Pager::open(path)?,
        })
    }

    pub fn page_count(&self) -> u32 {
        self.pager.page_count()
    }

    /// Free bytes currently available on `page_id`: the gap between the
    /// end of the slot directory and the lowest live payload offset.
    pub fn free_space(&mut self, page_id: u32) -> Result<usize> {
        let page = self.pager.read_page(page_id)?;
        Ok(free_space(&page))
    }

    /// Serialize `row` and place it in the first page (lowest id) with
    /// enough free space, allocating a new page if none qualifies.
    pub fn insert(&mut self, row: &Row) -> Result<Rid> {
        let payload = serde_json::to_vec(row).map_err(|e| Error::Encoding(e.to_string()))?;
        let needed = payload.len() + SLOT_SIZE;

        for page_id in 0..self.pager.page_count() {
            if self.free_space(page_id)? >= needed {
                let page = self.pager.read_page(page_id)?;
                let rid = self.insert_into_page(page_id, page, &payload)?;
                return Ok(rid);
            }
        }

        let (page_id, page) = self.pager.allocate_page()?;
        self.insert_into_page(page_id, page, &payload)
    }

    // Always appends a fresh slot rather than reclaiming a tombstone.
    // RID stability for live rows holds regardless of reuse policy.
    fn insert_into_page(&mut self, page_id: u32, mut page: Page, payload: &[u8]) -> Result<Rid> {
        let slots = num_slots(&page);
        let slot_id = slots;
        let slot_dir_end = SLOT_DIR_HEADER + (slots as usize + 1) * SLOT_SIZE;
        let lowest = lowest_live_offset(&page, slots);
        if lowest < slot_dir_end + payload.len() {
            return Err(Error::RowTooLarge { len: payload.len() });
        }
        let new_offset = lowest - payload.len();
        page[new_offset..new_offset + payload.len()].copy_from_slice(payload);
        write_slot(&mut page, slot_id as usize, Slot {
            offset: new_offset as u32,
            length: payload.len() as u32,
        });
        set_num_slots(&mut page, slots + 1);
        self.pager.write_page(page_id, &page)?;
        Ok(Rid::new(page_id, slot_id))
    }

    pub fn get(&mut self, rid: Rid) -> Result<Row> {
        let page = self.pager.read_page(rid.page_id)?;
        let slot = self.slot_for(&page, rid)?;
        if slot.is_tombstone() {
            return Err(Error::NotFound);
        }
        decode_row(&page, slot)
    }

    pub fn update(&mut self, rid: Rid, row: &Row) -> Result<()> {
        let mut page = self.pager.read_page(rid.page_id)?;
        let slot = self.slot_for(&page, rid)?;
        if slot.is_tombstone() {
            return Err(Error::NotFound);
        }
        let payload = serde_json::to_vec(row).map_err(|e| Error::Encoding(e.to_string()))?;
        if payload.len() > slot.length as usize {
            return Err(Error::RowTooLarge { len: payload.len() });
        }
        let at = slot.offset as usize;
        page[at..at + payload.len()].copy_from_slice(&payload);
        write_slot(&mut page, rid.slot_id as usize, Slot {
            offset: slot.offset,
            length: payload.len() as u32,
        });
        self.pager.write_page(rid.page_id, &page)
    }

    pub fn delete(&mut self, rid: Rid) -> Result<()> {
        let mut page = self.pager.read_page(rid.page_id)?;
        let slot = self.slot_for(&page, rid)?;
        if slot.is_tombstone() {
            return Err(Error::NotFound);
        }
        write_slot(&mut page, rid.slot_id as usize, Slot::tombstone());
        self.pager.write_page(rid.page_id, &page)
    }

    pub fn scan(&mut self) -> Result<HeapScan<'_>> {
        Ok(HeapScan {
            heap: self,
            page_id: 0,
            slot_id: 0,
        })
    }

    fn slot_for(&self, page: &Page, rid: Rid) -> Result<Slot> {
        let slots = num_slots(page);
        if rid.slot_id >= slots {
            return Err(Error::NotFound);
        }
        Ok(read_slot(page, rid.slot_id as usize))
    }
}

fn decode_row(page: &Page, slot: Slot) -> Result<Row> {
    let at = slot.offset as usize;
    let bytes = &page[at..at + slot.length as usize];
    serde_json::from_slice(bytes).map_err(|e| Error::Encoding(e.to_string()))
}

/// Iterates `(Rid, Row)` pairs page by page, slot by slot, skipping
/// tombstones, without materializing the whole table up front.
pub struct HeapScan<'a> {
    heap: &'a mut HeapFile,
    page_id: u32,
    slot_id: u16,
}

impl<'a> Iterator for HeapScan<'a> {
    type Item = Result<(Rid, Row)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.page_id >= self.heap.pager.page_count() {
                return None;
            }
            let page = match self.heap.pager.read_page(self.page_id) {
                Ok(p) => p,
                Err(e) => return Some(Err(e)),
            };
            let slots = num_slots(&page);
            if self.slot_id >= slots {
                self.page_id += 1;
                self.slot_id = 0;
                continue;
            }
            let slot = read_slot(&page, self.slot_id as usize);
            let rid = Rid::new(self.page_id, self.slot_id);
            self.slot_id += 1;
            if slot.is_tombstone() {
                continue;
            }
            return Some(decode_row(&page, slot).map(|row| (rid, row)));
        }
    }
}
