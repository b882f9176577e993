//! Composes one `HeapFile` and one `PageBTree` into primary-key-indexed
//! CRUD plus range scan over a single table.

use crate::btree::PageBTree;
use crate::error::{Error, Result};
use crate::heap::{HeapFile, Rid};
use crate::value::{Row, Schema, Value};
use std::path::Path;

pub struct Table {
    pub schema: Schema,
    heap: HeapFile,
    index: PageBTree,
}

impl Table {
    pub fn open(dir: impl AsRef<Path>, schema: Schema, btree_order: u16) -> Result<Self> {
        let dir = dir.as_ref();
        let heap = HeapFile::open(dir.join("heap.db"))?;
        let index = PageBTree::open(dir.join("pk.idx"), btree_order)?;
        Ok(Table { schema, heap, index })
    }

    pub fn insert(&mut self, row: Row) -> Result<Rid> {
        row.validate(&self.schema)?;
        let pk = row.pk_value(&self.schema)?;
        let rid = self.heap.insert(&row)?;
        if let Err(e) = self.index.insert(pk, rid) {
            // Compensate: the heap row must not outlive a failed index
            // insert, or it becomes an orphan no query path can reach.
            self.heap.delete(rid)?;
            return Err(e);
        }
        Ok(rid)
    }

    /// Resolves a row directly through its heap rid, bypassing the index.
    /// Exposed for tests that check RID stability (the same rid must keep
    /// resolving to the same payload across unrelated mutations).
    pub fn get_by_rid(&mut self, rid: Rid) -> Result<Row> {
        self.heap.get(rid)
    }

    pub fn select_by_pk(&mut self, pk: i64) -> Result<Option<Row>> {
        match self.index.search(pk)? {
            Some(rid) => Ok(Some(self.heap.get(rid)?)),
            None => Ok(None),
        }
    }

    pub fn select_all(&mut self) -> Result<Vec<Row>> {
        self.heap
            .scan()?
            .map(|r| r.map(|(_, row)| row))
            .collect::<Result<Vec<_>>>()
    }

    /// Materializes each row through the heap; a row whose rid the heap
    /// can't resolve indicates the index and heap have drifted apart, and
    /// is skipped defensively with a warning rather than propagated as an
    /// error.
    pub fn range_by_pk(
        &mut self,
        lo: Option<i64>,
        hi: Option<i64>,
        lo_inclusive: bool,
        hi_inclusive: bool,
    ) -> Result<Vec<Row>> {
        let pairs: Vec<(i64, Rid)> = self
            .index
            .range_scan(lo, hi, lo_inclusive, hi_inclusive)?
            .collect::<Result<Vec<_>>>()?;
        let mut rows = Vec::with_capacity(pairs.len());
        for (_, rid) in pairs {
            match self.heap.get(rid) {
                Ok(row) => rows.push(row),
                Err(Error::NotFound) => {
                    log::warn!("range scan rid {rid} has no live heap row, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(rows)
    }

    /// Merges `changes` into the row at `pk`. Unknown columns are a
    /// `SchemaError`; changing the primary key column is `PkImmutable`.
    /// Returns `true` iff a row existed and was updated.
    pub fn update_by_pk(&mut self, pk: i64, changes: &[(String, Value)]) -> Result<bool> {
        let Some(rid) = self.index.search(pk)? else {
            return Ok(false);
        };
        let mut row = self.heap.get(rid)?;
        for (name, value) in changes {
            if name == self.schema.pk_name() {
                return Err(Error::PkImmutable);
            }
            if self.schema.get(name).is_none() {
                return Err(Error::schema(format!("no such column '{name}'")));
            }
            row.set(name, value.clone());
        }
        row.validate(&self.schema)?;
        self.heap.update(rid, &row)?;
        Ok(true)
    }

    /// Removes the index entry before the heap row; a failure between the
    /// two leaves the heap row unreachable but not corrupt.
    pub fn delete_by_pk(&mut self, pk: i64) -> Result<bool> {
        let Some(rid) = self.index.search(pk)? else {
            return Ok(false);
        };
        self.index.delete(pk)?;
        self.heap.delete(rid)?;
        Ok(true)
    }
}
