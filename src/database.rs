//! Owns the `Catalog` and a map of open `Table`s.
//!
//! Tables are opened lazily and kept open until `close`; the catalog is
//! the source of truth for which tables exist.

use crate::catalog::{Catalog, TableEntry};
use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::Schema;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub struct Database {
    data_dir: PathBuf,
    catalog: Catalog,
    tables: HashMap<String, Table>,
}

impl Database {
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        let catalog = Catalog::load(&data_dir)?;
        log::info!("database opened at {:?}", data_dir);
        Ok(Database {
            data_dir,
            catalog,
            tables: HashMap::new(),
        })
    }

    fn table_dir(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn create_table(&mut self, name: &str, schema: Schema, btree_order: u16) -> Result<()> {
        if self.catalog.contains(name) {
            return Err(Error::TableExists(name.to_string()));
        }
        let dir = self.table_dir(name);
        let result = (|| -> Result<()> {
            fs::create_dir_all(&dir)?;
            let table = Table::open(&dir, schema.clone(), btree_order)?;
            self.tables.insert(name.to_string(), table);
            self.catalog
                .add_table(name.to_string(), TableEntry { schema, btree_order })?;
            Ok(())
        })();

        if let Err(e) = result {
            // Roll back: a failed CREATE TABLE must not leave half-created files behind.
            self.tables.remove(name);
            let _ = fs::remove_dir_all(&dir);
            return Err(e);
        }
        log::info!("table '{name}' created");
        Ok(())
    }

    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        self.tables.remove(name);
        self.catalog.remove_table(name)?;
        fs::remove_dir_all(self.table_dir(name))?;
        log::info!("table '{name}' dropped");
        Ok(())
    }

    /// Opens the table lazily on first access.
    pub fn get_table(&mut self, name: &str) -> Result<&mut Table> {
        if !self.tables.contains_key(name) {
            let entry = self
                .catalog
                .get(name)
                .ok_or_else(|| Error::NoSuchTable(name.to_string()))?
                .clone();
            // The catalog is the source of truth for existence; missing
            // files at this point is a hard error, not a reason to
            // silently recreate them.
            let dir = self.table_dir(name);
            if !dir.join("heap.db").exists() {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("table '{name}' is missing its data files"),
                )));
            }
            let table = Table::open(&dir, entry.schema, entry.btree_order)?;
            self.tables.insert(name.to_string(), table);
        }
        Ok(self.tables.get_mut(name).unwrap())
    }

    pub fn table_exists(&self, name: &str) -> bool {
        self.catalog.contains(name)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.catalog.table_names().cloned().collect()
    }

    /// Every open table is implicitly released; callers hold no further
    /// handles to it afterward.
    pub fn close(&mut self) {
        self.tables.clear();
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        self.close();
    }
}
