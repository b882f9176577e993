//! Table-schema directory persisted alongside the data directory.
//!
//! Reads the whole thing as JSON, defaults to empty if the file is absent,
//! writes back as pretty JSON. Only schema metadata lives here; row data
//! lives in each table's own heap and index files.

use crate::error::{Error, Result};
use crate::value::Schema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    pub schema: Schema,
    pub btree_order: u16,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogDoc {
    tables: HashMap<String, TableEntry>,
}

pub struct Catalog {
    path: PathBuf,
    doc: CatalogDoc,
}

impl Catalog {
    /// Missing catalog file is treated as an empty catalog.
    pub fn load(data_dir: impl AsRef<Path>) -> Result<Self> {
        let path = data_dir.as_ref().join("catalog.json");
        let doc = if path.exists() {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text).map_err(|e| Error::Encoding(e.to_string()))?
        } else {
            CatalogDoc::default()
        };
        log::debug!("catalog loaded from {:?}, {} tables", path, doc.tables.len());
        Ok(Catalog { path, doc })
    }

    /// Write-temp-then-rename so a crash mid-write can't corrupt the file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&self.doc).map_err(|e| Error::Encoding(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TableEntry> {
        self.doc.tables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.doc.tables.contains_key(name)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &String> {
        self.doc.tables.keys()
    }

    pub fn add_table(&mut self, name: String, entry: TableEntry) -> Result<()> {
        if self.doc.tables.contains_key(&name) {
            return Err(Error::TableExists(name));
        }
        self.doc.tables.insert(name, entry);
        self.save()
    }

    pub fn remove_table(&mut self, name: &str) -> Result<()> {
        if self.doc.tables.remove(name).is_none() {
            return Err(Error::NoSuchTable(name.to_string()));
        }
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{ColumnDef, ColumnType};
    use tempfile::tempdir;

    fn schema() -> Schema {
        Schema::new(vec![
            ColumnDef { name: "id".into(), col_type: ColumnType::Int },
            ColumnDef { name: "name".into(), col_type: ColumnType::Text },
        ])
        .unwrap()
    }

    #[test]
    fn missing_catalog_is_empty() {
        let dir = tempdir().unwrap();
        let catalog = Catalog::load(dir.path()).unwrap();
        assert_eq!(catalog.table_names().count(), 0);
    }

    #[test]
    fn add_then_reload_round_trips() {
        let dir = tempdir().unwrap();
        {
            let mut catalog = Catalog::load(dir.path()).unwrap();
            catalog
                .add_table("users".into(), TableEntry { schema: schema(), btree_order: 4 })
                .unwrap();
        }
        let catalog = Catalog::load(dir.path()).unwrap();
        assert!(catalog.contains("users"));
        assert_eq!(catalog.get("users").unwrap().schema, schema());
    }

    #[test]
    fn adding_duplicate_table_fails() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::load(dir.path()).unwrap();
        catalog
            .add_table("users".into(), TableEntry { schema: schema(), btree_order: 4 })
            .unwrap();
        assert!(matches!(
            catalog.add_table("users".into(), TableEntry { schema: schema(), btree_order: 4 }),
            Err(Error::TableExists(_))
        ));
    }

    #[test]
    fn removing_missing_table_fails() {
        let dir = tempdir().unwrap();
        let mut catalog = Catalog::load(dir.path()).unwrap();
        assert!(matches!(catalog.remove_table("ghost"), Err(Error::NoSuchTable(_))));
    }
}
