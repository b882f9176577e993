//! Top-level façade tying lexer, parser and executor to one open `Database`.

use crate::config::EngineConfig;
use crate::database::Database;
use crate::error::Result;
use crate::executor::{self, ExecResult};
use crate::lexer;
use crate::parser;

pub struct Engine {
    config: EngineConfig,
    db: Database,
}

impl Engine {
    pub fn open(config: EngineConfig) -> Result<Self> {
        let db = Database::open(&config.data_dir)?;
        log::info!("engine started (btree_order={})", config.btree_order);
        Ok(Engine { config, db })
    }

    /// Tokenizes, parses, and executes one SQL statement.
    pub fn execute(&mut self, sql: &str) -> Result<ExecResult> {
        let tokens = lexer::tokenize(sql)?;
        let statement = parser::parse(tokens)?;
        executor::execute(&mut self.db, statement, self.config.btree_order)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.db.table_names()
    }

    pub fn close(&mut self) {
        self.db.close();
    }
}
