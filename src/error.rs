//! Structured error kinds shared by every layer of the engine.
//!
//! The storage layers (`pager`, `heap`, `btree`, `catalog`, `table`,
//! `database`) and the SQL front end (`lexer`, `parser`, `executor`) all
//! return `Result<T, Error>`. The executor wraps whatever bubbles up from
//! below in `Error::Execution` so callers see one error at the statement
//! boundary while still being able to match on the original kind.

/// The two-way split of a parser failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unexpected token: {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of input")]
    UnexpectedEof,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("page {id} out of range (file has {page_count} pages)")]
    OutOfRange { id: u32, page_count: u32 },

    #[error("row of {len} bytes does not fit in the slot (in-place update only)")]
    RowTooLarge { len: usize },

    #[error("duplicate key: {0}")]
    DuplicateKey(i64),

    #[error("not found")]
    NotFound,

    #[error("schema error: {0}")]
    Schema(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("primary key column is immutable")]
    PkImmutable,

    #[error("table '{0}' already exists")]
    TableExists(String),

    #[error("no such table: '{0}'")]
    NoSuchTable(String),

    #[error("lex error: {0}")]
    Lex(String),

    #[error("parse error: {0}")]
    Parse(ParseErrorKind),

    #[error("failed to serialize row: {0}")]
    Encoding(String),

    #[error("{statement}: {source}")]
    Execution {
        statement: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Decorate a lower-level error with the statement that triggered it,
    /// keeping the original error reachable through `std::error::Error::source`.
    pub fn in_statement(statement: impl Into<String>, source: Error) -> Error {
        Error::Execution {
            statement: statement.into(),
            source: Box::new(source),
        }
    }

    pub fn schema(msg: impl Into<String>) -> Error {
        Error::Schema(msg.into())
    }

    pub fn type_error(msg: impl Into<String>) -> Error {
        Error::Type(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
