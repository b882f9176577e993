//! Abstract syntax tree produced by the parser and consumed by the executor.

use crate::value::{ColumnType, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cond {
    Pred { col: String, op: Op, literal: Value },
    And(Vec<Cond>),
    Or(Vec<Cond>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Order {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub col: String,
    pub order: Order,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Columns {
    All,
    Named(Vec<String>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub col_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select {
        cols: Columns,
        table: String,
        cond: Option<Cond>,
        order: Option<OrderBy>,
        limit: Option<i64>,
    },
    Insert {
        table: String,
        values: Vec<Value>,
    },
    Update {
        table: String,
        assignments: Vec<(String, Value)>,
        cond: Option<Cond>,
    },
    Delete {
        table: String,
        cond: Option<Cond>,
    },
    CreateTable {
        name: String,
        columns: Vec<ColumnDef>,
    },
    DropTable {
        name: String,
    },
}
