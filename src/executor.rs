//! Evaluates a parsed [`Statement`] against a [`Database`].

use crate::ast::{Cond, Columns, Op, Order, OrderBy, Statement};
use crate::database::Database;
use crate::error::{Error, Result};
use crate::value::{ColumnDef as ValueColumnDef, ColumnType, Row, Schema, Value};
use std::cmp::Ordering as CmpOrdering;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub kind: &'static str,
    pub affected_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecResult {
    Rows(Vec<Row>),
    Summary(Summary),
}

pub fn execute(db: &mut Database, statement: Statement, btree_order: u16) -> Result<ExecResult> {
    let description = format!("{statement:?}");
    run(db, statement, btree_order).map_err(|e| Error::in_statement(description, e))
}

fn run(db: &mut Database, statement: Statement, btree_order: u16) -> Result<ExecResult> {
    match statement {
        Statement::CreateTable { name, columns } => execute_create_table(db, name, columns, btree_order),
        Statement::DropTable { name } => execute_drop_table(db, name),
        Statement::Insert { table, values } => execute_insert(db, table, values),
        Statement::Select { cols, table, cond, order, limit } => {
            execute_select(db, cols, table, cond, order, limit)
        }
        Statement::Update { table, assignments, cond } => {
            execute_update(db, table, assignments, cond)
        }
        Statement::Delete { table, cond } => execute_delete(db, table, cond),
    }
}

fn execute_create_table(
    db: &mut Database,
    name: String,
    columns: Vec<crate::ast::ColumnDef>,
    btree_order: u16,
) -> Result<ExecResult> {
    let columns = columns
        .into_iter()
        .map(|c| ValueColumnDef { name: c.name, col_type: c.col_type })
        .collect();
    let schema = Schema::new(columns)?;
    db.create_table(&name, schema, btree_order)?;
    Ok(ExecResult::Summary(Summary { kind: "CREATE TABLE", affected_rows: 0 }))
}

fn execute_drop_table(db: &mut Database, name: String) -> Result<ExecResult> {
    db.drop_table(&name)?;
    Ok(ExecResult::Summary(Summary { kind: "DROP TABLE", affected_rows: 0 }))
}

fn execute_insert(db: &mut Database, table_name: String, values: Vec<Value>) -> Result<ExecResult> {
    let table = db.get_table(&table_name)?;
    if values.len() != table.schema.columns.len() {
        return Err(Error::schema(format!(
            "expected {} values, got {}",
            table.schema.columns.len(),
            values.len()
        )));
    }
    let mut pairs = Vec::with_capacity(values.len());
    for (col, value) in table.schema.columns.iter().zip(values.into_iter()) {
        let checked = typecheck(&col.col_type, value, &col.name)?;
        pairs.push((col.name.clone(), checked));
    }
    table.insert(Row::new(pairs))?;
    Ok(ExecResult::Summary(Summary { kind: "INSERT", affected_rows: 1 }))
}

fn typecheck(col_type: &ColumnType, value: Value, col_name: &str) -> Result<Value> {
    match (col_type, &value) {
        (ColumnType::Int, Value::Integer(_)) | (ColumnType::Text, Value::Text(_)) => Ok(value),
        _ => Err(Error::type_error(format!(
            "column '{col_name}' expects {col_type:?}, got {}",
            value.type_name()
        ))),
    }
}

fn execute_select(
    db: &mut Database,
    cols: Columns,
    table_name: String,
    cond: Option<Cond>,
    order: Option<OrderBy>,
    limit: Option<i64>,
) -> Result<ExecResult> {
    let table = db.get_table(&table_name)?;
    let schema = table.schema.clone();

    let mut rows = match fast_path(&cond, &schema) {
        FastPath::ByPk(pk) => table.select_by_pk(pk)?.into_iter().collect(),
        FastPath::Range { lo, hi, lo_inclusive, hi_inclusive } => {
            table.range_by_pk(lo, hi, lo_inclusive, hi_inclusive)?
        }
        FastPath::None => {
            let all = table.select_all()?;
            match &cond {
                Some(c) => all
                    .into_iter()
                    .filter(|row| eval_cond(c, row, &schema))
                    .collect(),
                None => all,
            }
        }
    };

    if let Some(OrderBy { col, order }) = &order {
        sort_rows(&mut rows, col, *order);
    }

    if let Some(limit) = limit {
        rows.truncate(limit.max(0) as usize);
    }

    let projected = match &cols {
        Columns::All => rows,
        Columns::Named(names) => rows.into_iter().map(|r| r.project(names)).collect(),
    };

    Ok(ExecResult::Rows(projected))
}

enum FastPath {
    ByPk(i64),
    Range { lo: Option<i64>, hi: Option<i64>, lo_inclusive: bool, hi_inclusive: bool },
    None,
}

/// Recognizes the two accelerated WHERE shapes: a single `pk = literal`
/// predicate, or an `AND`-only conjunction of pk bounds with no other
/// predicates. Anything else falls back to a full scan plus filter.
fn fast_path(cond: &Option<Cond>, schema: &Schema) -> FastPath {
    let Some(cond) = cond else { return FastPath::None };
    let pk = schema.pk_name();

    if let Cond::Pred { col, op: Op::Eq, literal: Value::Integer(v) } = cond {
        if col == pk {
            return FastPath::ByPk(*v);
        }
    }

    let preds: Vec<&Cond> = match cond {
        Cond::And(terms) => terms.iter().collect(),
        Cond::Pred { .. } => vec![cond],
        _ => return FastPath::None,
    };

    let mut lo = None;
    let mut hi = None;
    let mut lo_inclusive = true;
    let mut hi_inclusive = true;

    for pred in preds {
        let Cond::Pred { col, op, literal: Value::Integer(v) } = pred else {
            return FastPath::None;
        };
        if col != pk {
            return FastPath::None;
        }
        match op {
            Op::Gt => {
                lo = Some(*v);
                lo_inclusive = false;
            }
            Op::GtEq => {
                lo = Some(*v);
                lo_inclusive = true;
            }
            Op::Lt => {
                hi = Some(*v);
                hi_inclusive = false;
            }
            Op::LtEq => {
                hi = Some(*v);
                hi_inclusive = true;
            }
            _ => return FastPath::None,
        }
    }

    if lo.is_none() && hi.is_none() {
        return FastPath::None;
    }
    FastPath::Range { lo, hi, lo_inclusive, hi_inclusive }
}

/// Structural recursion over the condition tree; a cross-type comparison
/// excludes the row rather than erroring.
fn eval_cond(cond: &Cond, row: &Row, schema: &Schema) -> bool {
    match cond {
        Cond::Pred { col, op, literal } => eval_pred(col, op, literal, row, schema),
        Cond::And(terms) => terms.iter().all(|t| eval_cond(t, row, schema)),
        Cond::Or(terms) => terms.iter().any(|t| eval_cond(t, row, schema)),
    }
}

fn eval_pred(col: &str, op: &Op, literal: &Value, row: &Row, schema: &Schema) -> bool {
    if schema.get(col).is_none() {
        return false;
    }
    let Some(actual) = row.get(col) else { return false };
    let Some(ordering) = actual.partial_cmp_typed(literal) else { return false };
    match op {
        Op::Eq => ordering == CmpOrdering::Equal,
        Op::NotEq => ordering != CmpOrdering::Equal,
        Op::Lt => ordering == CmpOrdering::Less,
        Op::Gt => ordering == CmpOrdering::Greater,
        Op::LtEq => ordering != CmpOrdering::Greater,
        Op::GtEq => ordering != CmpOrdering::Less,
    }
}

/// Stable sort: integers numerically, text lexicographically by UTF-8 code unit.
fn sort_rows(rows: &mut [Row], col: &str, order: Order) {
    rows.sort_by(|a, b| {
        let ordering = match (a.get(col), b.get(col)) {
            (Some(Value::Integer(x)), Some(Value::Integer(y))) => x.cmp(y),
            (Some(Value::Text(x)), Some(Value::Text(y))) => x.cmp(y),
            _ => CmpOrdering::Equal,
        };
        match order {
            Order::Asc => ordering,
            Order::Desc => ordering.reverse(),
        }
    });
}

fn execute_update(
    db: &mut Database,
    table_name: String,
    assignments: Vec<(String, Value)>,
    cond: Option<Cond>,
) -> Result<ExecResult> {
    let table = db.get_table(&table_name)?;
    let schema = table.schema.clone();
    let pks = matching_pks(table, &cond, &schema)?;
    let mut affected = 0;
    for pk in pks {
        if table.update_by_pk(pk, &assignments)? {
            affected += 1;
        }
    }
    Ok(ExecResult::Summary(Summary { kind: "UPDATE", affected_rows: affected }))
}

fn execute_delete(db: &mut Database, table_name: String, cond: Option<Cond>) -> Result<ExecResult> {
    let table = db.get_table(&table_name)?;
    let schema = table.schema.clone();
    let pks = matching_pks(table, &cond, &schema)?;
    let mut affected = 0;
    for pk in pks {
        if table.delete_by_pk(pk)? {
            affected += 1;
        }
    }
    Ok(ExecResult::Summary(Summary { kind: "DELETE", affected_rows: affected }))
}

/// Collects the pks of rows matching `cond` up front so UPDATE/DELETE never
/// revisit a row mutated earlier in the same statement.
fn matching_pks(
    table: &mut crate::table::Table,
    cond: &Option<Cond>,
    schema: &Schema,
) -> Result<Vec<i64>> {
    match fast_path(cond, schema) {
        FastPath::ByPk(pk) => Ok(table.select_by_pk(pk)?.into_iter().map(|_| pk).collect()),
        FastPath::Range { lo, hi, lo_inclusive, hi_inclusive } => table
            .range_by_pk(lo, hi, lo_inclusive, hi_inclusive)?
            .iter()
            .map(|row| row.pk_value(schema))
            .collect(),
        FastPath::None => {
            let all = table.select_all()?;
            all.iter()
                .filter(|row| match cond {
                    Some(c) => eval_cond(c, row, schema),
                    None => true,
                })
                .map(|row| row.pk_value(schema))
                .collect()
        }
    }
}
