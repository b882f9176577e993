use oursql::executor::ExecResult;
use oursql::value::{Row, Value};
use oursql::{Engine, EngineConfig};
use tempfile::tempdir;

fn engine() -> (tempfile::TempDir, Engine) {
    let dir = tempdir().unwrap();
    let engine = Engine::open(EngineConfig::default().with_data_dir(dir.path())).unwrap();
    (dir, engine)
}

fn rows_of(result: ExecResult) -> Vec<Row> {
    match result {
        ExecResult::Rows(rows) => rows,
        other => panic!("expected rows, got {other:?}"),
    }
}

#[test]
fn select_star_preserves_schema_order() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    engine.execute("INSERT INTO u VALUES (1, 'Alice')").unwrap();
    engine.execute("INSERT INTO u VALUES (2, 'Bob')").unwrap();

    let rows = rows_of(engine.execute("SELECT * FROM u").unwrap());
    assert_eq!(
        rows,
        vec![
            Row::new(vec![("id".into(), Value::Integer(1)), ("name".into(), Value::Text("Alice".into()))]),
            Row::new(vec![("id".into(), Value::Integer(2)), ("name".into(), Value::Text("Bob".into()))]),
        ]
    );
}

#[test]
fn select_named_columns_projects_in_requested_order() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    engine.execute("INSERT INTO u VALUES (1, 'Alice')").unwrap();

    let rows = rows_of(engine.execute("SELECT name, id FROM u").unwrap());
    assert_eq!(rows, vec![Row::new(vec![("name".into(), Value::Text("Alice".into())), ("id".into(), Value::Integer(1))])]);
}

#[test]
fn where_equality_on_pk_uses_the_index() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    for id in 1..=10i64 {
        engine.execute(&format!("INSERT INTO u VALUES ({id}, 'x')")).unwrap();
    }
    let rows = rows_of(engine.execute("SELECT * FROM u WHERE id = 7").unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::Integer(7)));
}

#[test]
fn where_on_non_pk_column_falls_back_to_a_scan() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    engine.execute("INSERT INTO u VALUES (1, 'Alice')").unwrap();
    engine.execute("INSERT INTO u VALUES (2, 'Bob')").unwrap();
    let rows = rows_of(engine.execute("SELECT * FROM u WHERE name = 'Bob'").unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("id"), Some(&Value::Integer(2)));
}

#[test]
fn range_scan_with_gap_left_by_deletes() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    for id in 1..=50i64 {
        engine.execute(&format!("INSERT INTO u VALUES ({id}, 'x')")).unwrap();
    }
    for id in (2..=50i64).step_by(2) {
        engine.execute(&format!("DELETE FROM u WHERE id = {id}")).unwrap();
    }
    let rows = rows_of(engine.execute("SELECT * FROM u WHERE id > 10 AND id < 20").unwrap());
    let ids: Vec<i64> = rows.iter().map(|r| r.get("id").unwrap().as_i64().unwrap()).collect();
    assert_eq!(ids, vec![11, 13, 15, 17, 19]);
}

#[test]
fn order_by_desc_then_limit() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    for (i, name) in ["z", "y", "x", "w", "v", "u", "t", "s", "r", "q"].iter().enumerate() {
        engine.execute(&format!("INSERT INTO u VALUES ({}, '{}')", i + 1, name)).unwrap();
    }
    let rows = rows_of(engine.execute("SELECT * FROM u ORDER BY name DESC LIMIT 2").unwrap());
    let ids: Vec<i64> = rows.iter().map(|r| r.get("id").unwrap().as_i64().unwrap()).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn cross_type_comparison_excludes_the_row_rather_than_erroring() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE u (id INT, name TEXT)").unwrap();
    engine.execute("INSERT INTO u VALUES (1, 'Alice')").unwrap();
    let rows = rows_of(engine.execute("SELECT * FROM u WHERE name = 1").unwrap());
    assert!(rows.is_empty());
}
