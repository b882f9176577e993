use oursql::executor::{ExecResult, Summary};
use oursql::{Engine, EngineConfig};
use tempfile::tempdir;

fn engine() -> (tempfile::TempDir, Engine) {
    let dir = tempdir().unwrap();
    let engine = Engine::open(EngineConfig::default().with_data_dir(dir.path())).unwrap();
    (dir, engine)
}

#[test]
fn create_and_drop_table() {
    let (_dir, mut engine) = engine();

    let created = engine.execute("CREATE TABLE users (id INT, name TEXT)").unwrap();
    assert_eq!(created, ExecResult::Summary(Summary { kind: "CREATE TABLE", affected_rows: 0 }));

    let dropped = engine.execute("DROP TABLE users").unwrap();
    assert_eq!(dropped, ExecResult::Summary(Summary { kind: "DROP TABLE", affected_rows: 0 }));

    assert!(engine.execute("SELECT * FROM users").is_err());
}

#[test]
fn creating_duplicate_table_is_an_error() {
    let (_dir, mut engine) = engine();
    engine.execute("CREATE TABLE users (id INT, name TEXT)").unwrap();
    assert!(engine.execute("CREATE TABLE users (id INT, name TEXT)").is_err());
}

#[test]
fn dropping_missing_table_is_an_error() {
    let (_dir, mut engine) = engine();
    assert!(engine.execute("DROP TABLE ghost").is_err());
}

#[test]
fn first_column_must_be_int_primary_key() {
    let (_dir, mut engine) = engine();
    assert!(engine.execute("CREATE TABLE bad (name TEXT, id INT)").is_err());
}
