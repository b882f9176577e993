//! Line-oriented REPL: the external collaborator around [`oursql::Engine`].
//!
//! Non-dot lines are SQL statements terminated by newline (optionally a
//! trailing `;`); dot-commands (`.tables`, `.help`, `.quit`) are handled
//! here, outside the executor. This module owns presentation only — no
//! engine invariant depends on anything written here.

use oursql::executor::{ExecResult, Summary};
use oursql::value::Row;
use oursql::Engine;
use std::io::{self, BufRead, Write};

pub fn run(engine: &mut Engine, mut input: impl BufRead, mut output: impl Write) -> i32 {
    loop {
        write!(output, "oursql> ").ok();
        output.flush().ok();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => {
                writeln!(output).ok();
                return 0;
            }
            Ok(_) => {}
            Err(e) => {
                writeln!(output, "io error: {e}").ok();
                return 1;
            }
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            ".quit" => return 0,
            ".help" => {
                writeln!(output, "{}", HELP_TEXT).ok();
                continue;
            }
            ".tables" => {
                for name in engine.table_names() {
                    writeln!(output, "{name}").ok();
                }
                continue;
            }
            _ => {}
        }

        match engine.execute(line) {
            Ok(result) => print_result(&mut output, result),
            Err(e) => {
                writeln!(output, "Error: {e}").ok();
            }
        }
    }
}

const HELP_TEXT: &str = ".tables   list tables\n.help     show this message\n.quit     exit";

fn print_result(output: &mut impl Write, result: ExecResult) {
    match result {
        ExecResult::Rows(rows) => print_rows(output, &rows),
        ExecResult::Summary(Summary { kind, affected_rows }) => {
            writeln!(output, "{kind} ({affected_rows} row(s) affected)").ok();
        }
    }
}

fn print_rows(output: &mut impl Write, rows: &[Row]) {
    if rows.is_empty() {
        writeln!(output, "(0 rows)").ok();
        return;
    }
    for row in rows {
        let rendered: Vec<String> = row.0.iter().map(|(_, v)| v.to_string()).collect();
        writeln!(output, "{}", rendered.join("\t")).ok();
    }
}

pub fn run_stdin(engine: &mut Engine) -> i32 {
    let stdin = io::stdin();
    run(engine, stdin.lock(), io::stdout())
}
