mod repl;

use clap::Parser as ClapParser;
use oursql::{Engine, EngineConfig};
use std::path::PathBuf;
use std::process::ExitCode;

/// OurSQL — a small disk-backed SQL engine with an interactive shell.
#[derive(ClapParser, Debug)]
#[command(name = "oursql", version, about)]
struct Cli {
    /// Directory holding catalog.json and per-table heap/index files.
    #[arg(long, default_value = "./oursql_data")]
    data_dir: PathBuf,

    /// B+Tree branching parameter used for newly created tables.
    #[arg(long, default_value_t = oursql::btree::DEFAULT_ORDER)]
    btree_order: u16,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let config = EngineConfig::default()
        .with_data_dir(cli.data_dir)
        .with_btree_order(cli.btree_order);

    let mut engine = match Engine::open(config) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("failed to open database: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("OurSQL — type .help for commands, .quit to exit");
    let code = repl::run_stdin(&mut engine);
    engine.close();
    ExitCode::from(code as u8)
}
