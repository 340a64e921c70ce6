mod cli;
mod repl;
mod rlpl;
mod rppl;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cli::{print_finished, print_running};
use dara_core::{
    environment::prelude::Environment,
    eval::{EvalConfig, Evaluator, DEFAULT_MAX_CALL_DEPTH},
    interpreter::{parse_module_from_file, run_module},
    utils::prelude::Error
};

#[derive(Parser)]
#[command(version, about = "Interpreter for the Dara language")]
struct Cli {
    /// Number of nested function calls allowed before evaluation fails
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_call_depth: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs Read Eval Print Loop
    Repl,
    /// Runs Read Lex Print Loop
    Rlpl,
    /// Runs Read Parse Print Loop
    Rppl,
    /// Parses and evaluates a source file
    Run {
        /// Path of source file
        path: PathBuf,
        /// Print ast before evaluating
        #[arg(long, default_value_t = false)]
        print_ast: bool,
    },
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = EvalConfig { max_call_depth: cli.max_call_depth };

    let res = match cli.command {
        Command::Repl => repl::start(config),
        Command::Rlpl => rlpl::start(),
        Command::Rppl => rppl::start(),
        Command::Run { path, print_ast } => {
            if let Err(err) = run(path, print_ast, config) {
                print_error(&err);
                std::process::exit(1);
            }

            Ok(())
        }
    };

    if let Err(err) = res {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(path: PathBuf, print_ast: bool, config: EvalConfig) -> Result<(), Error> {
    print_running(&path.to_string_lossy());
    let start = std::time::Instant::now();

    let module = parse_module_from_file(path)?;

    if print_ast {
        println!("{:#?}", module.program);
    }

    let result = run_module(&module, &Environment::new_env(), &mut Evaluator::new(config))?;

    println!("{}", result.describe());

    print_finished(std::time::Instant::now() - start);

    Ok(())
}

fn print_error(err: &Error) {
    let buf_writer = cli::stderr_buffer_writer();
    let mut buf = buf_writer.buffer();

    err.pretty(&mut buf);
    buf_writer
        .print(&buf)
        .expect("Writing error to stderr");
}

/// Installs a stderr subscriber, only when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
