use std::{io, path::PathBuf, process::ExitCode};

use anyhow::{Result, bail};
use clap::{ArgAction, Parser};
use lamb::{FsLoader, Outcome, Runner};
use rustyline::{Editor, error::ReadlineError};
use tracing::{Level, error};

/// Step-by-step untyped lambda calculus reducer.
///
/// Without arguments an interactive prompt is started.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Program file to run.
    #[arg(conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Run the given code instead of a file.
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Directory that `#use NAME` loads `NAME.la` from.
    #[arg(long, value_name = "DIR", default_value = ".")]
    lib_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

const fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

fn repl(runner: &mut Runner<FsLoader>) -> Result<()> {
    let mut editor = Editor::<()>::new();
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                editor.add_history_entry(line.as_str());
                if let Err(e) = runner.run(&line, &mut io::stdout().lock()) {
                    error!("{e:#}");
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break Ok(()),
            Err(e) => bail!(e),
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level(cli.verbose))
        .without_time()
        .init();

    let mut runner = Runner::new(FsLoader::new(&cli.lib_dir));
    let mut out = io::stdout().lock();
    let outcome = match (&cli.eval, &cli.file) {
        (Some(code), _) => runner.run(code, &mut out)?,
        (None, Some(file)) => runner.run_file(file, &mut out)?,
        (None, None) => {
            drop(out);
            repl(&mut runner)?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    Ok(match outcome {
        Outcome::Rejected(_) => ExitCode::FAILURE,
        Outcome::Empty | Outcome::Normalized { .. } => ExitCode::SUCCESS,
    })
}
