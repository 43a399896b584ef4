use clap::Parser;
use log::info;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as ReplResult};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use lox::{scan_and_parse, tokenize_string, Error, Interpreter, RuntimeError, Statement};

// sysexits.h
const EX_DATAERR: u8 = 65;
const EX_SOFTWARE: u8 = 70;
const EX_IOERR: u8 = 74;

#[cfg(feature = "with-file-history")]
const HISTORY_FILE: &str = ".lox_history";

#[derive(Parser)]
#[command(name = "lox", version, about = "Run a Lox script, or start an interactive session")]
struct Cli {
    /// Script to run (starts the REPL when omitted)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Print the token stream before running
    #[arg(long)]
    tokens: bool,

    /// Print the parsed syntax tree before running
    #[arg(long)]
    ast: bool,
}

enum Failure {
    Diagnostics,
    Runtime,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match &cli.script {
        Some(path) => run_script(&cli, path),
        None => match run_repl(&cli) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                ExitCode::from(EX_IOERR)
            }
        },
    }
}

fn run_script(cli: &Cli, path: &Path) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{}: {}", path.display(), err);
            return ExitCode::from(EX_IOERR);
        }
    };
    info!("running {}", path.display());
    let mut interpreter = Interpreter::new();
    let outcome = front_end(cli, &source).and_then(|statements| {
        interpreter.interpret(&statements).map_err(|err| {
            report_runtime(&err);
            Failure::Runtime
        })
    });
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure::Diagnostics) => ExitCode::from(EX_DATAERR),
        Err(Failure::Runtime) => ExitCode::from(EX_SOFTWARE),
    }
}

fn run_repl(cli: &Cli) -> ReplResult<()> {
    let mut rl = DefaultEditor::new()?;
    #[cfg(feature = "with-file-history")]
    if rl.load_history(HISTORY_FILE).is_err() {
        println!("No previous history.");
    }
    let mut interpreter = Interpreter::new();
    loop {
        let readline = rl.readline("> ");
        match readline {
            Ok(line) => {
                rl.add_history_entry(line.as_str())?;
                let Ok(statements) = front_end(cli, &line) else {
                    continue;
                };
                // A lone expression statement echoes its value.
                let result = match statements.as_slice() {
                    [Statement::Expression(expr)] => interpreter
                        .evaluate_expr(expr)
                        .map(|value| println!("{}", value)),
                    _ => interpreter.interpret(&statements),
                };
                if let Err(err) = result {
                    report_runtime(&err);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err),
        }
    }
    #[cfg(feature = "with-file-history")]
    rl.save_history(HISTORY_FILE)?;
    Ok(())
}

fn front_end(cli: &Cli, source: &str) -> Result<Vec<Statement>, Failure> {
    if cli.tokens {
        let (tokens, _) = tokenize_string(source);
        for token in tokens.iter() {
            println!("{}", token);
        }
    }
    let (statements, diagnostics) = scan_and_parse(source);
    if cli.ast {
        for statement in statements.iter() {
            println!("{}", statement);
        }
    }
    if diagnostics.is_empty() {
        Ok(statements)
    } else {
        report_diagnostics(&diagnostics);
        Err(Failure::Diagnostics)
    }
}

fn report_diagnostics(diagnostics: &[Error]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}

fn report_runtime(err: &RuntimeError) {
    match err.line() {
        Some(line) => eprintln!("{}\n[line {}]", err, line),
        None => eprintln!("{}", err),
    }
}
