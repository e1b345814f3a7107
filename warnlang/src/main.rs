//! warning-lang CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use warnlang::interp::Output;

#[derive(Parser)]
#[command(name = "warnlang", version, about = "warning-lang interpreter")]
struct Cli {
    /// Log pipeline stages (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a source file
    Run {
        /// Source file to run
        file: PathBuf,
        /// Write the parsed AST as JSON to this path
        #[arg(long)]
        dump_ast: Option<PathBuf>,
        /// Print the token stream before running
        #[arg(long)]
        dump_tokens: bool,
    },
    /// Parse and dump AST as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Start the interactive shell (default)
    Repl,
}

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber; later calls are no-ops
fn init_tracing(verbose: bool) {
    TRACING_INIT.call_once(|| {
        let default = if verbose { "warnlang=debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command.unwrap_or(Command::Repl) {
        Command::Run {
            file,
            dump_ast,
            dump_tokens,
        } => run_file(&file, dump_ast.as_deref(), dump_tokens),
        Command::Parse { file } => parse_file(&file),
        Command::Tokens { file } => tokenize_file(&file),
        Command::Repl => run_repl(),
    };

    if let Err(e) = result {
        if !e.is::<Reported>() {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Error already shown to the user; only the exit status is left to set
#[derive(Debug)]
struct Reported;

impl std::fmt::Display for Reported {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "aborted")
    }
}

impl std::error::Error for Reported {}

fn report(filename: &str, source: &str, error: warnlang::Error) -> Box<dyn std::error::Error> {
    let diagnostic = warnlang::Diagnostic::new(error, filename, source);
    report_diagnostic(filename, source, &diagnostic)
}

fn report_diagnostic(
    filename: &str,
    source: &str,
    diagnostic: &warnlang::Diagnostic,
) -> Box<dyn std::error::Error> {
    if let Err(io) = warnlang::error::report_error(filename, source, diagnostic) {
        tracing::warn!(%io, "ariadne rendering failed");
        eprint!("{diagnostic}");
    }
    Box::new(Reported)
}

fn run_file(path: &Path, dump_ast: Option<&Path>, dump_tokens: bool) -> CliResult {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    if dump_tokens || dump_ast.is_some() {
        let tokens = warnlang::lexer::tokenize(&source).map_err(|e| report(&filename, &source, e))?;
        if dump_tokens {
            print_tokens(&tokens);
        }
        if let Some(out) = dump_ast {
            let ast = warnlang::parser::parse(&tokens).map_err(|e| report(&filename, &source, e))?;
            std::fs::write(out, serde_json::to_string_pretty(&ast)?)?;
            tracing::debug!(path = %out.display(), "wrote AST dump");
        }
    }

    match warnlang::run(&filename, &source) {
        Ok(outputs) => {
            for output in outputs.iter().filter(|o| **o != Output::Empty) {
                println!("{output}");
            }
            Ok(())
        }
        Err(diagnostic) => Err(report_diagnostic(&filename, &source, &diagnostic)),
    }
}

fn parse_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = warnlang::lexer::tokenize(&source).map_err(|e| report(&filename, &source, e))?;
    let ast = warnlang::parser::parse(&tokens).map_err(|e| report(&filename, &source, e))?;

    println!("{}", serde_json::to_string_pretty(&ast)?);
    Ok(())
}

fn tokenize_file(path: &Path) -> CliResult {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let tokens = warnlang::lexer::tokenize(&source).map_err(|e| report(&filename, &source, e))?;
    print_tokens(&tokens);
    Ok(())
}

fn print_tokens(tokens: &[(warnlang::lexer::Token, warnlang::Span)]) {
    for (tok, span) in tokens {
        println!("{:?} @ {}..{}", tok, span.start, span.end);
    }
}

fn run_repl() -> CliResult {
    let mut repl = warnlang::repl::Repl::new()?;
    repl.run()?;
    Ok(())
}
