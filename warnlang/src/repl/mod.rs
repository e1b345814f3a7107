//! REPL (Read-Eval-Print Loop) for warning-lang

use crate::interp::Output;
use crate::Session;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "warning-lang> ";
const HISTORY_FILE: &str = ".warnlang_history";
const SOURCE_NAME: &str = "<stdin>";

/// What to do after a line of input
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Continue,
    Quit,
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
    history_path: Option<PathBuf>,
}

impl Repl {
    /// Create a new REPL
    pub fn new() -> RlResult<Self> {
        let editor = DefaultEditor::new()?;

        // Try to find history file in home directory
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            session: Session::new(),
            history_path,
        };

        if let Some(ref path) = repl.history_path
            && let Err(err) = repl.editor.load_history(path)
        {
            tracing::debug!(%err, path = %path.display(), "no history loaded");
        }

        Ok(repl)
    }

    fn record_history(&mut self, line: &str) {
        if let Err(err) = self.editor.add_history_entry(line) {
            tracing::warn!(%err, "failed to record history entry");
        }
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("warning-lang {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    self.record_history(line);

                    if self.handle_line(line) == Action::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Goodbye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path
            && let Err(err) = self.editor.save_history(path)
        {
            tracing::warn!(%err, path = %path.display(), "failed to save history");
        }

        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Action {
        if line == "exit" || line.starts_with(':') {
            return self.handle_command(line);
        }
        match self.session.run_line(SOURCE_NAME, line) {
            Ok(outputs) => {
                for output in outputs.iter().filter(|o| **o != Output::Empty) {
                    println!("{output}");
                }
            }
            Err(diagnostic) => eprint!("{diagnostic}"),
        }
        Action::Continue
    }

    /// Handle REPL commands (starting with :)
    fn handle_command(&mut self, cmd: &str) -> Action {
        match cmd {
            ":quit" | ":q" | ":exit" | "exit" => {
                println!("Goodbye!");
                return Action::Quit;
            }
            ":help" | ":h" | ":?" => self.print_help(),
            ":clear" => print!("\x1B[2J\x1B[1;1H"),
            ":vars" => {
                for (name, binding) in self.session.scope().bindings() {
                    let marker = if binding.is_const { " const" } else { "" };
                    println!("  {name}{marker} = {}", binding.value);
                }
            }
            ":reset" => {
                self.session.reset();
                println!("Bindings cleared.");
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
            }
        }
        Action::Continue
    }

    /// Print help message
    fn print_help(&self) {
        println!("warning-lang REPL Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :quit, :q, exit Exit the REPL");
        println!("  :clear          Clear the screen");
        println!("  :vars           List bindings");
        println!("  :reset          Forget all bindings");
        println!();
        println!("You can enter:");
        println!("  - Declarations: i32 x = 5;  u8 const limit = 200;");
        println!("  - Expressions: x * 2 + 1;");
        println!("  - Updates: x++;  incr x by 3;  div x by 2;");
        println!("  - Control flow: if x > 3 {{ x; }} else {{ 0; }}");
        println!("  - Loops: for i in 0...5 {{ i; }}  while x > 0 {{ x--; }}");
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}
