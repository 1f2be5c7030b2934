//! REPL (Read-Eval-Print Loop) for Vero

use crate::config::Config;
use crate::interp::{Interpreter, Value, ValueKind};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};

/// Source name used for lines typed at the prompt
pub const STDIN_SOURCE: &str = "<stdin>";

/// What the loop should do after a line
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Keep reading; the text, if any, is to be printed
    Continue(Option<String>),
    /// Leave the loop
    Exit,
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    session: Session,
}

impl Repl {
    /// Create a new REPL
    pub fn new(config: Config) -> RlResult<Self> {
        let mut editor = DefaultEditor::new()?;

        // Load history if available
        if let Some(path) = &config.history_file {
            let _ = editor.load_history(path);
        }

        let interpreter = Interpreter::new().with_config(config);
        Ok(Repl {
            editor,
            session: Session::new(interpreter),
        })
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("Vero {}", env!("CARGO_PKG_VERSION"));
        println!("Type :help for help, exit or :quit to leave.\n");

        let prompt = self.session.interpreter.config().prompt.clone();
        loop {
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    match self.session.handle_line(&line) {
                        Outcome::Continue(Some(text)) => println!("{text}"),
                        Outcome::Continue(None) => {}
                        Outcome::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        // Save history
        if let Some(path) = &self.session.interpreter.config().history_file {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }
}

/// Line handling, separate from the terminal so it can be driven directly
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new(interpreter: Interpreter) -> Self {
        Session { interpreter }
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Evaluate one input line
    pub fn handle_line(&mut self, line: &str) -> Outcome {
        let line = line.trim();
        if line.is_empty() {
            return Outcome::Continue(None);
        }

        // Handle commands
        if line == "exit" || line.starts_with(':') {
            return self.handle_command(line);
        }

        match self.interpreter.run(STDIN_SOURCE, line) {
            Ok(value) if self.interpreter.config().echo_results => {
                Outcome::Continue(Some(last_statement(value).to_string()))
            }
            Ok(_) => Outcome::Continue(None),
            Err(err) => Outcome::Continue(Some(err.render(self.interpreter.sources()))),
        }
    }

    /// Handle REPL commands (starting with :)
    fn handle_command(&mut self, cmd: &str) -> Outcome {
        match cmd {
            "exit" | ":quit" | ":q" => Outcome::Exit,
            ":help" | ":h" | ":?" => Outcome::Continue(Some(HELP.trim_end().to_string())),
            ":clear" => {
                let cleared = self.interpreter.run(STDIN_SOURCE, "clear()");
                match cleared {
                    Ok(_) => Outcome::Continue(None),
                    Err(err) => Outcome::Continue(Some(err.render(self.interpreter.sources()))),
                }
            }
            _ => Outcome::Continue(Some(format!(
                "Unknown command: {cmd}\nType :help for help."
            ))),
        }
    }
}

/// Value of the final statement of a program
fn last_statement(program: Value) -> Value {
    match program.kind {
        ValueKind::List(mut values) => values.pop().unwrap_or_else(Value::null),
        _ => program,
    }
}

const HELP: &str = "\
Vero REPL Commands:
  :help, :h, :?   Show this help
  :quit, :q, exit Leave the REPL
  :clear          Clear the screen

You can enter:
  - Expressions: 1 + 2 * 3, \"ab\" * 2, [1, 2] + [3]
  - Bindings: let x = 10
  - Functions: func square(x) { x * x }
  - Loops: for i = 0 to 5 { i }, while x < 10 { let x = x + 1 }

Built-in functions:
  print(...)          Print values followed by a newline
  input(), input_int() Read a line from the console
  append, pop, extend, len, is_number, is_string, is_list, is_function
  run(\"file\")         Run a script in the current session
";
