//! Vero CLI

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Once;
use vero::ast::SourceMap;
use vero::error::report_error;
use vero::repl::Repl;
use vero::{Config, Interpreter, VeroError};

#[derive(Parser)]
#[command(name = "vero", version, about = "Vero - a small dynamically typed scripting language")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Maximum call depth before "Maximum recursion depth exceeded"
    #[arg(long, global = true, env = "VERO_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Print the value of the last statement of each REPL line
    #[arg(long, global = true, env = "VERO_ECHO")]
    echo: bool,

    /// REPL history file
    #[arg(long, global = true, env = "VERO_HISTORY")]
    history: Option<PathBuf>,

    /// Do not read or write REPL history
    #[arg(long, global = true)]
    no_history: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive interpreter (default)
    Repl,
    /// Run a Vero script
    Run {
        /// Script to run
        file: PathBuf,
    },
    /// Tokenize and dump tokens (debug)
    Tokens {
        /// Source file to tokenize
        file: PathBuf,
    },
    /// Parse and dump the syntax tree as JSON (debug)
    Parse {
        /// Source file to parse
        file: PathBuf,
    },
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config::default().with_echo(self.echo);
        if let Some(depth) = self.max_depth {
            config = config.with_max_call_depth(depth);
        }
        if self.no_history {
            config = config.with_history_file(None);
        } else if let Some(path) = &self.history {
            config = config.with_history_file(Some(path.clone()));
        }
        config
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a stderr subscriber when `VERO_LOG` or `RUST_LOG` is set
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = EnvFilter::try_from_env("VERO_LOG").or_else(|_| EnvFilter::try_from_default_env());
        if let Ok(filter) = filter {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.config();

    let result = match cli.command {
        None | Some(Command::Repl) => start_repl(config),
        Some(Command::Run { file }) => run_file(&file, config),
        Some(Command::Tokens { file }) => tokenize_file(&file),
        Some(Command::Parse { file }) => parse_file(&file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn start_repl(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut repl = Repl::new(config)?;
    repl.run()?;
    Ok(())
}

fn run_file(path: &Path, config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let filename = path.display().to_string();

    let mut interpreter = Interpreter::new().with_config(config);
    if let Err(err) = interpreter.run(&filename, &source) {
        report_error(interpreter.sources(), &err)?;
        std::process::exit(1);
    }
    Ok(())
}

/// Read `path` into a fresh source map and tokenize it
fn load(path: &Path) -> Result<(SourceMap, Vec<vero::lexer::Token>), Box<dyn std::error::Error>> {
    let source = std::fs::read_to_string(path)?;
    let mut sources = SourceMap::new();
    let file = sources.add(path.display().to_string(), source.as_str());
    match vero::lexer::tokenize(file, &source) {
        Ok(tokens) => Ok((sources, tokens)),
        Err(err) => fail(&sources, &err),
    }
}

fn fail<T>(sources: &SourceMap, err: &VeroError) -> Result<T, Box<dyn std::error::Error>> {
    report_error(sources, err)?;
    std::process::exit(1);
}

fn tokenize_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (_, tokens) = load(path)?;
    for token in tokens {
        println!("{:?} @ {}", token.kind, token.span);
    }
    Ok(())
}

fn parse_file(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (sources, tokens) = load(path)?;
    match vero::parser::parse(tokens) {
        Ok(program) => {
            println!("{}", serde_json::to_string_pretty(&program)?);
            Ok(())
        }
        Err(err) => fail(&sources, &err),
    }
}
