//! Interpreter and REPL settings

use std::path::PathBuf;

/// Default maximum call depth
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Default REPL prompt
pub const DEFAULT_PROMPT: &str = ">>> ";

const HISTORY_FILE: &str = ".vero_history";

/// Settings shared by the interpreter and the REPL
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Calls deeper than this raise "Maximum recursion depth exceeded"
    pub max_call_depth: usize,
    /// Print the value of the last statement after each REPL line
    pub echo_results: bool,
    /// REPL history location; `None` disables history
    pub history_file: Option<PathBuf>,
    pub prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            echo_results: false,
            history_file: home_dir().map(|home| home.join(HISTORY_FILE)),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Config {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo_results = echo;
        self
    }

    pub fn with_history_file(mut self, path: Option<PathBuf>) -> Self {
        self.history_file = path;
        self
    }
}

/// Get home directory
fn home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_call_depth, 10_000);
        assert!(!config.echo_results);
        assert_eq!(config.prompt, ">>> ");
        if let Some(path) = &config.history_file {
            assert!(path.ends_with(".vero_history"));
        }
    }

    #[test]
    fn test_builders() {
        let config = Config::default()
            .with_max_call_depth(50)
            .with_echo(true)
            .with_history_file(None);
        assert_eq!(config.max_call_depth, 50);
        assert!(config.echo_results);
        assert!(config.history_file.is_none());
    }
}
