//! Console access for the side-effecting builtins

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// ANSI sequence: erase the screen and move the cursor home
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Where `print`, `input`, `input_int` and `clear` read and write
pub trait Console {
    /// Write `line` followed by a newline
    fn write_line(&mut self, line: &str) -> io::Result<()>;

    /// Read one line without its line ending; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;

    fn clear(&mut self) -> io::Result<()>;
}

/// Process stdin/stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdConsole;

impl Console for StdConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}")?;
        out.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(strip_line_ending(line)))
    }

    fn clear(&mut self) -> io::Result<()> {
        let mut out = io::stdout().lock();
        write!(out, "{CLEAR_SCREEN}")?;
        out.flush()
    }
}

fn strip_line_ending(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}

#[derive(Debug, Default)]
struct Buffers {
    input: VecDeque<String>,
    output: String,
    clears: usize,
}

/// In-memory console with scripted input and captured output
///
/// Clones share the same buffers, so a test can keep one handle and give
/// the other to an interpreter.
#[derive(Debug, Default, Clone)]
pub struct BufferConsole {
    inner: Rc<RefCell<Buffers>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Console whose reads return `lines` in order
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::new();
        for line in lines {
            console.push_input(line);
        }
        console
    }

    pub fn push_input(&self, line: impl Into<String>) {
        self.inner.borrow_mut().input.push_back(line.into());
    }

    /// Everything written since the last clear
    pub fn output(&self) -> String {
        self.inner.borrow().output.clone()
    }

    /// Number of times the screen was cleared
    pub fn clears(&self) -> usize {
        self.inner.borrow().clears
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.output.push_str(line);
        inner.output.push('\n');
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.inner.borrow_mut().input.pop_front())
    }

    fn clear(&mut self) -> io::Result<()> {
        let mut inner = self.inner.borrow_mut();
        inner.output.clear();
        inner.clears += 1;
        Ok(())
    }
}
