//! Line-oriented terminal I/O
//!
//! Every interactive step talks to the user through [`Prompter`], so the flow
//! can be driven from a script or a test buffer as well as a terminal.

use std::io::{self, BufRead, Write};

use crate::error::PromptError;

/// Line read/write surface
pub trait Prompter {
    /// Show `prompt` and read one line without its line terminator.
    ///
    /// End of input is a user abort and returns [`PromptError::Cancelled`].
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError>;

    /// Write one line of output
    fn say(&mut self, line: &str) -> Result<(), PromptError>;
}

/// [`Prompter`] over any reader/writer pair
pub struct LinePrompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

/// Strip the line terminator, treating a zero-byte read as end of input
fn finish_line(mut line: String, read: usize) -> Result<String, PromptError> {
    if read == 0 {
        return Err(PromptError::Cancelled);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(line)
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        write!(self.writer, "{}", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        finish_line(line, read)
    }

    fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }
}

/// [`Prompter`] over the process's stdin and stdout.
///
/// The stdin lock is taken for one read at a time, so a line editor on the
/// same thread can read stdin between prompts.
pub struct StdioPrompter {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl StdioPrompter {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdioPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for StdioPrompter {
    fn read_line(&mut self, prompt: &str) -> Result<String, PromptError> {
        let mut out = self.stdout.lock();
        write!(out, "{}", prompt)?;
        out.flush()?;
        drop(out);

        let mut line = String::new();
        let read = self.stdin.read_line(&mut line)?;
        finish_line(line, read)
    }

    fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.stdout, "{}", line)?;
        Ok(())
    }
}
