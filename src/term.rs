use std::io::{
    self,
    stdout,
    BufRead,
};

use crossterm::{
    style::Print,
    ExecutableCommand,
};
use durank::{
    style::Palette,
    ConfirmationProvider,
    Entry,
};

const PROMPT: &str = "delete item? (y/n)? ";

/// Asks the operator on the terminal. End of input or an answer which is not UTF-8 counts as "no".
pub struct TerminalPrompt {
    palette: Palette,
    input: Box<dyn BufRead>,
}

impl TerminalPrompt {
    pub fn new(palette: Palette, input: Box<dyn BufRead>) -> Self {
        Self { palette, input }
    }

    pub fn stdin(palette: Palette) -> Self {
        Self::new(palette, Box::new(io::stdin().lock()))
    }
}

impl ConfirmationProvider for TerminalPrompt {
    fn confirm(&mut self, entry: &Entry) -> io::Result<bool> {
        stdout().execute(Print(self.palette.warning(PROMPT)))?;

        let mut answer = Vec::new();
        if self.input.read_until(b'\n', &mut answer)? == 0 {
            log::debug!("Input closed, not removing {}", entry.path.display());
            stdout().execute(Print("\n"))?;
            return Ok(false);
        }

        Ok(is_affirmative(&String::from_utf8_lossy(&answer)))
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
