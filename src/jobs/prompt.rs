//! Interactive prompts for a single job.

use crate::error::TelgetError;
use std::io::{self, BufRead, ErrorKind, IsTerminal, Write};

/// Source of answers for interactive mode.
pub trait Prompter {
    /// Ask one question. `Ok(None)` means the user cancelled input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, TelgetError>;
}

/// Prompts on the controlling terminal, or reads plain lines when stdin is
/// piped.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, TelgetError> {
        use dialoguer::Input;

        if !io::stdin().is_terminal() {
            return LinePrompter::new(io::stdin().lock(), io::stdout()).ask(prompt);
        }

        match Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
        {
            Ok(answer) => Ok(Some(answer.trim().to_string())),
            Err(dialoguer::Error::IO(e))
                if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::UnexpectedEof) =>
            {
                Ok(None)
            }
            Err(e) => Err(TelgetError::PromptError(format!(
                "Failed to get user input: {}",
                e
            ))),
        }
    }
}

/// Writes the prompt to `output` and reads one line from `input`.
/// End of input counts as cancellation.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, prompt: &str) -> Result<Option<String>, TelgetError> {
        write!(self.output, "{}: ", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim().to_string())),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(None),
            Err(e) => Err(TelgetError::PromptError(format!(
                "Failed to read input: {}",
                e
            ))),
        }
    }
}
