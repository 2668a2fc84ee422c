use crate::error::{EnvonError, Result};
use anstream::AutoStream;
use owo_colors::OwoColorize;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

/// Disambiguates between several candidate environments.
///
/// Holds the input and the diagnostics stream explicitly so the prompt never reaches
/// stdout, which callers capture with `$(...)`.
pub struct Selector<R, W> {
    interactive: bool,
    input: R,
    output: W,
}

impl Selector<io::StdinLock<'static>, AutoStream<io::Stderr>> {
    /// Prompts on the process's own stdin and stderr.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        Selector::new(
            stdin.is_terminal(),
            stdin.lock(),
            AutoStream::auto(io::stderr()),
        )
    }
}

impl<R: BufRead, W: Write> Selector<R, W> {
    pub fn new(interactive: bool, input: R, output: W) -> Self {
        Selector {
            interactive,
            input,
            output,
        }
    }

    /// Picks one of `candidates`, found in `context`.
    ///
    /// Without a terminal this fails immediately with the numbered list, rather than
    /// waiting on input that cannot arrive.
    pub fn choose(&mut self, candidates: &[PathBuf], context: &str) -> Result<PathBuf> {
        let listing = candidates
            .iter()
            .enumerate()
            .map(|(i, path)| format!("  {}) {}", i + 1, path.display()))
            .collect::<Vec<_>>()
            .join("\n");

        if !self.interactive {
            return Err(EnvonError::Ambiguous(format!(
                "Multiple virtual environments found in {context}. Choose one by passing a path or name:\n{listing}"
            )));
        }

        writeln!(
            self.output,
            "Multiple virtual environments found in {}:",
            context.blue()
        )?;
        writeln!(self.output, "{listing}")?;

        loop {
            write!(self.output, "Select [1-{}]: ", candidates.len())?;
            self.output.flush()?;

            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) | Err(_) => return Err(EnvonError::Ambiguous("Aborted.".to_string())),
                Ok(_) => {}
            }

            let selection = line.trim();
            if selection.is_empty() {
                continue;
            }
            match selection.parse::<usize>() {
                Ok(index) if (1..=candidates.len()).contains(&index) => {
                    return Ok(candidates[index - 1].clone());
                }
                _ => writeln!(self.output, "{}", "Invalid selection.".red())?,
            }
        }
    }
}
