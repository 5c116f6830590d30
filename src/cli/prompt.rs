//! Interactive disambiguation
//!
//! Lists the candidates on stderr, numbered from 1, and reads the answer
//! from stdin. Anything other than a valid number aborts; there is no retry.

use std::io::{self, BufRead, Write};

use tracing::warn;

use super::render::Palette;
use crate::domain::{Candidate, Chooser};

/// [`Chooser`] that asks on a terminal
pub struct TerminalChooser<R, W> {
    input: R,
    output: W,
    palette: Palette,
}

impl TerminalChooser<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr and reads stdin
    pub fn stdio(palette: Palette) -> Self {
        Self::new(io::stdin().lock(), io::stderr(), palette)
    }
}

impl<R: BufRead, W: Write> TerminalChooser<R, W> {
    pub fn new(input: R, output: W, palette: Palette) -> Self {
        Self {
            input,
            output,
            palette,
        }
    }

    fn ask(&mut self, candidates: &[Candidate]) -> io::Result<Option<usize>> {
        writeln!(self.output, "Several tasks match:")?;
        for (n, candidate) in candidates.iter().enumerate() {
            writeln!(
                self.output,
                "{:>4}) @{} {} {}",
                n + 1,
                self.palette.heading(&candidate.board),
                self.palette.muted(&format!("{}.", candidate.id)),
                candidate.text
            )?;
        }
        write!(self.output, "Select a task [1-{}]: ", candidates.len())?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Ok(None);
        }

        Ok(answer
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|&n| n >= 1 && n <= candidates.len())
            .map(|n| n - 1))
    }
}

impl<R: BufRead, W: Write> Chooser for TerminalChooser<R, W> {
    fn choose(&mut self, candidates: &[Candidate]) -> Option<usize> {
        match self.ask(candidates) {
            Ok(choice) => choice,
            Err(e) => {
                warn!(error = %e, "failed to read selection");
                None
            }
        }
    }
}
