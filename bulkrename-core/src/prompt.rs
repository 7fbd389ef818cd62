use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Synchronous confirmation capability injected into the category filter and
/// the preview gate. Tests supply canned responses instead of console I/O.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Production confirmer: prints the prompt and blocks on one line of stdin.
/// Only a case-insensitive `y`/`yes` counts as affirmative.
pub struct StdinConfirmer;

impl Confirm for StdinConfirmer {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        print!("{prompt}");
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        io::stdin()
            .lock()
            .read_line(&mut input)
            .context("Failed to read user input")?;

        Ok(is_affirmative(&input))
    }
}

fn is_affirmative(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
