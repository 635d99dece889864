//! Interactive prompts

use std::io::{self, Write};

use anyhow::Result;

/// Whether stdin is a terminal a prompt can be answered on
pub fn is_interactive() -> bool {
    atty::is(atty::Stream::Stdin)
}

/// Ask for a yes/no confirmation
///
/// Returns false without asking when stdin is not a terminal.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !is_interactive() {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(is_yes(&input))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
