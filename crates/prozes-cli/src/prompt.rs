//! Terminal prompts.

use std::io::{self, BufRead, Write};

use crate::error::{CliError, CliResult};

/// `Prompter` asking for variable values on the terminal.
#[cfg(feature = "interactive")]
pub struct DialoguerPrompter;

#[cfg(feature = "interactive")]
impl prozes_core::application::Prompter for DialoguerPrompter {
    fn prompt(&self, variable: &str) -> prozes_core::error::ProzesResult<String> {
        dialoguer::Input::<String>::new()
            .with_prompt(format!("Value for {{{{{variable}}}}}"))
            .allow_empty(true)
            .interact_text()
            .map_err(|e| {
                prozes_core::application::ApplicationError::PromptFailed {
                    variable: variable.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }
}

/// Ask a yes/no question on stdin; anything but `y`/`yes` means no.
pub fn confirm(question: &str) -> CliResult<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .lock()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    Ok(is_yes(&input))
}

fn is_yes(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes("  YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }
}
