//! Completions command.

use clap::CommandFactory;
use clap_complete::Shell as CompletionShell;
use std::io::Write;

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn execute(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    clap_complete::generate(CompletionShell::from(shell), &mut cmd, bin, out);
    out.flush()?;
    Ok(())
}
