//! Shell completion generation shared by all binaries.

use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;

/// Shells we can generate completions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellType {
    /// Bash
    Bash,
    /// Zsh
    Zsh,
    /// Fish
    Fish,
    /// `PowerShell`
    Powershell,
    /// Elvish
    Elvish,
}

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Self::Bash,
            ShellType::Zsh => Self::Zsh,
            ShellType::Fish => Self::Fish,
            ShellType::Powershell => Self::PowerShell,
            ShellType::Elvish => Self::Elvish,
        }
    }
}

/// Write completions for `A` to stdout.
pub fn generate_completions<A: CommandFactory>(shell: ShellType, bin_name: &str) {
    let mut cmd = A::command();
    clap_complete::generate(Shell::from(shell), &mut cmd, bin_name, &mut std::io::stdout());
}
