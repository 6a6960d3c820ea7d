//! `scout completion` - Shell completion scripts.

use std::io::Write;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Generator, Shell};

use crate::cli::args::Cli;
use crate::output::{OutputType, Outputs};

/// Scripts only make sense as plain text.
pub const OUTPUTS: Outputs = Outputs::new(OutputType::Short, &[OutputType::Short]);

pub fn execute(shell: Shell) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_completions(shell, &mut out);
    out.flush()?;
    Ok(())
}

fn write_completions<G: Generator>(generator: G, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(generator, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash() {
        let out = script(Shell::Bash);
        assert!(out.contains("scout"));
        assert!(out.contains("complete"));
    }

    #[test]
    fn test_zsh() {
        assert!(script(Shell::Zsh).contains("compdef"));
    }

    #[test]
    fn test_fish_lists_subcommands() {
        let out = script(Shell::Fish);
        assert!(out.contains("aggregate"));
        assert!(out.contains("output-format"));
    }
}
