//! Shell completions command

use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::Result;

/// Write a completion script for the requested shell to stdout. Unknown
/// shells never reach here; the arg parser rejects them.
pub fn run(args: CompletionsArgs) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "packsync", &mut std::io::stdout().lock());
    Ok(())
}
