use std::path::PathBuf;

use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List items with global install markers:\n    packsync list registry.json\n\n\
                  Check the project-local install tree:\n    packsync list registry.json --local")]
pub struct ListArgs {
    /// Path to the registry JSON document
    pub registry: PathBuf,

    /// Optional companion config document (install paths, UI text)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Check the project-local root instead of the global one
    #[arg(long)]
    pub local: bool,
}
