use std::path::PathBuf;

use clap::Parser;

/// Arguments for the sync command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install everything from a remote registry:\n    \
                  packsync sync registry.json --source-base https://raw.githubusercontent.com/acme/workflows/main --all\n\n\
                  Add one item to what is already installed:\n    \
                  packsync sync registry.json --source-dir ../workflows --select finder\n\n\
                  Preview without touching the filesystem:\n    \
                  packsync sync registry.json --source-dir ../workflows --all --dry-run")]
pub struct SyncArgs {
    /// Path to the registry JSON document
    pub registry: PathBuf,

    /// Base URL of a raw-file HTTP content source
    #[arg(long, conflicts_with = "source_dir")]
    pub source_base: Option<String>,

    /// Path to a local content tree source
    #[arg(long, conflicts_with = "source_base")]
    pub source_dir: Option<PathBuf>,

    /// Optional companion config document (install paths, UI text)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Install into the project-local root instead of the global one
    #[arg(long)]
    pub local: bool,

    /// Desire every item in the registry
    #[arg(long)]
    pub all: bool,

    /// Add named items to the desired set (repeatable)
    #[arg(long)]
    pub select: Vec<String>,

    /// Drop named items from the desired set (repeatable)
    #[arg(long)]
    pub deselect: Vec<String>,

    /// Show the computed changes without applying them
    #[arg(long)]
    pub dry_run: bool,
}
