use std::path::PathBuf;

use clap::Parser;

/// Arguments for the scan command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Print the classified tree of a content repo:\n    \
                  packsync scan ../workflows --roots agents,skills,docs\n\n\
                  Bootstrap a registry from everything found:\n    \
                  packsync scan ../workflows --roots agents --name acme-workflows --out registry.json")]
pub struct ScanArgs {
    /// Root directory of the content tree
    pub dir: PathBuf,

    /// Comma-separated top-level subtrees to scan (defaults to every
    /// non-hidden directory under the root)
    #[arg(long, value_delimiter = ',')]
    pub roots: Vec<String>,

    /// Directories to treat as explicit pack roots (repeatable)
    #[arg(long)]
    pub pack: Vec<String>,

    /// Registry name to write
    #[arg(long, default_value = "scanned")]
    pub name: String,

    /// Write a bootstrapped registry JSON document here
    #[arg(long)]
    pub out: Option<PathBuf>,
}
