//! CLI definitions using clap derive API
//!
//! This module is organized into submodules for each command's argument types:
//! - sync: Sync command arguments
//! - scan: Scan command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};

pub mod completions;
pub mod list;
pub mod scan;
pub mod sync;

pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use scan::ScanArgs;
pub use sync::SyncArgs;

/// Packsync - declarative content sync for AI workflow registries
#[derive(Parser, Debug)]
#[command(
    name = "packsync",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Sync agent, skill, command and doc content between a registry and a local install tree",
    long_about = "Packsync reconciles a local directory tree against a declarative registry of \
                  content items (agents, skills, commands, docs, optionally grouped into packs): \
                  missing items are installed, present items refreshed, undesired items removed. \
                  It can also bootstrap a registry by scanning an existing content tree.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  packsync sync registry.json --source-base https://raw.githubusercontent.com/acme/workflows/main --all\n   \
                  packsync sync registry.json --source-dir ../workflows --local   \x1b[90m# project-local install\x1b[0m\n   \
                  packsync scan . --roots agents,skills --out registry.json       \x1b[90m# bootstrap a registry\x1b[0m\n   \
                  packsync list registry.json                                     \x1b[90m# items with install markers\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reconcile the local install tree against a registry
    Sync(SyncArgs),
    /// Scan a content tree and bootstrap a registry from it
    Scan(ScanArgs),
    /// List registry items with install markers
    List(ListArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}
