//! Packsync - declarative content sync for AI workflow registries
//!
//! Reconciles a local install tree against a declarative registry of typed
//! content items (agents, skills, commands, docs), and bootstraps such a
//! registry by scanning an existing content tree.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod diff;
mod error;
mod progress;
mod registry;
mod scanner;
mod selection;
mod session;
mod source;
mod sync;
mod target;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run(args),
        Commands::Scan(args) => commands::scan::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
