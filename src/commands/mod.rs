//! Command implementations
//!
//! Each CLI subcommand has a runner here; shared loading logic lives in
//! `helpers`.

pub mod completions;
pub mod helpers;
pub mod list;
pub mod scan;
pub mod sync;
