//! Target path resolution and installed-state detection
//!
//! Prefixed item types (agents, skills, commands by default) install under
//! the mode's install root; unprefixed types (docs) land beside the
//! project's own files, relative to the current working directory. That
//! indirection is policy, carried by [`InstallConfig`], not hard-coded.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::InstallConfig;
use crate::registry::Item;

/// Global (user-wide) vs local (project-relative) install destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMode {
    Global,
    Local,
}

/// Resolve the absolute install path for an item.
pub fn resolve_target(item: &Item, mode: InstallMode, policy: &InstallConfig) -> PathBuf {
    if policy.is_prefixed(item.kind) {
        let base = match mode {
            InstallMode::Global => &policy.global_dir,
            InstallMode::Local => &policy.local_dir,
        };
        return base.join(&item.target);
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(&item.target)
}

/// Test filesystem presence for each item, producing the installed set of
/// item keys.
pub fn find_installed<'a>(
    items: impl IntoIterator<Item = &'a Item>,
    mode: InstallMode,
    policy: &InstallConfig,
) -> HashSet<String> {
    items
        .into_iter()
        .filter(|item| resolve_target(item, mode, policy).exists())
        .map(Item::key)
        .collect()
}
