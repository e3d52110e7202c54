//! Sync session
//!
//! One owned object carrying a loaded registry, its node tree and the
//! selection state through the scan/load -> select -> diff -> sync
//! pipeline. The diff stage borrows it read-only; the sync stage reads it
//! and reports outcomes. Nothing here is ambient or global.

use std::collections::{BTreeSet, HashSet};

use crate::config::AppConfig;
use crate::diff::{self, Changes};
use crate::error::Result;
use crate::registry::{Item, Registry};
use crate::scanner::tree::{Node, build_forest};
use crate::selection::SelectionState;
use crate::source::ContentSource;
use crate::sync::{Executor, SyncReport};
use crate::target::{InstallMode, find_installed};

pub struct Session {
    pub registry: Registry,
    pub config: AppConfig,
    pub mode: InstallMode,
    pub tree: Vec<Node>,
    pub selection: SelectionState,
    installed: HashSet<String>,
}

impl Session {
    /// Open a session over a loaded registry: build the item tree, detect
    /// the installed set and seed the selection from it.
    pub fn open(registry: Registry, config: AppConfig, mode: InstallMode) -> Self {
        let leaves: Vec<(String, Item)> = registry
            .all_items()
            .map(|item| (item.path.clone(), item.clone()))
            .collect();
        let pack_roots: HashSet<String> =
            registry.packs.iter().map(|p| p.path.clone()).collect();
        let tree = build_forest(&leaves, &BTreeSet::new(), &pack_roots);

        let installed = find_installed(registry.all_items(), mode, &config.install);
        let selection = SelectionState::from_item_keys(&tree, &installed);

        Self {
            registry,
            config,
            mode,
            tree,
            selection,
            installed,
        }
    }

    /// Re-detect filesystem state, e.g. after switching install mode.
    pub fn refresh_installed(&mut self) {
        self.installed = find_installed(self.registry.all_items(), self.mode, &self.config.install);
        self.selection = SelectionState::from_item_keys(&self.tree, &self.installed);
    }

    pub fn installed_keys(&self) -> &HashSet<String> {
        &self.installed
    }

    /// The current diff between the selection and the installed set.
    pub fn changes(&self) -> Changes {
        let desired = self.selection.selected_keys(&self.tree);
        let all: Vec<Item> = self.registry.all_items().cloned().collect();
        diff::compute(&desired, &self.installed, &all)
    }

    /// Apply the current diff through the given content source.
    pub fn sync(
        &self,
        source: &dyn ContentSource,
        on_progress: &mut dyn FnMut(&str),
    ) -> Result<SyncReport> {
        let changes = self.changes();
        Executor::new(source, self.mode, &self.config.install).apply(&changes, on_progress)
    }
}
