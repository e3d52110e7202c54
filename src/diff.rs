//! Diff engine
//!
//! Pure set algebra over item keys:
//! install = desired − installed, refresh = desired ∩ installed,
//! remove = installed − desired. No I/O, no mutation of either input set;
//! output order follows the authoritative item list, not a sort.

use std::collections::HashSet;

use crate::registry::Item;

/// The computed difference between the desired and installed sets.
#[derive(Debug, Clone, Default)]
pub struct Changes {
    pub install: Vec<Item>,
    pub refresh: Vec<Item>,
    pub remove: Vec<Item>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.install.is_empty() && self.refresh.is_empty() && self.remove.is_empty()
    }

    pub fn download_count(&self) -> usize {
        self.install.len() + self.refresh.len()
    }
}

/// Compute the changes for the given desired and installed key sets.
/// `all_items` is the authoritative item list supplying records and order.
pub fn compute(
    desired: &HashSet<String>,
    installed: &HashSet<String>,
    all_items: &[Item],
) -> Changes {
    let mut changes = Changes::default();
    for item in all_items {
        let key = item.key();
        match (desired.contains(&key), installed.contains(&key)) {
            (true, false) => changes.install.push(item.clone()),
            (true, true) => changes.refresh.push(item.clone()),
            (false, true) => changes.remove.push(item.clone()),
            (false, false) => {}
        }
    }
    changes
}
