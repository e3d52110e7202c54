//! Selection engine
//!
//! Maintains the desired item set over a scanned (or registry-loaded) tree.
//! There is no independent per-container selection flag: a container's
//! apparent state is always a pure function of its descendant selectable
//! units, recomputed on demand from the authoritative selected-id set and
//! memoized only within a single query pass. A unit is a leaf, or a
//! container with zero children (not yet lazily loaded) — the latter
//! carries its own id in the selected set and counts as one unit in every
//! ancestor's aggregation.

use std::collections::{HashMap, HashSet};

use crate::registry::Item;
use crate::scanner::tree::Node;

/// Aggregate selection state of a container over its leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriState {
    Selected,
    Partial,
    Empty,
}

/// Logical cursor position, tracked by node id rather than list index so
/// the position survives expand/collapse and late-loaded children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorFocus {
    pub id: String,
    pub parent: Option<String>,
}

/// One row of the flattened, expansion-aware visible list.
#[derive(Debug, Clone)]
pub struct VisibleRow<'a> {
    pub node: &'a Node,
    pub parent: Option<String>,
    pub state: TriState,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: HashSet<String>,
    expanded: HashSet<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the selection from a set of item keys (the installed set, when
    /// a session starts).
    pub fn from_item_keys(nodes: &[Node], keys: &HashSet<String>) -> Self {
        let mut state = Self::new();
        for_each_leaf(nodes, &mut |node| {
            if let Some(ref item) = node.item {
                if keys.contains(&item.key()) {
                    state.selected.insert(node.id.clone());
                }
            }
        });
        state
    }

    pub fn is_expanded(&self, node_id: &str) -> bool {
        self.expanded.contains(node_id)
    }

    pub fn toggle_expanded(&mut self, node_id: &str) {
        if !self.expanded.remove(node_id) {
            self.expanded.insert(node_id.to_string());
        }
    }

    /// Toggle a node. Leaves flip; containers set every descendant unit to
    /// the same target state: deselect all when fully or partially
    /// selected, select all otherwise.
    pub fn toggle(&mut self, nodes: &[Node], node_id: &str) {
        let Some(node) = find_node(nodes, node_id) else {
            return;
        };
        if !node.is_container() {
            if !self.selected.remove(node_id) {
                self.selected.insert(node_id.to_string());
            }
            return;
        }

        let unit_ids = unit_ids_below(node);
        if unit_ids.is_empty() {
            // Lazily-loaded container: its own id carries the selection.
            if !self.selected.remove(node_id) {
                self.selected.insert(node_id.to_string());
            }
            return;
        }

        let mut cache = HashMap::new();
        match self.tri_state_cached(node, &mut cache) {
            TriState::Selected | TriState::Partial => {
                for id in unit_ids {
                    self.selected.remove(&id);
                }
            }
            TriState::Empty => {
                self.selected.extend(unit_ids);
            }
        }
    }

    pub fn select_all(&mut self, nodes: &[Node]) {
        let mut ids = Vec::new();
        collect_unit_ids(nodes, &mut ids);
        self.selected.extend(ids);
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Tri-state of a single node, derived bottom-up from its unit set.
    pub fn tri_state(&self, node: &Node) -> TriState {
        self.tri_state_cached(node, &mut HashMap::new())
    }

    fn tri_state_cached(&self, node: &Node, cache: &mut HashMap<String, TriState>) -> TriState {
        if let Some(&state) = cache.get(&node.id) {
            return state;
        }
        let state = if node.is_container() {
            let unit_ids = unit_ids_below(node);
            if unit_ids.is_empty() {
                if self.selected.contains(&node.id) {
                    TriState::Selected
                } else {
                    TriState::Empty
                }
            } else {
                let selected_count = unit_ids
                    .iter()
                    .filter(|id| self.selected.contains(*id))
                    .count();
                if selected_count == unit_ids.len() {
                    TriState::Selected
                } else if selected_count > 0 {
                    TriState::Partial
                } else {
                    TriState::Empty
                }
            }
        } else if self.selected.contains(&node.id) {
            TriState::Selected
        } else {
            TriState::Empty
        };
        cache.insert(node.id.clone(), state);
        state
    }

    /// Flattened, depth-first, expansion-aware visible list. Tri-states are
    /// memoized only within this one pass.
    pub fn visible<'a>(&self, nodes: &'a [Node]) -> Vec<VisibleRow<'a>> {
        let mut rows = Vec::new();
        let mut cache = HashMap::new();
        self.flatten(nodes, None, &mut rows, &mut cache);
        rows
    }

    fn flatten<'a>(
        &self,
        nodes: &'a [Node],
        parent: Option<&str>,
        rows: &mut Vec<VisibleRow<'a>>,
        cache: &mut HashMap<String, TriState>,
    ) {
        for node in nodes {
            rows.push(VisibleRow {
                node,
                parent: parent.map(String::from),
                state: self.tri_state_cached(node, cache),
            });
            if node.is_container() && self.is_expanded(&node.id) {
                self.flatten(&node.children, Some(&node.id), rows, cache);
            }
        }
    }

    /// The desired item set: selected leaf items in tree order.
    pub fn selected_items<'a>(&self, nodes: &'a [Node]) -> Vec<&'a Item> {
        let mut items = Vec::new();
        for_each_leaf(nodes, &mut |node| {
            if self.selected.contains(&node.id) {
                if let Some(ref item) = node.item {
                    items.push(item);
                }
            }
        });
        items
    }

    /// Item keys of the desired set.
    pub fn selected_keys(&self, nodes: &[Node]) -> HashSet<String> {
        self.selected_items(nodes)
            .into_iter()
            .map(|item| item.key())
            .collect()
    }
}

/// Capture the logical cursor position from the current visible list.
pub fn capture_focus(rows: &[VisibleRow<'_>], cursor: usize) -> Option<CursorFocus> {
    rows.get(cursor).map(|row| CursorFocus {
        id: row.node.id.clone(),
        parent: row.parent.clone(),
    })
}

/// Restore the cursor after a list mutation: exact node id first, then the
/// remembered parent, then clamp to the list end.
pub fn restore_cursor(rows: &[VisibleRow<'_>], focus: Option<&CursorFocus>, current: usize) -> usize {
    if rows.is_empty() {
        return 0;
    }
    if let Some(focus) = focus {
        if let Some(idx) = rows.iter().position(|row| row.node.id == focus.id) {
            return idx;
        }
        if let Some(ref parent) = focus.parent {
            if let Some(idx) = rows.iter().position(|row| row.node.id == *parent) {
                return idx;
            }
        }
    }
    current.min(rows.len() - 1)
}

fn find_node<'a>(nodes: &'a [Node], node_id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id == node_id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, node_id) {
            return Some(found);
        }
    }
    None
}

fn unit_ids_below(node: &Node) -> Vec<String> {
    let mut ids = Vec::new();
    collect_unit_ids(&node.children, &mut ids);
    ids
}

/// Selectable units under a node list: leaves, plus childless containers,
/// which carry their own selection and must stay visible to every
/// ancestor's aggregation.
fn collect_unit_ids(nodes: &[Node], ids: &mut Vec<String>) {
    for node in nodes {
        if node.is_container() && !node.children.is_empty() {
            collect_unit_ids(&node.children, ids);
        } else {
            ids.push(node.id.clone());
        }
    }
}

fn for_each_leaf<'a>(nodes: &'a [Node], f: &mut impl FnMut(&'a Node)) {
    for node in nodes {
        if node.is_container() {
            for_each_leaf(&node.children, f);
        } else {
            f(node);
        }
    }
}
