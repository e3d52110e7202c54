//! Navigable node tree built from scanned files
//!
//! The forest is assembled bottom-up from the flat item and directory lists:
//! folder nodes are synthesized for every intermediate directory so the tree
//! is fully navigable even where no item exists yet at that level. Node ids
//! derive deterministically from normalized relative paths, which keeps a
//! cursor position stable across rescans.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::registry::{Item, normalize_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Folder,
    PackRoot,
    Leaf,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub depth: usize,
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub item: Option<Item>,
}

impl Node {
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Folder | NodeKind::PackRoot)
    }

    /// Depth-first iterator over all leaf items below (or at) this node.
    pub fn leaf_items(&self) -> Vec<&Item> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'a>(node: &'a Node, out: &mut Vec<&'a Item>) {
    if let Some(ref item) = node.item {
        out.push(item);
    }
    for child in &node.children {
        collect_leaves(child, out);
    }
}

/// Deterministic node id for a source-relative path.
pub fn node_id(rel_path: &str) -> String {
    format!("path:{}", normalize_path(rel_path))
}

fn label_and_depth(path: &str) -> (String, usize) {
    let segments: Vec<&str> = path.split('/').collect();
    let label = segments.last().map_or(String::new(), |s| (*s).to_string());
    (label, segments.len() - 1)
}

fn parent_of(path: &str) -> Option<String> {
    path.rsplit_once('/').map(|(parent, _)| parent.to_string())
}

/// Build the forest from classified leaves (item keyed by its tree
/// placement path) and the set of walked directories. `pack_roots` marks
/// directories the caller explicitly declared as packs.
pub fn build_forest(
    leaves: &[(String, Item)],
    dirs: &BTreeSet<String>,
    pack_roots: &HashSet<String>,
) -> Vec<Node> {
    // A skill leaf sits at a directory path; nothing below a leaf is listed.
    let leaf_paths: BTreeMap<String, Item> = leaves
        .iter()
        .map(|(path, item)| (normalize_path(path), item.clone()))
        .collect();

    let under_leaf = |path: &str| {
        leaf_paths
            .keys()
            .any(|leaf| path != leaf && path.starts_with(&format!("{leaf}/")))
    };

    // Every node path: leaves, walked dirs, and all their ancestors.
    let mut paths: BTreeSet<String> = BTreeSet::new();
    for path in leaf_paths.keys() {
        paths.insert(path.clone());
    }
    for dir in dirs {
        let dir = normalize_path(dir);
        if !dir.is_empty() && !leaf_paths.contains_key(&dir) && !under_leaf(&dir) {
            paths.insert(dir);
        }
    }
    let ancestors: Vec<String> = paths
        .iter()
        .flat_map(|p| {
            let mut acc = Vec::new();
            let mut cur = parent_of(p);
            while let Some(parent) = cur {
                cur = parent_of(&parent);
                acc.push(parent);
            }
            acc
        })
        .collect();
    for ancestor in ancestors {
        if !leaf_paths.contains_key(&ancestor) {
            paths.insert(ancestor);
        }
    }

    // Group children under parents, then assemble top-down.
    let mut children_of: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut roots: Vec<String> = Vec::new();
    for path in &paths {
        match parent_of(path) {
            Some(parent) => children_of.entry(parent).or_default().push(path.clone()),
            None => roots.push(path.clone()),
        }
    }

    let mut forest: Vec<Node> = roots
        .iter()
        .map(|path| assemble(path, &leaf_paths, &children_of, pack_roots))
        .collect();
    sort_siblings(&mut forest);
    forest
}

fn assemble(
    path: &str,
    leaf_paths: &BTreeMap<String, Item>,
    children_of: &BTreeMap<String, Vec<String>>,
    pack_roots: &HashSet<String>,
) -> Node {
    let (label, depth) = label_and_depth(path);
    if let Some(item) = leaf_paths.get(path) {
        return Node {
            id: node_id(path),
            label,
            depth,
            kind: NodeKind::Leaf,
            children: Vec::new(),
            item: Some(item.clone()),
        };
    }
    let children = children_of
        .get(path)
        .map(|child_paths| {
            child_paths
                .iter()
                .map(|child| assemble(child, leaf_paths, children_of, pack_roots))
                .collect()
        })
        .unwrap_or_default();
    let kind = if pack_roots.contains(path) {
        NodeKind::PackRoot
    } else {
        NodeKind::Folder
    };
    Node {
        id: node_id(path),
        label,
        depth,
        kind,
        children,
        item: None,
    }
}

/// Sibling nodes are ordered lexicographically by label at every level,
/// not by discovery order.
fn sort_siblings(nodes: &mut [Node]) {
    nodes.sort_by(|a, b| a.label.cmp(&b.label));
    for node in nodes.iter_mut() {
        sort_siblings(&mut node.children);
    }
}
