//! Tree scanner
//!
//! Walks the allowed subtrees of a local directory, classifies every file
//! into an item or excludes it, extracts front matter for markdown items,
//! infers pack membership, and emits a navigable node forest plus the flat
//! item list a registry can be bootstrapped from.
//!
//! This module handles:
//! - Directory traversal with skip-dir filtering
//! - Item construction (classification + front matter)
//! - Implicit pack inference and dissolution
//! - Building a [`Registry`] from a selected subset of scanned items

pub mod classify;
pub mod frontmatter;
pub mod tree;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use walkdir::WalkDir;

use crate::error::{PacksyncError, Result};
use crate::registry::{Item, ItemType, Pack, Registry, normalize_path};
use classify::{Classified, classify, pack_candidate, should_skip_dir};
use frontmatter::{normalize_description, read_frontmatter};
use tree::{Node, build_forest};

/// One classified file, ready for selection and registry building.
#[derive(Debug, Clone)]
pub struct ScannedItem {
    pub item: Item,
    /// Implicit pack name inferred from an `agents/<name>/...` location.
    pub pack_candidate: Option<String>,
    /// Skill asset files installed together with this (skill) item.
    pub assets: Vec<Item>,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Top-level subtrees the user opted into. Empty means scan nothing.
    pub allowed_roots: Vec<String>,
    /// Directories explicitly declared as pack roots by the caller.
    pub explicit_pack_roots: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub forest: Vec<Node>,
    pub items: Vec<ScannedItem>,
}

/// Scan the allowed subtrees under `root_dir`.
///
/// An unreadable directory aborts the scan of its subtree with an error; a
/// missing allowed root is silently skipped (nothing to scan there yet).
pub fn scan(root_dir: &Path, options: &ScanOptions) -> Result<ScanOutcome> {
    let allowed: BTreeSet<String> = options
        .allowed_roots
        .iter()
        .map(|r| normalize_path(r.trim()))
        .filter(|r| !r.is_empty() && !should_skip_dir(r))
        .collect();
    if allowed.is_empty() {
        return Ok(ScanOutcome {
            forest: Vec::new(),
            items: Vec::new(),
        });
    }

    let mut files: Vec<String> = Vec::new();
    let mut dirs: BTreeSet<String> = BTreeSet::new();
    for root in &allowed {
        let root_path = root_dir.join(root);
        if !root_path.exists() {
            continue;
        }
        dirs.insert(root.clone());
        walk_subtree(&root_path, root, &mut files, &mut dirs)?;
    }

    let mut items: Vec<ScannedItem> = Vec::new();
    let mut assets_by_skill: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    let mut seen_keys: HashSet<String> = HashSet::new();

    for rel in &files {
        match classify(rel) {
            Classified::Item {
                kind,
                source_path,
                target,
            } => {
                if !seen_keys.insert(source_path.clone()) {
                    continue;
                }
                let item = build_item(root_dir, rel, kind, &source_path, &target);
                items.push(ScannedItem {
                    pack_candidate: pack_candidate(&source_path),
                    item,
                    assets: Vec::new(),
                });
            }
            Classified::SkillAsset {
                skill_dir,
                source_path,
                target,
            } => {
                let basename = source_path.rsplit('/').next().unwrap_or(&source_path);
                assets_by_skill.entry(skill_dir).or_default().push(Item {
                    name: basename.to_string(),
                    description: String::new(),
                    kind: ItemType::Skill,
                    path: source_path.clone(),
                    target,
                });
            }
            Classified::Excluded => {}
        }
    }

    // Attach assets to their pivot skill. Assets whose SKILL.md never
    // showed up have no skill to belong to and are dropped.
    for scanned in &mut items {
        if scanned.item.kind == ItemType::Skill {
            if let Some(assets) = assets_by_skill.remove(&scanned.item.key()) {
                scanned.assets = assets;
            }
        }
    }

    let pack_roots: HashSet<String> = options
        .explicit_pack_roots
        .iter()
        .map(|r| normalize_path(r))
        .collect();
    let leaves: Vec<(String, Item)> = items
        .iter()
        .map(|s| (s.item.path.clone(), s.item.clone()))
        .collect();
    let forest = build_forest(&leaves, &dirs, &pack_roots);

    Ok(ScanOutcome { forest, items })
}

fn walk_subtree(
    root_path: &Path,
    root_label: &str,
    files: &mut Vec<String>,
    dirs: &mut BTreeSet<String>,
) -> Result<()> {
    let walker = WalkDir::new(root_path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            !e.file_type().is_dir()
                || e.depth() == 0
                || e.file_name()
                    .to_str()
                    .is_none_or(|name| !should_skip_dir(name))
        });
    for entry in walker {
        let entry = entry.map_err(|e| PacksyncError::DirectoryUnreadable {
            path: e
                .path()
                .map_or_else(|| root_path.display().to_string(), |p| p.display().to_string()),
            reason: e.to_string(),
        })?;
        if entry.depth() == 0 {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root_path)
            .unwrap_or(entry.path())
            .to_string_lossy()
            .replace('\\', "/");
        let rel = format!("{root_label}/{rel}");
        if entry.file_type().is_dir() {
            dirs.insert(rel);
        } else {
            files.push(rel);
        }
    }
    Ok(())
}

fn build_item(root_dir: &Path, file_rel: &str, kind: ItemType, source_path: &str, target: &str) -> Item {
    let basename = file_rel.rsplit('/').next().unwrap_or(file_rel);
    let mut name = basename
        .strip_suffix(".md")
        .or_else(|| basename.strip_suffix(".MD"))
        .unwrap_or(basename)
        .to_string();
    let mut description = String::new();

    // Skills read front matter from the SKILL.md marker; default name is
    // the skill directory, not the marker file.
    if kind == ItemType::Skill {
        name = source_path.rsplit('/').next().unwrap_or(source_path).to_string();
    }
    if basename.to_lowercase().ends_with(".md") {
        let fm = read_frontmatter(&root_dir.join(file_rel));
        if let Some(fm_name) = fm.name {
            name = fm_name;
        }
        if let Some(fm_desc) = fm.description {
            description = normalize_description(&fm_desc);
        }
    }

    Item {
        name,
        description,
        kind,
        path: source_path.to_string(),
        target: target.to_string(),
    }
}

/// Build a declarative registry from a selected subset of scanned items.
///
/// Explicit pack roots take precedence and pin the pack's root directory.
/// Remaining items group by their implicit pack candidate; an implicit pack
/// containing only agents dissolves back into standalone items.
pub fn build_registry(
    name: &str,
    selected: &[ScannedItem],
    explicit_pack_roots: &[String],
) -> Registry {
    let mut roots: Vec<String> = explicit_pack_roots
        .iter()
        .map(|r| normalize_path(r))
        .filter(|r| !r.is_empty())
        .collect();
    // Longest root wins when roots nest.
    roots.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut explicit_packs: BTreeMap<String, Pack> = BTreeMap::new();
    for root in &roots {
        explicit_packs.insert(
            root.clone(),
            Pack {
                name: root.rsplit('/').next().unwrap_or(root).to_string(),
                description: String::new(),
                path: root.clone(),
                items: Vec::new(),
            },
        );
    }

    let mut implicit: BTreeMap<String, Vec<Item>> = BTreeMap::new();
    let mut implicit_order: Vec<String> = Vec::new();
    let mut standalone: Vec<Item> = Vec::new();

    for scanned in selected {
        let mut entries = Vec::with_capacity(1 + scanned.assets.len());
        entries.push(scanned.item.clone());
        entries.extend(scanned.assets.iter().cloned());

        let key = scanned.item.key();
        if let Some(root) = roots
            .iter()
            .find(|root| key == **root || key.starts_with(&format!("{root}/")))
        {
            if let Some(pack) = explicit_packs.get_mut(root) {
                pack.items.extend(entries);
            }
            continue;
        }

        if let Some(ref candidate) = scanned.pack_candidate {
            if !implicit.contains_key(candidate) {
                implicit_order.push(candidate.clone());
            }
            implicit.entry(candidate.clone()).or_default().extend(entries);
            continue;
        }

        standalone.extend(entries);
    }

    let mut packs: Vec<Pack> = roots
        .iter()
        .rev()
        .filter_map(|root| explicit_packs.remove(root))
        .filter(|pack| !pack.items.is_empty())
        .collect();

    for candidate in implicit_order {
        let Some(items) = implicit.remove(&candidate) else {
            continue;
        };
        // A pack of nothing but orchestration agents is not worth
        // presenting as a unit.
        if items.iter().all(|i| i.kind == ItemType::Agent) {
            standalone.extend(items);
            continue;
        }
        packs.push(Pack {
            name: candidate.clone(),
            description: String::new(),
            path: format!("agents/{candidate}"),
            items,
        });
    }

    Registry {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        packs,
        standalone,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn scan_roots(root: &Path, roots: &[&str]) -> ScanOutcome {
        scan(
            root,
            &ScanOptions {
                allowed_roots: roots.iter().map(|r| (*r).to_string()).collect(),
                explicit_pack_roots: Vec::new(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_scan_classifies_and_reads_frontmatter() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "agents/research/agent/finder.md",
            "---\nname: finder\ndescription: Finds relevant sources\n---\n# Finder\n",
        );
        write(temp.path(), "agents/research/README.md", "ignored");

        let outcome = scan_roots(temp.path(), &["agents"]);
        assert_eq!(outcome.items.len(), 1);
        let scanned = &outcome.items[0];
        assert_eq!(scanned.item.kind, ItemType::Agent);
        assert_eq!(scanned.item.name, "finder");
        assert_eq!(scanned.item.description, "Finds relevant sources");
        assert_eq!(scanned.pack_candidate.as_deref(), Some("research"));
    }

    #[test]
    fn test_scan_name_defaults_to_file_stem() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/notes.md", "# No front matter\n");
        let outcome = scan_roots(temp.path(), &["docs"]);
        assert_eq!(outcome.items[0].item.name, "notes");
        assert_eq!(outcome.items[0].item.kind, ItemType::Doc);
        assert_eq!(outcome.items[0].item.description, "");
    }

    #[test]
    fn test_scan_malformed_frontmatter_keeps_item() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/notes.md", "---\n: [broken\n---\nbody\n");
        let outcome = scan_roots(temp.path(), &["docs"]);
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].item.name, "notes");
    }

    #[test]
    fn test_scan_skill_with_assets() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "skills/search/SKILL.md",
            "---\ndescription: Web search skill\n---\n",
        );
        write(temp.path(), "skills/search/query.py", "print()\n");
        write(temp.path(), "skills/search/data/stops.txt", "a\n");

        let outcome = scan_roots(temp.path(), &["skills"]);
        assert_eq!(outcome.items.len(), 1);
        let scanned = &outcome.items[0];
        assert_eq!(scanned.item.kind, ItemType::Skill);
        assert_eq!(scanned.item.name, "search");
        assert_eq!(scanned.item.path, "skills/search");
        let mut asset_targets: Vec<_> =
            scanned.assets.iter().map(|a| a.target.clone()).collect();
        asset_targets.sort();
        assert_eq!(
            asset_targets,
            ["skill/search/data/stops.txt", "skill/search/query.py"]
        );
    }

    #[test]
    fn test_scan_skips_excluded_dirs_and_missing_roots() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/node_modules/dep/x.md", "hidden");
        write(temp.path(), "docs/notes.md", "# notes\n");
        let outcome = scan_roots(temp.path(), &["docs", "missing"]);
        assert_eq!(outcome.items.len(), 1);
    }

    #[test]
    fn test_scan_empty_allowed_roots_is_empty() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "docs/notes.md", "# notes\n");
        let outcome = scan_roots(temp.path(), &[]);
        assert!(outcome.items.is_empty());
        assert!(outcome.forest.is_empty());
    }

    #[test]
    fn test_scan_forest_covers_allowed_subtrees() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "agents/a/agent/x.md", "# x\n");
        write(temp.path(), "docs/notes.md", "# notes\n");
        let outcome = scan_roots(temp.path(), &["agents", "docs"]);
        let labels: Vec<_> = outcome.forest.iter().map(|n| n.label.clone()).collect();
        assert_eq!(labels, ["agents", "docs"]);
    }

    fn scanned(name: &str, kind: ItemType, path: &str, candidate: Option<&str>) -> ScannedItem {
        ScannedItem {
            item: Item {
                name: name.to_string(),
                description: String::new(),
                kind,
                path: path.to_string(),
                target: format!("{kind}/{name}.md"),
            },
            pack_candidate: candidate.map(String::from),
            assets: Vec::new(),
        }
    }

    #[test]
    fn test_pack_dissolution_agents_only() {
        let items = vec![
            scanned("a", ItemType::Agent, "agents/utils/agent/a.md", Some("utils")),
            scanned("b", ItemType::Agent, "agents/utils/agent/b.md", Some("utils")),
        ];
        let registry = build_registry("r", &items, &[]);
        assert!(registry.packs.is_empty());
        assert_eq!(registry.standalone.len(), 2);
    }

    #[test]
    fn test_pack_kept_when_it_provides_more_than_agents() {
        let items = vec![
            scanned("a", ItemType::Agent, "agents/research/agent/a.md", Some("research")),
            scanned(
                "s",
                ItemType::Skill,
                "agents/research/skill/s",
                Some("research"),
            ),
        ];
        let registry = build_registry("r", &items, &[]);
        assert_eq!(registry.packs.len(), 1);
        assert_eq!(registry.packs[0].name, "research");
        assert_eq!(registry.packs[0].path, "agents/research");
        assert_eq!(registry.packs[0].items.len(), 2);
        assert!(registry.standalone.is_empty());
    }

    #[test]
    fn test_explicit_pack_root_takes_precedence() {
        let items = vec![
            scanned("a", ItemType::Agent, "tools/kit/agent/a.md", None),
            scanned("b", ItemType::Agent, "tools/kit/agent/b.md", None),
        ];
        let registry = build_registry("r", &items, &["tools/kit".to_string()]);
        // Explicit packs never dissolve, regardless of member kinds.
        assert_eq!(registry.packs.len(), 1);
        assert_eq!(registry.packs[0].name, "kit");
        assert_eq!(registry.packs[0].path, "tools/kit");
        assert_eq!(registry.packs[0].items.len(), 2);
    }

    #[test]
    fn test_skill_assets_travel_with_their_skill() {
        let mut skill = scanned("search", ItemType::Skill, "skills/search", None);
        skill.assets.push(Item {
            name: "query.py".to_string(),
            description: String::new(),
            kind: ItemType::Skill,
            path: "skills/search/query.py".to_string(),
            target: "skill/search/query.py".to_string(),
        });
        let registry = build_registry("r", &[skill], &[]);
        assert_eq!(registry.standalone.len(), 2);
        assert_eq!(registry.standalone[0].path, "skills/search");
        assert_eq!(registry.standalone[1].path, "skills/search/query.py");
    }
}
