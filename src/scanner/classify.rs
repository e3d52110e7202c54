//! File classification for the tree scanner
//!
//! Maps a source-relative file path to an item kind, source path and install
//! target. The rules are ordered and the first match wins:
//!
//! 1. exclusions (dotfiles, lockfiles and package manifests, READMEs,
//!    registry manifests)
//! 2. marker-segment rule: a reserved marker directory followed by
//!    `agent` / `command` / `skill`
//! 3. nearest-ancestor fallback on literal type directory names
//! 4. one level below the conventional `agents/` root classifies as agent
//! 5. everything else is a doc if markdown, excluded otherwise
//!
//! Skills are directory-granularity: only the `SKILL.md` marker produces an
//! item, whose source path is the containing directory. Every other file in
//! a skill directory is an asset, carried with the skill but never listed
//! on its own.

use crate::config::MARKER_DIR;
use crate::registry::ItemType;

/// Denylist of lockfiles and package manifests, matched on basename.
const EXCLUDED_FILES: &[&str] = &[
    "package.json",
    "package-lock.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    "bun.lock",
    "bun.lockb",
];

/// Registry manifests are never items of their own registry.
const REGISTRY_MANIFESTS: &[&str] = &["registry.json", "registry.toml"];

/// Directories never descended into while scanning.
const EXCLUDED_DIRS: &[&str] = &["node_modules", "build", "dist", ".git"];

const SKILL_MD: &str = "SKILL.md";

/// Classification outcome for one scanned file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// A selectable item. `source_path` is the file path, except for skills
    /// where it is the skill directory.
    Item {
        kind: ItemType,
        source_path: String,
        target: String,
    },
    /// A file inside a skill directory that is not the SKILL.md pivot.
    /// Installed with its skill, not listed independently.
    SkillAsset {
        skill_dir: String,
        source_path: String,
        target: String,
    },
    Excluded,
}

/// True if a directory name must be skipped during the walk.
pub fn should_skip_dir(name: &str) -> bool {
    if EXCLUDED_DIRS.contains(&name) {
        return true;
    }
    name.starts_with('.') && name != MARKER_DIR
}

fn is_excluded_basename(basename: &str) -> bool {
    if basename.starts_with('.') {
        return true;
    }
    if EXCLUDED_FILES.contains(&basename) || REGISTRY_MANIFESTS.contains(&basename) {
        return true;
    }
    basename.to_lowercase().starts_with("readme")
}

fn is_markdown(basename: &str) -> bool {
    basename.to_lowercase().ends_with(".md")
}

/// Classify a skill directory's contents given the index of the skill
/// marker segment: the directory after it names the skill. Returns `None`
/// when the shape is not actually a skill context (no directory between the
/// marker and the file), letting the caller fall through to later rules.
fn classify_in_skill_dir(segments: &[&str], skill_seg_idx: usize) -> Option<Classified> {
    // The segment after the marker must be a directory, not the file itself.
    if skill_seg_idx + 2 > segments.len() - 1 {
        return None;
    }
    let skill_name = segments[skill_seg_idx + 1];
    let basename = segments[segments.len() - 1];
    let skill_dir = segments[..=skill_seg_idx + 1].join("/");
    if basename.eq_ignore_ascii_case(SKILL_MD) && skill_seg_idx + 2 == segments.len() - 1 {
        return Some(Classified::Item {
            kind: ItemType::Skill,
            source_path: skill_dir,
            target: format!("skill/{skill_name}"),
        });
    }
    let rest = segments[skill_seg_idx + 2..].join("/");
    Some(Classified::SkillAsset {
        skill_dir,
        source_path: segments.join("/"),
        target: format!("skill/{skill_name}/{rest}"),
    })
}

fn is_skill_segment(name: &str) -> bool {
    name == "skill" || name == "skills"
}

/// Classify one file by its normalized source-relative path.
pub fn classify(rel_path: &str) -> Classified {
    let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
    let Some(&basename) = segments.last() else {
        return Classified::Excluded;
    };

    if is_excluded_basename(basename) {
        return Classified::Excluded;
    }

    // Marker-segment rule: `<marker>/<type>/...`
    if let Some(marker_idx) = segments.iter().position(|s| *s == MARKER_DIR) {
        match segments.get(marker_idx + 1).copied() {
            Some("agent") if is_markdown(basename) => {
                return Classified::Item {
                    kind: ItemType::Agent,
                    source_path: segments.join("/"),
                    target: format!("agent/{basename}"),
                };
            }
            Some("command") if is_markdown(basename) => {
                return Classified::Item {
                    kind: ItemType::Command,
                    source_path: segments.join("/"),
                    target: format!("command/{basename}"),
                };
            }
            Some("skill") => {
                if let Some(classified) = classify_in_skill_dir(&segments, marker_idx + 1) {
                    return classified;
                }
            }
            _ => {}
        }
    }

    // Nearest-ancestor fallback on literal type directory names. The
    // filename itself is not an ancestor.
    let parents = &segments[..segments.len() - 1];
    if let Some(skill_idx) = parents.iter().rposition(|s| is_skill_segment(s)) {
        if let Some(classified) = classify_in_skill_dir(&segments, skill_idx) {
            return classified;
        }
    }
    if parents.contains(&"command") && is_markdown(basename) {
        return Classified::Item {
            kind: ItemType::Command,
            source_path: segments.join("/"),
            target: format!("command/{basename}"),
        };
    }
    if parents.contains(&"agent") && is_markdown(basename) {
        return Classified::Item {
            kind: ItemType::Agent,
            source_path: segments.join("/"),
            target: format!("agent/{basename}"),
        };
    }

    // Directly one level below the conventional agents root.
    if segments.len() == 2 && segments[0] == "agents" && is_markdown(basename) {
        return Classified::Item {
            kind: ItemType::Agent,
            source_path: segments.join("/"),
            target: format!("agent/{basename}"),
        };
    }

    // Docs: markdown only. Anything else outside a skill context is noise.
    if is_markdown(basename) {
        return Classified::Item {
            kind: ItemType::Doc,
            source_path: segments.join("/"),
            target: basename.to_string(),
        };
    }

    Classified::Excluded
}

/// Pack candidate for implicit grouping: items under `agents/<name>/...`
/// tentatively belong to pack `<name>`.
pub fn pack_candidate(rel_path: &str) -> Option<String> {
    let segments: Vec<&str> = rel_path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() > 2 && segments[0] == "agents" {
        return Some(segments[1].to_string());
    }
    None
}
