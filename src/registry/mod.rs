//! Registry domain model
//!
//! A registry is the declarative catalog of one content source: packs of
//! items plus standalone items. These types carry no behavior beyond
//! structural validity and (de)serialization; every other module builds on
//! them.
//!
//! Item identity is the normalized source path ([`Item::key`]). All sets and
//! maps in the detector, diff engine and selection engine key on that value,
//! never on pointer or whole-record equality across collections.

use serde::{Deserialize, Serialize};

use crate::error::{PacksyncError, Result};

/// The four installable content kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Agent,
    Skill,
    Command,
    Doc,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Agent => "agent",
            ItemType::Skill => "skill",
            ItemType::Command => "command",
            ItemType::Doc => "doc",
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single installable content unit.
///
/// `path` is the location inside the content source (repo-relative or URL
/// path); `target` is the install path relative to an install root. For
/// skills, `path` is the skill *directory*, not the SKILL.md marker file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub path: String,
    pub target: String,
}

impl Item {
    /// Stable identity for set membership: the normalized source path.
    pub fn key(&self) -> String {
        normalize_path(&self.path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PacksyncError::RegistryParse {
                reason: "item name cannot be empty".to_string(),
            });
        }
        if self.path.trim().is_empty() {
            return Err(PacksyncError::RegistryParse {
                reason: format!("item '{}' has an empty source path", self.name),
            });
        }
        if self.target.trim().is_empty() {
            return Err(PacksyncError::RegistryParse {
                reason: format!("item '{}' has an empty target path", self.name),
            });
        }
        Ok(())
    }
}

/// A named, described group of items installed and removed together as a
/// logical unit, though diffed at item granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pack {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub path: String,
    pub items: Vec<Item>,
}

/// The full declarative catalog from one content source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub packs: Vec<Pack>,
    #[serde(default)]
    pub standalone: Vec<Item>,
}

impl Registry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: "1.0.0".to_string(),
            packs: Vec::new(),
            standalone: Vec::new(),
        }
    }

    /// All items, pack members first in pack order, then standalone.
    pub fn all_items(&self) -> impl Iterator<Item = &Item> {
        self.packs
            .iter()
            .flat_map(|p| p.items.iter())
            .chain(self.standalone.iter())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let registry: Registry =
            serde_json::from_str(json).map_err(|e| PacksyncError::RegistryParse {
                reason: e.to_string(),
            })?;
        for item in registry.all_items() {
            item.validate()?;
        }
        Ok(registry)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PacksyncError::RegistryParse {
            reason: e.to_string(),
        })
    }
}

/// Normalize a source-relative path: forward slashes, no leading or
/// trailing separators. Used for item keys and tree node ids.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .trim_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, kind: ItemType, path: &str) -> Item {
        Item {
            name: name.to_string(),
            description: String::new(),
            kind,
            path: path.to_string(),
            target: format!("{kind}/{name}.md"),
        }
    }

    #[test]
    fn test_item_key_is_normalized_source_path() {
        let a = item("finder", ItemType::Agent, "agents/research/agent/finder.md");
        let b = item("finder", ItemType::Agent, "/agents/research/agent/finder.md/");
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "agents/research/agent/finder.md");
    }

    #[test]
    fn test_registry_from_json() {
        let json = r#"{
  "name": "workflows",
  "version": "1.0.0",
  "packs": [
    {
      "name": "research",
      "description": "Research agents",
      "path": "agents/research",
      "items": [
        {
          "name": "finder",
          "description": "Finds things",
          "type": "agent",
          "path": "agents/research/agent/finder.md",
          "target": "agent/finder.md"
        }
      ]
    }
  ],
  "standalone": [
    {
      "name": "notes",
      "type": "doc",
      "path": "docs/notes.md",
      "target": "notes.md"
    }
  ]
}"#;
        let registry = Registry::from_json(json).unwrap();
        assert_eq!(registry.packs.len(), 1);
        assert_eq!(registry.standalone.len(), 1);
        assert_eq!(registry.all_items().count(), 2);
        assert_eq!(registry.packs[0].items[0].kind, ItemType::Agent);
        assert_eq!(registry.standalone[0].description, "");
    }

    #[test]
    fn test_registry_rejects_empty_item_name() {
        let json = r#"{
  "name": "bad",
  "version": "1.0.0",
  "standalone": [
    { "name": "", "type": "doc", "path": "docs/x.md", "target": "x.md" }
  ]
}"#;
        assert!(Registry::from_json(json).is_err());
    }

    #[test]
    fn test_registry_json_round_trip() {
        let mut registry = Registry::new("workflows");
        registry
            .standalone
            .push(item("notes", ItemType::Doc, "docs/notes.md"));
        let json = registry.to_json().unwrap();
        let parsed = Registry::from_json(&json).unwrap();
        assert_eq!(parsed, registry);
    }

    #[test]
    fn test_all_items_order_packs_first() {
        let mut registry = Registry::new("r");
        registry.packs.push(Pack {
            name: "p".to_string(),
            description: String::new(),
            path: "agents/p".to_string(),
            items: vec![item("a", ItemType::Skill, "agents/p/skill/a/SKILL.md")],
        });
        registry
            .standalone
            .push(item("b", ItemType::Doc, "docs/b.md"));
        let names: Vec<_> = registry.all_items().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
