//! Front matter extraction for markdown items
//!
//! Splits a leading `---` delimited block and parses it as YAML. Only `name`
//! and `description` are recovered; block scalars (`|`, `>`) come with the
//! YAML parser. A malformed block never fails a scan, it degrades to
//! defaults.

use std::path::Path;

use serde_yaml::Value;

/// Maximum display length for a normalized description.
const MAX_DESCRIPTION_LEN: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Parse content into the optional YAML block between the first and second
/// `---` lines. Returns defaults if the delimiters are missing or the block
/// is not a YAML mapping.
pub fn parse_frontmatter(content: &str) -> Frontmatter {
    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < 3 || lines[0].trim() != "---" {
        return Frontmatter::default();
    }
    let Some(end_idx) = lines[1..].iter().position(|l| l.trim() == "---") else {
        return Frontmatter::default();
    };
    let mut block = lines[1..=end_idx].join("\n");
    block.push('\n');

    let Ok(value) = serde_yaml::from_str::<Value>(&block) else {
        return Frontmatter::default();
    };
    let Some(mapping) = value.as_mapping() else {
        return Frontmatter::default();
    };

    let get = |key: &str| -> Option<String> {
        match mapping.get(Value::String(key.to_string()))? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    };

    Frontmatter {
        name: get("name").map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        description: get("description"),
    }
}

/// Read front matter from a file. A missing or unreadable file yields
/// defaults; per-file read failures do not abort a scan.
pub fn read_frontmatter(path: &Path) -> Frontmatter {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_frontmatter(&content),
        Err(_) => Frontmatter::default(),
    }
}

/// Presentation-oriented normalization: strip surrounding quotes, trim to
/// the first alphabetic character, collapse whitespace, truncate. Lossy;
/// callers needing the full description must re-read the source.
pub fn normalize_description(value: &str) -> String {
    let trimmed = value
        .trim()
        .trim_matches(|c| c == '\'' || c == '"')
        .replace('\r', "");
    let trimmed = trimmed.trim();
    let from_alpha = match trimmed.find(|c: char| c.is_ascii_alphabetic()) {
        Some(idx) => &trimmed[idx..],
        None => trimmed,
    };
    let collapsed = from_alpha.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_DESCRIPTION_LEN).collect()
}
