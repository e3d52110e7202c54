//! Scan command: classify a content tree and bootstrap a registry

use console::style;

use crate::cli::ScanArgs;
use crate::error::{PacksyncError, Result};
use crate::scanner::classify::should_skip_dir;
use crate::scanner::tree::Node;
use crate::scanner::{ScanOptions, build_registry, scan};

pub fn run(args: ScanArgs) -> Result<()> {
    let roots = if args.roots.is_empty() {
        default_roots(&args)?
    } else {
        args.roots.clone()
    };

    let outcome = scan(
        &args.dir,
        &ScanOptions {
            allowed_roots: roots,
            explicit_pack_roots: args.pack.clone(),
        },
    )?;

    for node in &outcome.forest {
        print_node(node);
    }
    println!(
        "{} item(s) across {} subtree(s)",
        outcome.items.len(),
        outcome.forest.len()
    );

    if let Some(ref out) = args.out {
        let registry = build_registry(&args.name, &outcome.items, &args.pack);
        let json = registry.to_json()?;
        std::fs::write(out, json).map_err(|e| PacksyncError::FileWriteFailed {
            path: out.display().to_string(),
            reason: e.to_string(),
        })?;
        println!(
            "Wrote registry '{}' ({} packs, {} standalone) to {}",
            registry.name,
            registry.packs.len(),
            registry.standalone.len(),
            out.display()
        );
    }
    Ok(())
}

/// Without --roots, offer every non-hidden directory directly under the
/// scan root.
fn default_roots(args: &ScanArgs) -> Result<Vec<String>> {
    let entries = std::fs::read_dir(&args.dir).map_err(|e| PacksyncError::DirectoryUnreadable {
        path: args.dir.display().to_string(),
        reason: e.to_string(),
    })?;
    let mut roots = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PacksyncError::DirectoryUnreadable {
            path: args.dir.display().to_string(),
            reason: e.to_string(),
        })?;
        if !entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !should_skip_dir(name) {
                roots.push(name.to_string());
            }
        }
    }
    roots.sort();
    Ok(roots)
}

fn print_node(node: &Node) {
    let indent = "  ".repeat(node.depth);
    match node.item {
        Some(ref item) => {
            let desc = if item.description.is_empty() {
                String::new()
            } else {
                format!(" - {}", item.description)
            };
            println!(
                "{indent}{} {}{}",
                style(format!("[{}]", item.kind)).cyan(),
                item.name,
                style(desc).dim()
            );
        }
        None => println!("{indent}{}/", style(&node.label).bold()),
    }
    for child in &node.children {
        print_node(child);
    }
}
