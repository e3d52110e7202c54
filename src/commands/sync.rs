//! Sync command: reconcile the local install tree against a registry

use console::style;

use crate::cli::SyncArgs;
use crate::error::{PacksyncError, Result};
use crate::progress::ProgressDisplay;
use crate::scanner::tree::Node;
use crate::selection::TriState;
use crate::session::Session;
use crate::source::{ContentSource, DirSource, HttpSource};

use super::helpers::{install_mode, load_config, load_registry};

pub fn run(args: SyncArgs) -> Result<()> {
    let registry = load_registry(&args.registry)?;
    let config = load_config(args.config.as_ref(), &args.registry)?;
    let mode = install_mode(args.local);

    let mut session = Session::open(registry, config, mode);
    if args.all {
        session.selection.select_all(&session.tree);
    }
    for name in &args.select {
        set_selected(&mut session, name, true)?;
    }
    for name in &args.deselect {
        set_selected(&mut session, name, false)?;
    }

    let changes = session.changes();
    print_summary(&session, &changes);
    if changes.is_empty() {
        println!("Nothing to do.");
        return Ok(());
    }
    if args.dry_run {
        println!("{}", style("Dry run, nothing applied.").dim());
        return Ok(());
    }

    let source = build_source(&args)?;
    let progress = ProgressDisplay::new(changes.download_count() as u64);
    let report = {
        let result = session.sync(source.as_ref(), &mut |line| progress.step(line));
        match result {
            Ok(report) => {
                progress.finish();
                report
            }
            Err(e) => {
                progress.abandon();
                return Err(e);
            }
        }
    };

    println!(
        "Removed {}, synced {} item(s).",
        report.removed.len(),
        report.synced.len()
    );
    if !report.is_clean() {
        for (item, error) in &report.failed {
            eprintln!("{} {}: {}", style("failed").red().bold(), item.name, error);
        }
        return Err(PacksyncError::IoError {
            message: format!("{} item(s) failed to sync", report.failed.len()),
        });
    }
    Ok(())
}

fn build_source(args: &SyncArgs) -> Result<Box<dyn ContentSource>> {
    if let Some(ref dir) = args.source_dir {
        return Ok(Box::new(DirSource::new(dir)));
    }
    if let Some(ref base) = args.source_base {
        return Ok(Box::new(HttpSource::new(base.clone())));
    }
    Err(PacksyncError::IoError {
        message: "provide a content source: --source-base URL or --source-dir DIR".to_string(),
    })
}

/// Ensure a named item is (de)selected. Unknown names are an error so a
/// typo does not silently sync the wrong set.
fn set_selected(session: &mut Session, name: &str, selected: bool) -> Result<()> {
    let matches: Vec<String> = leaf_ids_by_name(&session.tree, name);
    if matches.is_empty() {
        return Err(PacksyncError::IoError {
            message: format!("no registry item named '{name}'"),
        });
    }
    for id in matches {
        let node = find_node(&session.tree, &id);
        if let Some(node) = node {
            let is_selected = session.selection.tri_state(node) == TriState::Selected;
            if is_selected != selected {
                session.selection.toggle(&session.tree, &id);
            }
        }
    }
    Ok(())
}

fn leaf_ids_by_name(nodes: &[Node], name: &str) -> Vec<String> {
    let mut ids = Vec::new();
    for node in nodes {
        if let Some(ref item) = node.item {
            if item.name == name {
                ids.push(node.id.clone());
            }
        }
        ids.extend(leaf_ids_by_name(&node.children, name));
    }
    ids
}

fn find_node<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Node> {
    for node in nodes {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

fn print_summary(session: &Session, changes: &crate::diff::Changes) {
    println!(
        "{} {} / {}",
        style(&session.config.ui.brand).bold(),
        session.config.ui.product,
        session.registry.name
    );
    let list = |label: &str, items: &[crate::registry::Item]| {
        if items.is_empty() {
            return;
        }
        println!("  {} ({}):", label, items.len());
        for item in items {
            println!("    {} {}", style(item.kind.as_str()).dim(), item.name);
        }
    };
    list("install", &changes.install);
    list("refresh", &changes.refresh);
    list("remove", &changes.remove);
}
