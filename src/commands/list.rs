//! List command: registry items with install markers

use console::style;

use crate::cli::ListArgs;
use crate::error::Result;
use crate::registry::Item;
use crate::target::find_installed;

use super::helpers::{install_mode, load_config, load_registry};

pub fn run(args: ListArgs) -> Result<()> {
    let registry = load_registry(&args.registry)?;
    let config = load_config(args.config.as_ref(), &args.registry)?;
    let mode = install_mode(args.local);
    let installed = find_installed(registry.all_items(), mode, &config.install);

    println!(
        "{} {} / {} (v{})",
        style(&config.ui.brand).bold(),
        config.ui.product,
        registry.name,
        registry.version
    );

    let print_item = |item: &Item, indent: &str| {
        let marker = if installed.contains(&item.key()) {
            style("[x]").green()
        } else {
            style("[ ]").dim()
        };
        let desc = if item.description.is_empty() {
            String::new()
        } else {
            format!(" - {}", item.description)
        };
        println!(
            "{indent}{marker} {} {}{}",
            style(item.kind.as_str()).cyan(),
            item.name,
            style(desc).dim()
        );
    };

    for pack in &registry.packs {
        println!("{}", style(&pack.name).bold());
        for item in &pack.items {
            print_item(item, "  ");
        }
    }
    if !registry.standalone.is_empty() {
        println!("{}", style("standalone").bold());
        for item in &registry.standalone {
            print_item(item, "  ");
        }
    }

    let installed_count = registry
        .all_items()
        .filter(|item| installed.contains(&item.key()))
        .count();
    println!(
        "{installed_count}/{} installed ({})",
        registry.all_items().count(),
        match mode {
            crate::target::InstallMode::Global => "global",
            crate::target::InstallMode::Local => "local",
        }
    );
    Ok(())
}
