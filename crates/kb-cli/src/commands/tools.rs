//! Tools command
//!
//! Browse the component showcase menu of the catalog.

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use kb_core::catalog::{Catalog, Component, ComponentCategory};

use super::load_config;

/// Arguments for the tools command
#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Group key (e.g. `layout`) or component path (e.g. `/tools/layout/flex`)
    pub target: Option<String>,

    /// Catalog file replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ComponentEntry<'a> {
    group: &'a str,
    #[serde(flatten)]
    component: &'a Component,
}

/// What a tools target names
#[derive(Debug, PartialEq, Eq)]
enum Selection<'a> {
    All(&'a [ComponentCategory]),
    Group(&'a ComponentCategory),
    Component(&'a ComponentCategory, &'a Component),
}

fn select<'a>(catalog: &'a Catalog, target: Option<&str>) -> Result<Selection<'a>> {
    let Some(target) = target else {
        return Ok(Selection::All(&catalog.component_categories));
    };
    if let Some((group, component)) = catalog.find_component(target) {
        return Ok(Selection::Component(group, component));
    }
    match catalog.component_category(target) {
        Some(group) => Ok(Selection::Group(group)),
        None => bail!("Unknown component group or path '{}'", target),
    }
}

/// Execute the tools command
pub fn execute(args: ToolsArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog_file = args.catalog.or_else(|| config.catalog.file.clone());
    let catalog = Catalog::load_or_builtin(catalog_file.as_deref())
        .context("Failed to load catalog")?;

    match select(&catalog, args.target.as_deref())? {
        Selection::All(groups) if args.json => {
            println!("{}", serde_json::to_string_pretty(groups)?);
        }
        Selection::Group(group) if args.json => {
            println!("{}", serde_json::to_string_pretty(group)?);
        }
        Selection::Component(group, component) if args.json => {
            let entry = ComponentEntry {
                group: &group.key,
                component,
            };
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        Selection::All(groups) => {
            use colored::Colorize;

            println!("{}", "Components:".bold().underline());
            for group in groups {
                print_group(group);
            }
        }
        Selection::Group(group) => print_group(group),
        Selection::Component(group, component) => print_component(group, component),
    }
    Ok(())
}

fn print_group(group: &ComponentCategory) {
    use colored::Colorize;

    println!();
    println!(
        "  {:<10} {} {}",
        group.key.cyan(),
        group.title.bold(),
        format!("({})", group.components.len()).dimmed()
    );
    if !group.description.is_empty() {
        println!("  {:<10} {}", "", group.description.dimmed());
    }
    if group.components.is_empty() {
        println!("    {}", "no components yet".dimmed());
    }
    for component in &group.components {
        match &component.command {
            Some(command) => println!(
                "    {}  {}  {}",
                component.title,
                component.path.dimmed(),
                format!("kbase {}", command).green()
            ),
            None => println!("    {}  {}", component.title, component.path.dimmed()),
        }
    }
}

fn print_component(group: &ComponentCategory, component: &Component) {
    use colored::Colorize;

    println!("{}", component.title.bold());
    println!("  group: {} ({})", group.title, group.key.cyan());
    println!("  path:  {}", component.path);
    if let Some(command) = &component.command {
        println!();
        println!("Try it: {}", format!("kbase {} --help", command).green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_targets() {
        let catalog = Catalog::builtin().unwrap();

        match select(&catalog, None).unwrap() {
            Selection::All(groups) => assert_eq!(groups.len(), 5),
            other => panic!("unexpected {:?}", other),
        }
        match select(&catalog, Some("layout")).unwrap() {
            Selection::Group(group) => assert_eq!(group.components.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
        match select(&catalog, Some("/tools/layout/flex")).unwrap() {
            Selection::Component(group, component) => {
                assert_eq!(group.key, "layout");
                assert_eq!(component.command.as_deref(), Some("layout"));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(select(&catalog, Some("nope")).is_err());
    }

    #[test]
    fn test_component_entry_json() {
        let catalog = Catalog::builtin().unwrap();
        let (group, component) = catalog.find_component("/tools/layout/flex").unwrap();
        let json = serde_json::to_value(ComponentEntry {
            group: &group.key,
            component,
        })
        .unwrap();
        assert_eq!(json["group"], "layout");
        assert_eq!(json["path"], "/tools/layout/flex");
        assert_eq!(json["command"], "layout");
    }
}
