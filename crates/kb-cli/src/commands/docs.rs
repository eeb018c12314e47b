//! Docs command
//!
//! List catalog categories, or the subcategory tree of one category.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

use kb_core::catalog::{Catalog, DocTreeGroup};

use super::load_config;

/// Arguments for the docs command
#[derive(Debug, Args)]
pub struct DocsArgs {
    /// Category key; lists all categories when omitted
    pub category: Option<String>,

    /// Catalog file replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct CategorySummary<'a> {
    key: &'a str,
    title: &'a str,
    description: &'a str,
    documents: usize,
}

#[derive(Debug, Serialize)]
struct CategoryTree<'a> {
    key: &'a str,
    title: &'a str,
    groups: &'a [DocTreeGroup],
}

/// Execute the docs command
pub fn execute(args: DocsArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog_file = args.catalog.or_else(|| config.catalog.file.clone());
    let catalog = Catalog::load_or_builtin(catalog_file.as_deref())
        .context("Failed to load catalog")?;

    match &args.category {
        None => list_categories(&catalog, args.json),
        Some(key) => show_tree(&catalog, key, args.json),
    }
}

fn summaries(catalog: &Catalog) -> Vec<CategorySummary<'_>> {
    catalog
        .categories
        .iter()
        .map(|c| CategorySummary {
            key: &c.key,
            title: &c.title,
            description: &c.description,
            documents: catalog.docs_in(&c.key).len(),
        })
        .collect()
}

fn list_categories(catalog: &Catalog, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let summaries = summaries(catalog);
    if as_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "Categories:".bold().underline());
    println!();
    for s in &summaries {
        println!(
            "  {:<12} {} {}",
            s.key.cyan(),
            s.title.bold(),
            format!("({})", s.documents).dimmed()
        );
        if !s.description.is_empty() {
            println!("  {:<12} {}", "", s.description.dimmed());
        }
    }
    Ok(())
}

fn show_tree(catalog: &Catalog, key: &str, as_json: bool) -> Result<()> {
    use colored::Colorize;

    let groups = catalog.tree(key);
    let title = catalog.category_title(key);

    if as_json {
        let tree = CategoryTree {
            key,
            title,
            groups: &groups,
        };
        println!("{}", serde_json::to_string_pretty(&tree)?);
        return Ok(());
    }

    if groups.is_empty() {
        eprintln!("{} No documents in category '{}'", "⚠".yellow(), key);
        return Ok(());
    }

    println!("{}", title.bold().underline());
    for group in &groups {
        println!();
        println!("  {}", group.title.yellow());
        for leaf in &group.children {
            println!("    {}  {}", leaf.title, leaf.key.dimmed());
        }
    }
    Ok(())
}
