//! Render command
//!
//! Render a markdown file to HTML, plain text or highlighted tokens.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use kb_core::export::{plain_text, PlainTextPolicy};
use kb_core::markdown::{Block, HighlightedCode, MarkdownRenderer, RenderedOutput};
use kb_core::theme::Theme;

use super::{load_config, read_document};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// HTML without copy controls
    Html,
    /// Plain text under the plain-text policy
    Text,
    /// Highlighted code tokens as JSON
    Tokens,
}

/// Arguments for the render command
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Markdown file (`-` for stdin)
    pub file: PathBuf,

    /// Output format
    #[arg(long, short, value_enum, default_value = "html")]
    pub format: RenderFormat,

    /// Plain-text policy (overrides the config)
    #[arg(long)]
    pub policy: Option<PlainTextPolicy>,

    /// Code palette theme
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Keep copy controls in the HTML output
    #[arg(long)]
    pub with_controls: bool,

    /// Output file path (stdout if not specified)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CodeTokens<'a> {
    language: Option<&'a str>,
    #[serde(flatten)]
    code: &'a HighlightedCode,
}

/// Execute the render command
pub fn execute(args: RenderArgs, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let theme = args.theme.unwrap_or(config.ui.theme);
    let policy = args.policy.unwrap_or(config.render.plain_text_policy);

    let document = read_document(&args.file)?;
    let renderer = MarkdownRenderer::with_options(config.render_options(theme));
    let output = renderer.render(&document);

    let content = match args.format {
        RenderFormat::Html if args.with_controls => output.display_html(),
        RenderFormat::Html => output.export_html(),
        RenderFormat::Text => plain_text(&document, &output, policy),
        RenderFormat::Tokens => tokens_json(&output)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            use colored::Colorize;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            if !content.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }

    Ok(())
}

/// Highlighted code blocks of the document, outermost first
fn tokens_json(output: &RenderedOutput) -> Result<String> {
    let mut blocks = Vec::new();
    collect_code(output.blocks(), &mut blocks);
    Ok(serde_json::to_string_pretty(&blocks)?)
}

fn collect_code<'a>(blocks: &'a [Block], out: &mut Vec<CodeTokens<'a>>) {
    for block in blocks {
        match block {
            Block::CodeBlock(code) => {
                if let Some(highlighted) = &code.highlighted {
                    out.push(CodeTokens {
                        language: code.language.as_deref(),
                        code: highlighted,
                    });
                }
            }
            Block::BlockQuote(inner) | Block::FootnoteDefinition { blocks: inner, .. } => {
                collect_code(inner, out)
            }
            Block::List(list) => {
                for item in &list.items {
                    collect_code(&item.blocks, out);
                }
            }
            _ => {}
        }
    }
}
