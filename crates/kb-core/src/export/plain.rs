//! Plain-text derivation

use crate::markdown::RenderedOutput;
use crate::types::MarkdownDocument;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Shortest run from one triple backtick to the next, across lines
static FENCED_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)```.*?```").unwrap());

/// How "plain text" is derived from a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlainTextPolicy {
    /// Remove fenced code regions from the source, keep everything else
    #[default]
    #[serde(alias = "strip")]
    StripFencedBlocks,
    /// Text content of the rendered tree
    #[serde(alias = "flatten")]
    FlattenRendered,
}

impl PlainTextPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlainTextPolicy::StripFencedBlocks => "strip-fenced-blocks",
            PlainTextPolicy::FlattenRendered => "flatten-rendered",
        }
    }
}

impl fmt::Display for PlainTextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlainTextPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip" | "strip-fenced-blocks" => Ok(PlainTextPolicy::StripFencedBlocks),
            "flatten" | "flatten-rendered" => Ok(PlainTextPolicy::FlattenRendered),
            other => Err(format!("Unknown plain text policy: {}", other)),
        }
    }
}

/// Source with every fenced region removed
///
/// Matching is non-greedy, so each region ends at the next triple backtick.
/// An unterminated fence is left alone.
pub fn strip_fenced_blocks(source: &str) -> String {
    FENCED_BLOCK_RE.replace_all(source, "").into_owned()
}

/// Plain text of a document under `policy`
pub fn plain_text(
    document: &MarkdownDocument,
    output: &RenderedOutput,
    policy: PlainTextPolicy,
) -> String {
    match policy {
        PlainTextPolicy::StripFencedBlocks => strip_fenced_blocks(document.source()),
        PlainTextPolicy::FlattenRendered => output.text_content(),
    }
}
