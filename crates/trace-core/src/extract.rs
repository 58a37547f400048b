//! Workflow reference extraction from trace text
//!
//! This is a heuristic over free text, not a parser. A line qualifies when it
//! carries a workflow marker (`workflow`, `WF-`, any case) or a parenthesised
//! run of six or more digits with no module/form context. Every six-plus digit
//! run on a qualifying line becomes a candidate, minus:
//!
//! - portal IDs, i.e. numbers that appear anywhere in the document inside a
//!   `workflows/<digits>/` URL segment
//! - portal numbers written as `<portal-prefix>-<digits>` on the same line
//! - any number on a line that mentions a CMS module or form

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

/// Six or more consecutive digits, bounded on both sides
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{6,})\b").unwrap());

/// `(123456)` style reference
static PARENTHESISED_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\d{6,}\)").unwrap());

/// Portal URL segment; the captured digits identify a website instance
static PORTAL_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"workflows/(\d+)/").unwrap());

static WORKFLOW_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)workflow|\bwf-").unwrap());

/// Words tying a number to a non-workflow asset
static ASSET_CONTEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:modules?|forms?)\b").unwrap());

/// Portal slug used by the exports this tool was first written against
pub const DEFAULT_PORTAL_PREFIX: &str = "hjpetro";

/// Extracts candidate workflow identifiers from trace text.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    portal_prefixes: Vec<String>,
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new(vec![DEFAULT_PORTAL_PREFIX.to_string()])
    }
}

impl ReferenceExtractor {
    pub fn new(portal_prefixes: Vec<String>) -> Self {
        Self { portal_prefixes }
    }

    /// Every number embedded in a `workflows/<digits>/` URL anywhere in `text`.
    pub fn portal_ids(text: &str) -> BTreeSet<String> {
        PORTAL_URL
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .collect()
    }

    /// Whether `line` is eligible to contribute candidates at all.
    pub fn is_reference_line(line: &str) -> bool {
        WORKFLOW_MARKER.is_match(line)
            || (PARENTHESISED_RUN.is_match(line) && !ASSET_CONTEXT.is_match(line))
    }

    /// Extract the sorted, de-duplicated set of candidate workflow IDs.
    pub fn extract(&self, text: &str) -> BTreeSet<String> {
        let portal_ids = Self::portal_ids(text);
        let mut ids = BTreeSet::new();

        for line in text.lines() {
            if !Self::is_reference_line(line) || ASSET_CONTEXT.is_match(line) {
                continue;
            }
            for caps in DIGIT_RUN.captures_iter(line) {
                let candidate = &caps[1];
                if portal_ids.contains(candidate) {
                    tracing::debug!(id = candidate, "Skipping portal ID");
                    continue;
                }
                if self.is_portal_number(line, candidate) {
                    tracing::debug!(id = candidate, "Skipping portal number");
                    continue;
                }
                ids.insert(candidate.to_string());
            }
        }

        tracing::debug!(count = ids.len(), "Extracted workflow references");
        ids
    }

    fn is_portal_number(&self, line: &str, candidate: &str) -> bool {
        self.portal_prefixes
            .iter()
            .any(|prefix| line.contains(&format!("{}-{}", prefix, candidate)))
    }
}
