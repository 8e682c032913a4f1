//! Bracket-citation canonicalization, markdown linking, and node rendering.
//!
//! A citation token is a 1-based integer in `[N]` syntax. Tokens separated
//! only by whitespace form one group and render as a single linked cluster.
//! The anchor format (`#cite-{n}`, `#cite-group-{n1}-{n2}-...`) is a
//! byte-stable contract with the scroll-to-citation feature of the host app.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::node::RenderNode;

/// An ordered run of citation tokens rendered as one linked cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CitationGroup {
    citations: Vec<u32>,
}

impl CitationGroup {
    pub fn new(citations: Vec<u32>) -> Self {
        Self { citations }
    }

    /// Tokens in original left-to-right order.
    pub fn citations(&self) -> &[u32] {
        &self.citations
    }

    /// Anchor for the whole cluster: `#cite-3` or `#cite-group-1-2-...`.
    pub fn anchor(&self) -> String {
        citation_anchor(&self.citations)
    }
}

/// Anchor id for a run of citation tokens. A given token always resolves to
/// the same `cite-{N}` id no matter where it appears.
pub fn citation_anchor(nums: &[u32]) -> String {
    match nums {
        [n] => format!("#cite-{}", n),
        _ => {
            let joined = nums
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join("-");
            format!("#cite-group-{}", joined)
        }
    }
}

static ESCAPED_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\\[\s*(\d+(?:\s*,\s*\d+)*)\s*\\\]").unwrap());
static DOUBLED_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[(\d+)\]\]").unwrap());
static COMMA_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*(\d+(?:\s*,\s*\d+)+)\s*\]").unwrap());
static PADDED_CITATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\s*(\d+)\s*\]").unwrap());
static ADJACENT_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[\d+\])\s+(\[\d+\])").unwrap());

/// Canonicalize citation syntax into clean adjacent `[N]` tokens: strip
/// escaped brackets, collapse `[[N]]`, expand comma groups, trim interior
/// whitespace, and remove whitespace strictly between adjacent tokens.
pub fn normalize_citation_patterns(text: &str) -> String {
    let text = ESCAPED_CITATION.replace_all(text, "[${1}]");
    let text = DOUBLED_CITATION.replace_all(&text, "[${1}]");
    let text = expand_comma_citations(&text);
    let mut text = PADDED_CITATION.replace_all(&text, "[${1}]").into_owned();
    // One replace_all only joins every other pair in a chain like
    // `[1] [2] [3]`; iterate until the chain is fully closed up.
    loop {
        let next = ADJACENT_GAP.replace_all(&text, "${1}${2}").into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    text
}

/// Expand `[1, 2,3]` into `[1][2][3]`. A group already linked to an anchor
/// keeps its `[1,2](...)` form, which makes the pass idempotent.
pub(crate) fn expand_comma_citations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in COMMA_GROUP.captures_iter(text) {
        let m = caps.get(0).expect("group 0 always present");
        if text[m.end()..].starts_with('(') {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        for num in caps[1].split(',') {
            let _ = write!(out, "[{}]", num.trim());
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

static CITATION_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?:\[\d+\])+").unwrap());
static CITATION_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(\d+)\]").unwrap());

/// Convert maximal runs of canonical `[N]` tokens into markdown anchors:
/// `[2]` -> `[2](#cite-2)`, `[1][2]` -> `[1,2](#cite-group-1-2)`.
///
/// Runs already followed by `(#cite-` are skipped, so re-running the function
/// on its own output is a no-op — required because the growing stream buffer
/// is reprocessed from scratch on every chunk.
pub fn convert_citations_to_markdown_links(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in CITATION_RUN.find_iter(text) {
        if text[m.end()..].starts_with("(#cite-") {
            continue;
        }
        let nums: Option<Vec<u32>> = CITATION_TOKEN
            .captures_iter(m.as_str())
            .map(|c| c[1].parse().ok())
            .collect();
        // A number too large for u32 is not a citation token; leave the whole
        // run as literal text rather than dropping anything.
        let Some(nums) = nums else {
            continue;
        };
        out.push_str(&text[last..m.start()]);
        let label = nums
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let _ = write!(out, "[{}]({})", label, citation_anchor(&nums));
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Node-tree counterpart of [`convert_citations_to_markdown_links`], for the
/// path that emits renderable nodes instead of markdown source. Contiguous
/// `[N]` tokens (whitespace-only gaps) merge into one citation group node;
/// everything in between becomes plain text nodes.
pub fn render_citation_nodes(text: &str) -> Vec<RenderNode> {
    let text = normalize_citation_patterns(text);
    let mut nodes = Vec::new();
    let mut group: Vec<u32> = Vec::new();
    let mut last = 0;
    for caps in CITATION_TOKEN.captures_iter(&text) {
        let m = caps.get(0).expect("group 0 always present");
        let Ok(n) = caps[1].parse::<u32>() else {
            continue;
        };
        let gap = &text[last..m.start()];
        if !group.is_empty() && gap.chars().all(char::is_whitespace) {
            group.push(n);
        } else {
            if !group.is_empty() {
                nodes.push(flush_group(&mut group));
            }
            if !gap.is_empty() {
                nodes.push(RenderNode::Text(gap.to_string()));
            }
            group.push(n);
        }
        last = m.end();
    }
    if !group.is_empty() {
        nodes.push(flush_group(&mut group));
    }
    if last < text.len() {
        nodes.push(RenderNode::Text(text[last..].to_string()));
    }
    nodes
}

fn flush_group(group: &mut Vec<u32>) -> RenderNode {
    RenderNode::Citations(CitationGroup::new(std::mem::take(group)))
}
