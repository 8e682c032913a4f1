//! Hard line break conversion for the node-tree path.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::RenderNode;

static STRAY_BACKSLASH_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\+[ \t]+").unwrap());
static HARD_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?: {2,}|\\)\n").unwrap());

/// Convert explicit hard-break markers — two-or-more trailing spaces, or a
/// single backslash, immediately before a newline — into line-break nodes.
/// Stray backslash+horizontal-space runs from some providers collapse into a
/// single space first. Ordinary newlines without a marker stay literal text.
pub fn apply_hard_line_breaks(text: &str) -> Vec<RenderNode> {
    let collapsed = STRAY_BACKSLASH_SPACE.replace_all(text, " ");
    let text: &str = collapsed.as_ref();
    let mut nodes = Vec::new();
    let mut last = 0;
    for m in HARD_BREAK.find_iter(&text) {
        if last < m.start() {
            nodes.push(RenderNode::Text(text[last..m.start()].to_string()));
        }
        nodes.push(RenderNode::LineBreak);
        last = m.end();
    }
    if last < text.len() {
        nodes.push(RenderNode::Text(text[last..].to_string()));
    }
    nodes
}
