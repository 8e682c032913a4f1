//! Pipeline composition: the string path that produces markdown source, and
//! the orchestrator that produces the final node tree.

use std::sync::LazyLock;

use regex::Regex;

use crate::citations;
use crate::entities;
use crate::escape;
use crate::math::{self, MathSegment, MathTypesetter};
use crate::node::RenderNode;

static CLOSING_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</([a-zA-Z][a-zA-Z0-9-]*)>").unwrap());
static TRAILING_PARTIAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[a-zA-Z][^<>]*$").unwrap());

/// Remove closing HTML-like tags that never had an opener, plus a trailing
/// tag cut off mid-`<...>` — both artifacts of a stream truncated mid-tag.
pub fn strip_unmatched_closing_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in CLOSING_TAG.captures_iter(text) {
        let m = caps.get(0).expect("group 0 always present");
        let opener = format!("<{}", &caps[1]);
        let has_opener = text[..m.start()].match_indices(&opener).any(|(idx, _)| {
            // The opener name must end here: `<b` inside `<br>` is no opener for </b>.
            text[idx + opener.len()..]
                .chars()
                .next()
                .is_none_or(|c| c == '>' || c == '/' || c.is_whitespace())
        });
        if has_opener {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        last = m.end();
    }
    out.push_str(&text[last..]);
    TRAILING_PARTIAL_TAG.replace(&out, "").into_owned()
}

/// Full string-path normalization producing markdown for an external
/// renderer. Pure and idempotent: the caller re-runs it over the whole
/// accumulated buffer after every streamed chunk.
///
/// Citation escapes are stripped before math delimiters are rewritten so
/// `\[1\]` stays a citation while `\[x+y\]` becomes `$$x+y$$`; the global
/// bracket unescape inside [`escape::normalize_escaped_markdown`] then only
/// sees non-math brackets.
pub fn normalize_streamed_text(text: &str) -> String {
    let text = entities::buffer_incomplete_entities(text);
    let text = entities::decode_whitespace_entities(text);
    let text = citations::normalize_citation_patterns(&text);
    let text = escape::normalize_math_delimiters(&text);
    let text = escape::normalize_escaped_markdown(&text);
    let text = escape::strip_paren_wrapped_emphasis(&text);
    let text = citations::normalize_citation_patterns(&text);
    citations::convert_citations_to_markdown_links(&text)
}

/// Render streamed text into the final node tree in one pass: math segments
/// go to the typesetter, the literal spans in between go to the citation
/// renderer. Citation syntax inside a math span is never reinterpreted,
/// because math extraction happens first.
pub fn render_text_with_math_and_citations(
    text: &str,
    engine: &dyn MathTypesetter,
) -> Vec<RenderNode> {
    let text = strip_unmatched_closing_tags(text);
    let text = citations::expand_comma_citations(&text);
    let mut nodes = Vec::new();
    for segment in math::segment_math(&text) {
        match segment {
            MathSegment::Text(t) => nodes.extend(citations::render_citation_nodes(t)),
            MathSegment::Math { latex, display } => {
                nodes.push(math::render_math_segment(latex, display, engine));
            }
        }
    }
    nodes
}

#[cfg(test)]
mod tests;
