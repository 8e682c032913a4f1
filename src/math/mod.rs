//! Math span detection, LaTeX unescaping, and typesetting glue.
//!
//! Detection is a single forward scan with no shared matcher state, so
//! re-entrant or concurrent calls are safe. Display math `$$...$$` takes
//! precedence over inline `$...$`; the inline tie-break rules exist to keep
//! prices like `$10 and $20` out of the typesetter while still accepting
//! `$2$` and `$2p$`.

use thiserror::Error;

use crate::node::{MathFallback, MathNode, RenderNode};

/// Error reported by an external typesetting widget.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TypesetError(pub String);

/// Boundary to the external math-typesetting widget. `typeset` renders a
/// LaTeX string in inline or display mode and returns the widget's opaque
/// output. Errors never cross this seam upward: the pipeline converts them
/// into fallback nodes at the call site.
pub trait MathTypesetter {
    fn typeset(&self, latex: &str, display: bool) -> Result<String, TypesetError>;
}

impl<F> MathTypesetter for F
where
    F: Fn(&str, bool) -> Result<String, TypesetError>,
{
    fn typeset(&self, latex: &str, display: bool) -> Result<String, TypesetError> {
        self(latex, display)
    }
}

/// A scanned span: literal text or a math segment awaiting typesetting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MathSegment<'a> {
    Text(&'a str),
    Math { latex: &'a str, display: bool },
}

/// Scan `text` into alternating literal and math segments.
pub(crate) fn segment_math(text: &str) -> Vec<MathSegment<'_>> {
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }
        // Display math first: $$...$$ with no inner $, newlines allowed.
        if bytes[i..].starts_with(b"$$") {
            if let Some(rel) = text[i + 2..].find("$$") {
                let latex = &text[i + 2..i + 2 + rel];
                if !latex.is_empty() && !latex.contains('$') {
                    if plain_start < i {
                        segments.push(MathSegment::Text(&text[plain_start..i]));
                    }
                    segments.push(MathSegment::Math { latex, display: true });
                    i += rel + 4;
                    plain_start = i;
                    continue;
                }
            }
            i += 2;
            continue;
        }
        if !valid_inline_open(text, i) {
            i += 1;
            continue;
        }
        if let Some((end, latex)) = find_inline_close(text, i) {
            if plain_start < i {
                segments.push(MathSegment::Text(&text[plain_start..i]));
            }
            segments.push(MathSegment::Math { latex, display: false });
            i = end;
            plain_start = i;
        } else {
            i += 1;
        }
    }
    if plain_start < text.len() {
        segments.push(MathSegment::Text(&text[plain_start..]));
    }
    segments
}

/// An inline opener must sit at the start of the string or after whitespace
/// or a non-word, non-`$` character.
fn valid_inline_open(text: &str, i: usize) -> bool {
    match text[..i].chars().next_back() {
        None => true,
        Some(c) => !(c == '$' || c == '_' || c.is_alphanumeric()),
    }
}

/// Find the closing `$` for an inline span opened at `open`. The content may
/// not be empty or contain `$`/newline, and the closer may not be followed by
/// a digit — that last rule is what keeps `$10 and $20` out of math.
fn find_inline_close(text: &str, open: usize) -> Option<(usize, &str)> {
    let rest = &text[open + 1..];
    let rel = rest.find('$')?;
    let latex = &rest[..rel];
    if latex.is_empty() || latex.contains('\n') {
        return None;
    }
    let end = open + rel + 2;
    if text[end..].chars().next().is_some_and(|c| c.is_ascii_digit()) {
        return None;
    }
    Some((end, latex))
}

/// Undo markdown-level escaping that is safe to strip from LaTeX: `\_` and
/// `\*`. Brace and bracket escapes carry real LaTeX meaning and stay.
pub fn unescape_latex(latex: &str) -> String {
    latex.replace("\\_", "_").replace("\\*", "*")
}

/// Typeset one segment, degrading to a fallback node on widget error. The
/// fallback carries the raw LaTeX and the error text for the view to surface
/// as a tooltip; nothing is ever re-thrown or dropped.
pub(crate) fn render_math_segment(
    latex: &str,
    display: bool,
    engine: &dyn MathTypesetter,
) -> RenderNode {
    let latex = unescape_latex(latex);
    match engine.typeset(&latex, display) {
        Ok(typeset) => RenderNode::Math(MathNode {
            latex,
            display,
            typeset,
        }),
        Err(e) => {
            log::debug!("math typesetting failed for {:?}: {}", latex, e);
            RenderNode::MathFallback(MathFallback {
                latex,
                display,
                error: e.to_string(),
            })
        }
    }
}

/// Render `text` as alternating text and math nodes, or `None` when no math
/// span is detected at all.
pub fn try_render_math(text: &str, engine: &dyn MathTypesetter) -> Option<Vec<RenderNode>> {
    let segments = segment_math(text);
    if !segments
        .iter()
        .any(|s| matches!(s, MathSegment::Math { .. }))
    {
        return None;
    }
    Some(
        segments
            .into_iter()
            .map(|seg| match seg {
                MathSegment::Text(t) => RenderNode::Text(t.to_string()),
                MathSegment::Math { latex, display } => {
                    render_math_segment(latex, display, engine)
                }
            })
            .collect(),
    )
}

/// Alternative strategy for generic markdown renderers: wrap each detected
/// math span in a backtick code span so the renderer's own escaping leaves
/// the LaTeX alone. Existing backtick spans are split off first and copied
/// verbatim, so re-running never double-wraps.
pub fn wrap_math_in_code_spans(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    for piece in split_on_backtick_spans(text) {
        match piece {
            BacktickPiece::Code(code) => out.push_str(code),
            BacktickPiece::Plain(plain) => {
                for seg in segment_math(plain) {
                    match seg {
                        MathSegment::Text(t) => out.push_str(t),
                        MathSegment::Math { latex, display } => {
                            let delim = if display { "$$" } else { "$" };
                            out.push('`');
                            out.push_str(delim);
                            out.push_str(latex);
                            out.push_str(delim);
                            out.push('`');
                        }
                    }
                }
            }
        }
    }
    out
}

#[derive(Debug)]
enum BacktickPiece<'a> {
    Plain(&'a str),
    /// A balanced backtick span, delimiters included.
    Code(&'a str),
}

fn split_on_backtick_spans(text: &str) -> Vec<BacktickPiece<'_>> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut plain_start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        let fence = &text[run_start..i];
        // An unbalanced run (still streaming in) stays plain text.
        if let Some(rel) = text[i..].find(fence) {
            if plain_start < run_start {
                pieces.push(BacktickPiece::Plain(&text[plain_start..run_start]));
            }
            let end = i + rel + fence.len();
            pieces.push(BacktickPiece::Code(&text[run_start..end]));
            i = end;
            plain_start = i;
        }
    }
    if plain_start < text.len() {
        pieces.push(BacktickPiece::Plain(&text[plain_start..]));
    }
    pieces
}
