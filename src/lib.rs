//! Text-normalization and rendering core for streamed chat responses.
//!
//! Assistant text arrives token by token and the caller re-runs this pipeline
//! over the whole accumulated buffer after every chunk — there is no diffing.
//! Every pass is therefore a pure function of its input, idempotent, and
//! trims rather than guesses at incomplete trailing constructs. No pass ever
//! errors on malformed input: unrecognized syntax passes through as literal
//! text, and math typesetting failures degrade to a visible fallback node.
//!
//! Two output paths:
//! - string path: [`normalize_streamed_text`] produces markdown source for an
//!   external markdown renderer;
//! - node path: [`render_text_with_math_and_citations`] produces a
//!   [`RenderNode`] tree directly, typesetting math through a caller-supplied
//!   [`MathTypesetter`].

pub mod breaks;
pub mod citations;
pub mod entities;
pub mod escape;
pub mod math;
pub mod node;
pub mod render;

pub use breaks::apply_hard_line_breaks;
pub use citations::{
    CitationGroup, citation_anchor, convert_citations_to_markdown_links,
    normalize_citation_patterns, render_citation_nodes,
};
pub use entities::{buffer_incomplete_entities, decode_whitespace_entities};
pub use escape::{
    normalize_escaped_markdown, normalize_math_delimiters, strip_paren_wrapped_emphasis,
};
pub use math::{
    MathTypesetter, TypesetError, try_render_math, unescape_latex, wrap_math_in_code_spans,
};
pub use node::{MathFallback, MathNode, RenderNode};
pub use render::{
    normalize_streamed_text, render_text_with_math_and_citations, strip_unmatched_closing_tags,
};
