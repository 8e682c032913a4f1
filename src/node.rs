//! Render node tree produced by the pipeline and consumed by the view layer.

use serde::Serialize;

use crate::citations::CitationGroup;

/// One node of rendered output. A produced sequence is immutable and handed
/// to the view layer exactly once; the pipeline never caches or mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RenderNode {
    /// Literal text, passed through to the markdown renderer unchanged.
    Text(String),
    /// An explicit hard line break.
    LineBreak,
    /// A linked citation cluster, rendered by the CitationGroup view.
    Citations(CitationGroup),
    /// A successfully typeset math span.
    Math(MathNode),
    /// Plain-text stand-in for a math span the widget failed to typeset.
    MathFallback(MathFallback),
}

/// A typeset math span. `typeset` is the widget's output and opaque here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathNode {
    pub latex: String,
    pub display: bool,
    pub typeset: String,
}

/// Visibly marked fallback carrying the raw LaTeX; the view surfaces `error`
/// as a tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MathFallback {
    pub latex: String,
    pub display: bool,
    pub error: String,
}
