use pretty_assertions::assert_eq;

use super::*;
use crate::citations::CitationGroup;
use crate::math::TypesetError;
use crate::node::MathNode;

fn echo(latex: &str, display: bool) -> Result<String, TypesetError> {
    Ok(format!("<math display={}>{}</math>", display, latex))
}

#[test]
fn citations_and_dollar_amounts_end_to_end() {
    let nodes = render_text_with_math_and_citations("The sky is blue [1][2]. Cost is $10.", &echo);
    assert_eq!(
        nodes,
        vec![
            RenderNode::Text("The sky is blue ".to_string()),
            RenderNode::Citations(CitationGroup::new(vec![1, 2])),
            RenderNode::Text(". Cost is $10.".to_string()),
        ]
    );
}

#[test]
fn display_math_end_to_end() {
    let nodes = render_text_with_math_and_citations("Energy: $$E=mc^2$$", &echo);
    assert_eq!(
        nodes,
        vec![
            RenderNode::Text("Energy: ".to_string()),
            RenderNode::Math(MathNode {
                latex: "E=mc^2".to_string(),
                display: true,
                typeset: "<math display=true>E=mc^2</math>".to_string(),
            }),
        ]
    );
}

#[test]
fn citation_syntax_inside_math_is_not_linked() {
    let nodes = render_text_with_math_and_citations("$a_{[1]}$", &echo);
    assert_eq!(nodes.len(), 1);
    assert!(matches!(&nodes[0], RenderNode::Math(m) if m.latex == "a_{[1]}"));
}

#[test]
fn comma_groups_are_normalized_before_rendering() {
    let nodes = render_text_with_math_and_citations("see [1, 2]", &echo);
    assert_eq!(
        nodes,
        vec![
            RenderNode::Text("see ".to_string()),
            RenderNode::Citations(CitationGroup::new(vec![1, 2])),
        ]
    );
}

#[test]
fn plain_text_renders_as_single_text_node() {
    let nodes = render_text_with_math_and_citations("just words", &echo);
    assert_eq!(nodes, vec![RenderNode::Text("just words".to_string())]);
}

#[test]
fn strips_unmatched_closing_tag() {
    assert_eq!(strip_unmatched_closing_tags("hello</thinking>"), "hello");
}

#[test]
fn keeps_matched_closing_tag() {
    let text = "<b>bold</b>";
    assert_eq!(strip_unmatched_closing_tags(text), text);
}

#[test]
fn opener_name_must_match_exactly() {
    // `<br>` must not satisfy `</b>`.
    assert_eq!(strip_unmatched_closing_tags("a<br>b</b>"), "a<br>b");
}

#[test]
fn strips_trailing_partial_tag() {
    assert_eq!(strip_unmatched_closing_tags("text </thin"), "text ");
    assert_eq!(strip_unmatched_closing_tags("text <su"), "text ");
}

#[test]
fn keeps_comparison_signs() {
    assert_eq!(strip_unmatched_closing_tags("a < 5 and b > 2"), "a < 5 and b > 2");
}

#[test]
fn tag_stripping_is_idempotent() {
    for text in ["hello</thinking>", "text </thin", "<b>x</b>"] {
        let once = strip_unmatched_closing_tags(text);
        assert_eq!(strip_unmatched_closing_tags(&once), once);
    }
}

#[test]
fn normalize_streamed_text_links_citations() {
    assert_eq!(
        normalize_streamed_text("Blue [1] [2]."),
        "Blue [1,2](#cite-group-1-2)."
    );
}

#[test]
fn normalize_streamed_text_keeps_citations_out_of_math() {
    // Escaped citations stay citations; escaped display delimiters become $$.
    assert_eq!(
        normalize_streamed_text(r"fact \[1\] and \[x+y\]"),
        "fact [1](#cite-1) and $$x+y$$"
    );
}

#[test]
fn normalize_streamed_text_repairs_escaped_markdown() {
    assert_eq!(normalize_streamed_text("\\# Title"), "# Title");
}

#[test]
fn normalize_streamed_text_is_idempotent() {
    let samples = [
        "Blue [1] [2]. Cost is $10.",
        r"fact \[1\] and \[x+y\]",
        "\\# Title\\n\\n\\- item",
        "Hello &am",
        "a&#32;b and (*two words*)",
        "[[3]] then [1, 2,3]",
    ];
    for text in samples {
        let once = normalize_streamed_text(text);
        assert_eq!(normalize_streamed_text(&once), once, "input: {:?}", text);
    }
}

#[test]
fn growing_buffer_converges_without_garbage() {
    // Simulate streaming: the full buffer's output must equal the output of
    // normalizing the already-normalized prefix plus the remaining raw tail.
    let full = "Result &amp; proof $$E=mc^2$$ shown [1, 2].";
    let split = full.len() - 10;
    let prefix_normalized = normalize_streamed_text(&full[..split]);
    let recombined = format!("{}{}", prefix_normalized, &full[split..]);
    assert_eq!(
        normalize_streamed_text(&recombined),
        normalize_streamed_text(full)
    );
}

#[test]
fn every_prefix_normalizes_cleanly() {
    // Streaming re-invocation: any prefix of the buffer may end mid-entity,
    // mid-citation, mid-tag, or mid-LaTeX and must still normalize.
    let full = "Sum &amp; detail \\[1, 2\\] gives $$E=mc^2$$ for $n$ runs</note>";
    for (i, _) in full.char_indices() {
        let out = normalize_streamed_text(&full[..i]);
        assert_eq!(normalize_streamed_text(&out), out, "prefix len {}", i);
    }
}

#[test]
fn mid_entity_prefix_never_shows_partial_entity() {
    let out = normalize_streamed_text("Result &am");
    assert_eq!(out, "Result ");
}
