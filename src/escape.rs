//! Repair of provider-escaped markdown and math delimiter canonicalization.

use std::sync::LazyLock;

use regex::Regex;

static DISPLAY_DELIM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\\\[(.*?)\\\]").unwrap());
static INLINE_DELIM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\\((.*?)\\\)").unwrap());

/// Rewrite `\[...\]` / `\(...\)` math delimiters to canonical `$$...$$` /
/// `$...$`. Must run before math detection so downstream logic only has to
/// understand `$` delimiters.
pub fn normalize_math_delimiters(text: &str) -> String {
    let text = DISPLAY_DELIM.replace_all(text, |c: &regex::Captures| format!("$${}$$", &c[1]));
    INLINE_DELIM
        .replace_all(&text, |c: &regex::Captures| format!("${}$", &c[1]))
        .into_owned()
}

static ESCAPED_BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^( {0,3})\\([#>|*+`-])").unwrap());
static ESCAPED_ORDERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^( {0,3})(\d{1,9})\\\.").unwrap());
static EMPHASIS_STRAY_BACKSLASH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*{1,2}[^*\n]+\*{1,2})\\+([ \t])").unwrap());
static BACKSLASH_BEFORE_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\+[ \t\x{00A0}\x{2007}\x{202F}\x{200B}\x{FEFF}]").unwrap()
});

/// Repair provider-specific over-escaping of markdown control characters.
///
/// Passes run in a fixed order; only markdown-level escaping is repaired
/// here, so LaTeX escapes inside math spans detected later survive intact.
pub fn normalize_escaped_markdown(text: &str) -> String {
    // 1. Over-escaped single-line payload: the whole message arrived with
    //    literal \n markers instead of real newlines. The threshold of two
    //    occurrences is inherited behavior; do not re-derive.
    let mut text = if !text.contains('\n') && text.matches("\\n").count() >= 2 {
        log::debug!("converting literal \\n markers in single-line payload");
        text.replace("\\r\\n", "\n").replace("\\n", "\n")
    } else {
        text.to_string()
    };
    // 2. Escaped block constructs at true line starts (<=3 leading spaces).
    text = ESCAPED_BLOCK_START.replace_all(&text, "${1}${2}").into_owned();
    text = ESCAPED_ORDERED_ITEM.replace_all(&text, "${1}${2}.").into_owned();
    // 3. Citation brackets.
    text = text.replace("\\[", "[").replace("\\]", "]");
    // 4. Stray backslash between an emphasis span and following whitespace.
    text = EMPHASIS_STRAY_BACKSLASH
        .replace_all(&text, "${1}${2}")
        .into_owned();
    // 5. Remaining backslash runs before horizontal/invisible whitespace.
    BACKSLASH_BEFORE_SPACE.replace_all(&text, " ").into_owned()
}

static PAREN_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\*[^*\n]+\*)\)").unwrap());

/// Remove parentheses wrapping a multi-word emphasis span:
/// `(*word word*)` -> `*word word*`. Single-word emphasis in parentheses is
/// left alone; that usage is usually intentional ("(see *above*)").
pub fn strip_paren_wrapped_emphasis(text: &str) -> String {
    PAREN_EMPHASIS
        .replace_all(text, |c: &regex::Captures| {
            let inner = &c[1];
            if inner.trim_matches('*').chars().any(char::is_whitespace) {
                inner.to_string()
            } else {
                c[0].to_string()
            }
        })
        .into_owned()
}
