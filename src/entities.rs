//! HTML entity handling for streamed text: trailing-entity buffering and
//! minimal whitespace-entity decoding.

/// Trim a trailing incomplete HTML entity so a still-arriving reference never
/// flashes as literal text.
///
/// A trailing `&` followed by up to 6 hex/decimal digits (numeric form) or up
/// to 10 letters (named form), with no terminating `;`, is cut from the
/// output. Only that partial run is removed; once the entity terminates or
/// more characters disprove entity-ness, the tail reappears in full on the
/// next call.
pub fn buffer_incomplete_entities(text: &str) -> &str {
    // Fast path: most chunks carry no entities at all.
    let Some(amp) = text.rfind('&') else {
        return text;
    };
    let tail = &text[amp..];
    if tail.contains(';') {
        // Terminated, possibly a real entity: nothing to hide.
        return text;
    }
    if tail.len() > 1 && is_entity_prefix(tail) {
        log::trace!("buffering incomplete entity tail {:?}", tail);
        return &text[..amp];
    }
    text
}

/// Whether `tail` (starting at `&`) could still grow into a valid entity.
fn is_entity_prefix(tail: &str) -> bool {
    let rest = &tail[1..];
    if let Some(numeric) = rest.strip_prefix('#') {
        let digits = numeric.strip_prefix(['x', 'X']).unwrap_or(numeric);
        digits.len() <= 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
    } else {
        rest.len() <= 10 && rest.chars().all(|c| c.is_ascii_alphabetic())
    }
}

/// Decode only the numeric space and newline entities.
///
/// General entity decoding is deliberately avoided: reintroducing characters
/// like `<` or `&` here would corrupt the markdown parse downstream.
pub fn decode_whitespace_entities(text: &str) -> String {
    text.replace("&#32;", " ")
        .replace("&#x20;", " ")
        .replace("&#10;", "\n")
        .replace("&#x0A;", "\n")
        .replace("&#x0a;", "\n")
}
