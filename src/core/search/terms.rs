//! Command text tokenizer.
//!
//! Splits the text after the command verb into positive and negative
//! terms. Tokens are separated by single spaces; a token may be wrapped
//! in `'` or `"`, and only the quote that opened a span can close it,
//! so the other quote is plain content inside. A leading `-` marks an
//! exclusion. Malformed quoting never fails: an unmatched quote is
//! dropped and whatever was collected before it is still kept.

use crate::core::types::ParsedQuery;

/// Parse a raw query string into positive and negative terms.
///
/// Case is preserved; folding happens when the filter is compiled.
///
/// # Examples
///
/// ```
/// use romfinder::core::search::parse_terms;
///
/// let parsed = parse_terms("\"a b\" -c");
/// assert_eq!(parsed.positives, vec!["a b"]);
/// assert_eq!(parsed.negatives, vec!["c"]);
/// ```
pub fn parse_terms(query: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery::default();

    for token in tokenize(query) {
        match token.strip_prefix('-') {
            Some(rest) if !rest.trim().is_empty() => parsed.negatives.push(rest.to_string()),
            // A bare "-" carries no term
            Some(_) => {}
            None if !token.trim().is_empty() => parsed.positives.push(token),
            None => {}
        }
    }

    parsed
}

/// Split on unquoted spaces, honoring `'` and `"` spans
fn tokenize(query: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut open_quote: Option<char> = None;

    for c in query.chars() {
        match (c, open_quote) {
            ('"' | '\'', Some(q)) if c == q => {
                flush(&mut current, &mut tokens);
                open_quote = None;
            }
            ('"' | '\'', None) => open_quote = Some(c),
            (' ', None) => flush(&mut current, &mut tokens),
            _ => current.push(c),
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}
