//! Inline math extraction and math/prose disambiguation.

use crate::delimiter::{Delimiter, INLINE_MATH, find_next_close, find_next_open};
use crate::types::MathToken;

pub(crate) const PLACEHOLDER_PREFIX: &str = "ZZZMATHPLACEHOLDER";
pub(crate) const PLACEHOLDER_SUFFIX: &str = "ZZZ";

/// Spans longer than this are prose, not inline math. Pinned: downstream
/// tests depend on the exact cutoff.
pub const MAX_INLINE_SPAN_CHARS: usize = 120;

/// Replace accepted inline math spans (`\(..\)`, `$..$`) with per-call
/// placeholders, returning the rewritten text and the tokens in
/// left-to-right order.
///
/// Rejected candidates (empty or newline-spanning interiors, currency
/// amounts, environments, prose coincidentally wrapped in dollar signs)
/// are preserved verbatim. An unterminated opener keeps the remainder
/// literal and stops the scan.
pub fn extract_inline_math(text: &str) -> (String, Vec<MathToken>) {
    let mut extractor = MathExtractor::new();
    let rewritten = extractor.extract(text);
    (rewritten, extractor.into_tokens())
}

/// Substitute each token's placeholder back as `$latex$`.
pub fn resolve_placeholders(text: &str, tokens: &[MathToken]) -> String {
    let mut out = text.to_string();
    for token in tokens {
        if out.contains(token.placeholder.as_str()) {
            out = out.replace(token.placeholder.as_str(), &format!("${}$", token.latex));
        }
    }
    out
}

/// Shared placeholder counter so tokens stay unique and ordered across all
/// markdown chunks of one segmentation call.
#[derive(Debug, Default)]
pub(crate) struct MathExtractor {
    next_index: usize,
    tokens: Vec<MathToken>,
}

impl MathExtractor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn into_tokens(self) -> Vec<MathToken> {
        self.tokens
    }

    pub(crate) fn extract(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0usize;
        while cursor < text.len() {
            let Some((open, delim)) = find_next_open(text, cursor, INLINE_MATH) else {
                break;
            };
            out.push_str(&text[cursor..open.start]);
            cursor = open.start;

            if delim.open == "$" {
                if let Some(end) = leading_currency_amount(text, open.end) {
                    // A price sign, not an opener.
                    out.push_str(&text[open.start..end]);
                    cursor = end;
                    continue;
                }
            }

            let Some(close) = find_next_close(text, open.end, delim) else {
                // Unterminated: opener and remainder stay literal.
                break;
            };

            let interior = &text[open.end..close.start];
            if accept_span(delim, interior) {
                let placeholder =
                    format!("{PLACEHOLDER_PREFIX}{}{PLACEHOLDER_SUFFIX}", self.next_index);
                self.next_index += 1;
                self.tokens.push(MathToken {
                    placeholder: placeholder.clone(),
                    latex: interior.trim().to_string(),
                });
                out.push_str(&placeholder);
            } else {
                out.push_str(&text[open.start..close.end]);
            }
            cursor = close.end;
        }
        out.push_str(&text[cursor..]);
        out
    }
}

fn accept_span(delim: &Delimiter, interior: &str) -> bool {
    let trimmed = interior.trim();
    if trimmed.is_empty() {
        return false;
    }
    if interior.contains('\n') {
        return false;
    }
    if trimmed.contains("\\begin{") || trimmed.contains("\\end{") {
        return false;
    }
    if delim.open == "$" {
        if is_currency_amount(trimmed) {
            return false;
        }
        return looks_like_math(trimmed);
    }
    // `\(..\)` is an explicit math request; no further vetting.
    true
}

/// Bare currency amount: `\d{1,3}(,\d{3})*(\.\d{1,2})?` or `\d+(\.\d{1,2})?`,
/// nothing else.
fn is_currency_amount(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let lead = i;
    if lead == 0 {
        return false;
    }
    if lead <= 3 {
        while i < bytes.len() && bytes[i] == b',' {
            let group = i + 1;
            let mut k = group;
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            if k - group != 3 {
                return false;
            }
            i = k;
        }
    }
    if i < bytes.len() && bytes[i] == b'.' {
        let cents = i + 1;
        let mut k = cents;
        while k < bytes.len() && bytes[k].is_ascii_digit() {
            k += 1;
        }
        if k == cents || k - cents > 2 {
            return false;
        }
        i = k;
    }
    i == bytes.len()
}

/// A currency amount starting right at `from`, ending on a word boundary.
/// Returns the end offset of the amount, or `None` when the text there is
/// not price-shaped (then the normal span path decides).
fn leading_currency_amount(text: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let lead = i - from;
    if lead == 0 {
        return None;
    }
    if lead <= 3 {
        // Thousands groups; bail back to the plain digit run if malformed.
        let mut j = i;
        while j < bytes.len() && bytes[j] == b',' {
            let group = j + 1;
            let mut k = group;
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            if k - group != 3 {
                break;
            }
            j = k;
        }
        if j > i {
            i = j;
        }
    }
    if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
        let cents = i + 1;
        let mut k = cents;
        while k < bytes.len() && bytes[k].is_ascii_digit() {
            k += 1;
        }
        if k - cents <= 2 {
            i = k;
        }
    }
    match bytes.get(i) {
        None => Some(i),
        Some(b) if b" \t\n.,;:!?)".contains(b) => Some(i),
        _ => None,
    }
}

/// Approximate math/prose classifier for `$..$` interiors. The thresholds
/// (120-char cutoff, single-word rule) are pinned by tests.
fn looks_like_math(s: &str) -> bool {
    if s.chars().count() > MAX_INLINE_SPAN_CHARS {
        return false;
    }
    if s.contains('\\') {
        return true;
    }
    if s.chars().any(|c| {
        matches!(
            c,
            '+' | '-' | '*' | '/' | '=' | '<' | '>' | '^' | '_' | '(' | ')' | '[' | ']' | '{' | '}'
        )
    }) {
        return true;
    }
    let has_digit = s.chars().any(|c| c.is_ascii_digit());
    let has_alpha = s.chars().any(char::is_alphabetic);
    if has_digit && !has_alpha {
        return false;
    }
    if has_digit && has_alpha {
        return true;
    }
    let mut words = s.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => word.chars().all(char::is_alphabetic),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_shapes() {
        assert!(is_currency_amount("5"));
        assert!(is_currency_amount("2.99"));
        assert!(is_currency_amount("1,234,567"));
        assert!(is_currency_amount("1,234.50"));
        assert!(!is_currency_amount("1,23"));
        assert!(!is_currency_amount("1.234"));
        assert!(!is_currency_amount("12,3456"));
        assert!(!is_currency_amount("x2"));
    }

    #[test]
    fn classifier_boundaries() {
        assert!(looks_like_math("x+1"));
        assert!(looks_like_math("\\alpha"));
        assert!(looks_like_math("f(x)"));
        assert!(looks_like_math("2ab"));
        assert!(looks_like_math("velocity"));
        assert!(!looks_like_math("42"));
        assert!(!looks_like_math("about right"));
        let long = "a".repeat(MAX_INLINE_SPAN_CHARS + 1);
        assert!(!looks_like_math(&long));
    }
}
