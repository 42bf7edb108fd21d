//! Reasoning-span extraction for assistant output.

use crate::types::ThinkingSplit;

/// Split `<tag>…</tag>` reasoning spans out of `text`.
///
/// Matching is literal: no escaping, no nesting; the first closer after an
/// opener closes it. An opener with no matching closer consumes the rest of
/// the string as reasoning. Stray closers are stripped from the visible
/// remainder.
pub fn split_thinking(text: &str, tag: &str) -> ThinkingSplit {
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");

    let mut visible = String::with_capacity(text.len());
    let mut spans: Vec<&str> = Vec::new();
    let mut rest = text;

    loop {
        match rest.find(open.as_str()) {
            None => {
                visible.push_str(rest);
                break;
            }
            Some(start) => {
                visible.push_str(&rest[..start]);
                let after = &rest[start + open.len()..];
                match after.find(close.as_str()) {
                    Some(end) => {
                        let inner = after[..end].trim();
                        if !inner.is_empty() {
                            spans.push(inner);
                        }
                        rest = &after[end + close.len()..];
                    }
                    None => {
                        // Unterminated opener: remainder is reasoning.
                        let inner = after.trim();
                        if !inner.is_empty() {
                            spans.push(inner);
                        }
                        break;
                    }
                }
            }
        }
    }

    if visible.contains(close.as_str()) {
        visible = visible.replace(close.as_str(), "");
    }

    ThinkingSplit {
        visible,
        reasoning: spans.join("\n\n"),
    }
}
