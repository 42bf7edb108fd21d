//! Structural markdown repair for raw model output.
//!
//! Models frequently emit heading and list markers without the spacing
//! markdown requires, glue list items onto one line, or use literal `\n`
//! and `<br>` in place of newlines. This pass repairs those surface issues
//! before segmentation, which would otherwise collapse the message into one
//! giant paragraph.
//!
//! The rewrite order is fixed; each step is stable on well-formed input.
//! Everything after line-ending unification is fence-aware: lines inside a
//! toggled code fence pass through untouched.

use crate::syntax::{
    is_blank_line, is_blockquote_line, is_display_math_line, is_environment_start_line,
    is_fence_marker_line, is_heading_line, is_list_continuation_line, is_list_item_line,
    is_table_row_line, is_thematic_break,
};

use crate::delimiter::is_escaped;

/// Normalize raw model markdown. See the module docs for the rewrite order.
pub fn normalize(text: &str) -> String {
    let text = unify_line_endings(text);
    let text = rewrite_lines(&text, repair_heading_markers);
    let text = rewrite_lines(&text, repair_list_marker);
    let text = rewrite_lines(&text, repair_label_list);
    let text = rewrite_lines(&text, break_jammed_markers);
    let text = trim_leading_blank_line(text);
    let text = normalize_list_boundaries(&text);
    preserve_single_newlines(&text)
}

/// `\r\n` and `\r` become `\n`; an unescaped literal `\n` escape and HTML
/// break tags become real newlines. Applied to the whole text, fences
/// included, before any line-oriented pass.
fn unify_line_endings(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                out.push('\n');
                i += 1;
            }
            b'\\' => {
                if bytes.get(i + 1) == Some(&b'n') && !is_escaped(text, i) {
                    out.push('\n');
                    i += 2;
                } else {
                    out.push('\\');
                    i += 1;
                }
            }
            b'<' => {
                if let Some(len) = br_tag_len(&bytes[i..]) {
                    out.push('\n');
                    i += len;
                } else {
                    out.push('<');
                    i += 1;
                }
            }
            _ => {
                let start = i;
                while i < bytes.len() && !matches!(bytes[i], b'\r' | b'\\' | b'<') {
                    i += 1;
                }
                out.push_str(&text[start..i]);
            }
        }
    }
    out
}

fn br_tag_len(bytes: &[u8]) -> Option<usize> {
    for cand in [b"<br>".as_slice(), b"<br/>".as_slice(), b"<br />".as_slice()] {
        if bytes.len() >= cand.len() && bytes[..cand.len()].eq_ignore_ascii_case(cand) {
            return Some(cand.len());
        }
    }
    None
}

/// Run `f` over every line outside code fences, rejoining with `\n`.
/// `f` may return multiple lines.
fn rewrite_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_fence = false;
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            out.push('\n');
        }
        first = false;
        if is_fence_marker_line(line) {
            in_fence = !in_fence;
            out.push_str(line);
            continue;
        }
        if in_fence {
            out.push_str(line);
        } else {
            out.push_str(&f(line));
        }
    }
    out
}

/// A `#` run (1–6) that reads as a heading marker is pushed onto its own
/// line when mid-line, and gains the required trailing space when jammed
/// against its text. Runs glued to an alphanumeric prefix (`C#`) or not
/// followed by heading-like content are left alone.
fn repair_heading_markers(line: &str) -> String {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len() + 8);
    let mut i = 0usize;
    while i < bytes.len() {
        if bytes[i] != b'#' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'#' {
                i += 1;
            }
            out.push_str(&line[start..i]);
            continue;
        }

        let run_start = i;
        while i < bytes.len() && bytes[i] == b'#' {
            i += 1;
        }
        let run = &line[run_start..i];
        let next = bytes.get(i).copied();
        let prev = run_start.checked_sub(1).map(|p| bytes[p]);

        let blocked = run.len() > 6 || prev.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'\\');
        let spaced = matches!(next, Some(b' ') | Some(b'\t'));
        let jammed = next.is_some_and(|b| b.is_ascii_alphabetic());
        if blocked || !(spaced || jammed) {
            out.push_str(run);
            continue;
        }

        if !line[..run_start].trim().is_empty() {
            while out.ends_with(' ') || out.ends_with('\t') {
                out.pop();
            }
            out.push('\n');
        }
        out.push_str(run);
        if jammed {
            out.push(' ');
        }
    }
    out
}

fn is_word_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || matches!(b, b'*' | b'`' | b'[' | b'_')
}

/// `-item` / `1.item` at line start gains the marker space. The follower
/// must be word-like, so `3.14` and `---` stay intact.
fn repair_list_marker(line: &str) -> String {
    let indent_len = line.len() - line.trim_start().len();
    let (indent, s) = line.split_at(indent_len);
    let bytes = s.as_bytes();
    if bytes.first() == Some(&b'-') {
        if bytes.len() >= 2 && is_word_start(bytes[1]) {
            return format!("{indent}- {}", &s[1..]);
        }
    } else if bytes.first().is_some_and(u8::is_ascii_digit) {
        let mut i = 0usize;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).copied().is_some_and(is_word_start) {
            return format!("{indent}{}. {}", &s[..i], &s[i + 1..]);
        }
    }
    line.to_string()
}

/// `": - item"` is a label gluing a list item onto its own line; the item
/// moves below the label.
fn repair_label_list(line: &str) -> String {
    if line.contains(": - ") || line.contains(":- ") {
        line.replace(": - ", ":\n- ").replace(":- ", ":\n- ")
    } else {
        line.to_string()
    }
}

fn starts_like_item(s: &str) -> bool {
    if s.starts_with("**") {
        return true;
    }
    matches!(s.as_bytes().first(), Some(b'`') | Some(b'[')) || s.chars().next().is_some_and(char::is_uppercase)
}

/// A bullet or numbered marker jammed mid-line ahead of bold/code/link/
/// capitalized text is forced onto a new line. A bold run immediately
/// followed by `" - "` always starts a new item.
fn break_jammed_markers(line: &str) -> String {
    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len() + 8);
    let mut seg_start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        let content = if bytes[i] == b'-' && bytes.get(i + 1) == Some(&b' ') {
            Some(i + 2)
        } else if bytes[i].is_ascii_digit() && (i == 0 || !bytes[i - 1].is_ascii_digit()) {
            let mut k = i;
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            if bytes.get(k) == Some(&b'.') && bytes.get(k + 1) == Some(&b' ') {
                Some(k + 2)
            } else {
                None
            }
        } else {
            None
        };

        if let Some(content) = content {
            let preceded_by_space = i > 0 && matches!(bytes[i - 1], b' ' | b'\t');
            let has_lead_text = !line[seg_start..i].trim().is_empty();
            if preceded_by_space && has_lead_text {
                let bold_before = line[..i].trim_end().ends_with("**");
                if bold_before || starts_like_item(&line[content..]) {
                    out.push_str(line[seg_start..i].trim_end());
                    out.push('\n');
                    seg_start = i;
                    i = content;
                    continue;
                }
            }
        }
        i += 1;
    }
    out.push_str(&line[seg_start..]);
    out
}

/// Drop the single leading blank line heading repair may have produced.
fn trim_leading_blank_line(text: String) -> String {
    match text.strip_prefix('\n') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

/// Ensure a blank line separates a non-list paragraph from an adjacent
/// list block, both entering and leaving. Fence interiors pass through.
fn normalize_list_boundaries(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<&str> = Vec::with_capacity(lines.len() + 4);
    let mut in_fence = false;
    for (idx, line) in lines.iter().enumerate() {
        if !in_fence && idx > 0 {
            let prev = lines[idx - 1];
            let entering = is_list_item_line(line)
                && !is_blank_line(prev)
                && !is_list_item_line(prev)
                && !is_fence_marker_line(prev);
            let leaving = is_list_item_line(prev)
                && !is_blank_line(line)
                && !is_list_item_line(line)
                && !is_list_continuation_line(line);
            if entering || leaving {
                out.push("");
            }
        }
        if is_fence_marker_line(line) {
            in_fence = !in_fence;
        }
        out.push(line);
    }
    out.join("\n")
}

/// A boundary between two non-blank lines that is not a recognized block
/// boundary becomes a hard line break (two trailing spaces), so renderers
/// that soften single newlines still show the break the model intended.
fn preserve_single_newlines(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out = String::with_capacity(text.len() + lines.len());
    let mut in_fence = false;
    for (idx, line) in lines.iter().enumerate() {
        let fence_line = is_fence_marker_line(line);
        out.push_str(line);
        if idx + 1 < lines.len() {
            let next = lines[idx + 1];
            if !in_fence && !fence_line && needs_hard_break(line, next) && !line.ends_with("  ") {
                out.push_str("  ");
            }
            out.push('\n');
        }
        if fence_line {
            in_fence = !in_fence;
        }
    }
    out
}

fn needs_hard_break(curr: &str, next: &str) -> bool {
    if is_blank_line(curr) || is_blank_line(next) {
        return false;
    }
    if is_fence_marker_line(next) {
        return false;
    }
    if is_blockquote_line(curr) || is_blockquote_line(next) {
        return false;
    }
    !(is_heading_line(next)
        || is_list_item_line(next)
        || is_thematic_break(next)
        || is_table_row_line(next)
        || is_display_math_line(next)
        || is_environment_start_line(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_escapes_become_newlines() {
        assert_eq!(unify_line_endings("a\\nb"), "a\nb");
        assert_eq!(unify_line_endings("a\\\\nb"), "a\\\\nb");
        assert_eq!(unify_line_endings("a\r\nb\rc"), "a\nb\nc");
        assert_eq!(unify_line_endings("a<br>b<BR />c"), "a\nb\nc");
    }

    #[test]
    fn heading_repair_leaves_csharp_alone() {
        assert_eq!(repair_heading_markers("C# is fine"), "C# is fine");
        assert_eq!(repair_heading_markers("see #42"), "see #42");
    }

    #[test]
    fn jammed_marker_splits_on_bold() {
        assert_eq!(
            break_jammed_markers("intro: - **One** - Two things"),
            "intro:\n- **One**\n- Two things"
        );
    }
}
