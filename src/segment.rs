//! Block segmentation: fences first, then display math, then line
//! structure, with inline math lifted out along the way.

use crate::math::MathExtractor;
use crate::normalize::normalize;
use crate::options::Options;
use crate::syntax::{is_language_tag, is_table_divider_line, is_table_row_line, is_thematic_break};
use crate::thinking::split_thinking;
use crate::types::{MathToken, Role, Segment, SegmentedMessage};

use crate::delimiter::{CODE_FENCE, DISPLAY_MATH, find_next_close, find_next_open};

/// Stateless entry point: split → normalize → segment, per message.
///
/// Holds options only; every call is pure, so one `Segmenter` may serve any
/// number of concurrent messages. Re-run it on the whole content whenever a
/// streaming message grows.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    opts: Options,
}

impl Segmenter {
    pub fn new(opts: Options) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn segment_message(&self, role: Role, text: &str) -> SegmentedMessage {
        let (visible, reasoning) = match role {
            Role::Assistant => {
                let split = split_thinking(text, &self.opts.reasoning_tag);
                (split.visible, split.reasoning)
            }
            _ => (text.to_string(), String::new()),
        };
        let normalized = normalize(&visible);
        let (segments, math) = segment_text(&normalized);
        SegmentedMessage {
            segments,
            math,
            reasoning,
        }
    }
}

/// Segment one message with default options.
pub fn segment_message(role: Role, text: &str) -> SegmentedMessage {
    Segmenter::default().segment_message(role, text)
}

/// Segment already-normalized text. Code fences take precedence and their
/// contents are never further parsed; the rest goes through display math,
/// inline extraction, and line structure. Empty input yields a single
/// whitespace markdown segment so the renderer always has something to lay
/// out.
pub fn segment_text(text: &str) -> (Vec<Segment>, Vec<MathToken>) {
    let mut segments: Vec<Segment> = Vec::new();
    let mut extractor = MathExtractor::new();

    if text.is_empty() {
        return (vec![Segment::Markdown(" ".to_string())], Vec::new());
    }

    let mut rest = text;
    loop {
        match rest.find(CODE_FENCE.open) {
            None => {
                segment_rich_chunk(rest, &mut segments, &mut extractor);
                break;
            }
            Some(open) => {
                if open > 0 {
                    segment_rich_chunk(&rest[..open], &mut segments, &mut extractor);
                }
                let after_open = &rest[open + CODE_FENCE.open.len()..];
                match after_open.find(CODE_FENCE.close) {
                    None => {
                        // Unterminated fence: markers alone never hide content.
                        segment_rich_chunk(&rest[open..], &mut segments, &mut extractor);
                        break;
                    }
                    Some(close) => {
                        let (language, payload) = split_fence_header(&after_open[..close]);
                        segments.push(Segment::Code {
                            code: payload.trim_end_matches('\n').to_string(),
                            language,
                        });
                        rest = &after_open[close + CODE_FENCE.close.len()..];
                    }
                }
            }
        }
    }

    if segments.is_empty() {
        segments.push(Segment::Markdown(" ".to_string()));
    }
    (merge_adjacent_markdown(segments), extractor.into_tokens())
}

/// Language tag: a bare identifier on the first interior line.
fn split_fence_header(interior: &str) -> (Option<String>, &str) {
    let (first, rest) = match interior.find('\n') {
        Some(nl) => (&interior[..nl], &interior[nl + 1..]),
        None => (interior, ""),
    };
    let tag = first.trim();
    if is_language_tag(tag) {
        (Some(tag.to_string()), rest)
    } else if tag.is_empty() && interior.starts_with('\n') {
        (None, &interior[1..])
    } else {
        (None, interior)
    }
}

/// Display math pass over a non-code chunk; surrounding text flows through
/// inline extraction and the line-structural pass.
fn segment_rich_chunk(chunk: &str, segments: &mut Vec<Segment>, extractor: &mut MathExtractor) {
    let mut cursor = 0usize;
    while cursor < chunk.len() {
        let Some((open, delim)) = find_next_open(chunk, cursor, DISPLAY_MATH) else {
            break;
        };
        let Some(close) = find_next_close(chunk, open.end, delim) else {
            // Unterminated display opener: remainder stays literal markdown.
            break;
        };
        let latex = if delim.open.starts_with("\\begin") {
            // The environment wrapper is semantics, keep it.
            chunk[open.start..close.end].trim()
        } else {
            chunk[open.end..close.start].trim()
        };
        if latex.is_empty() {
            emit_markdown(&chunk[cursor..close.end], segments, extractor);
            cursor = close.end;
            continue;
        }
        if open.start > cursor {
            emit_markdown(&chunk[cursor..open.start], segments, extractor);
        }
        segments.push(Segment::Math {
            latex: latex.to_string(),
            display: true,
        });
        cursor = close.end;
    }
    if cursor < chunk.len() {
        emit_markdown(&chunk[cursor..], segments, extractor);
    }
}

fn emit_markdown(text: &str, segments: &mut Vec<Segment>, extractor: &mut MathExtractor) {
    if text.is_empty() {
        return;
    }
    let rewritten = extractor.extract(text);
    line_structural_pass(&rewritten, segments);
}

/// Rules and tables out of a markdown chunk; everything else accumulates
/// into pending markdown, flushed at each structural hit.
fn line_structural_pass(text: &str, segments: &mut Vec<Segment>) {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let mut pending = String::new();
    let mut i = 0usize;
    while i < lines.len() {
        let stripped = lines[i].strip_suffix('\n').unwrap_or(lines[i]);

        if is_thematic_break(stripped) {
            flush_markdown(&mut pending, segments);
            segments.push(Segment::Rule);
            i += 1;
            continue;
        }

        if is_table_row_line(stripped)
            && i + 1 < lines.len()
            && is_table_divider_line(lines[i + 1].strip_suffix('\n').unwrap_or(lines[i + 1]))
        {
            flush_markdown(&mut pending, segments);
            let mut table = String::new();
            table.push_str(lines[i]);
            table.push_str(lines[i + 1]);
            i += 2;
            while i < lines.len() {
                let row = lines[i].strip_suffix('\n').unwrap_or(lines[i]);
                if row.trim().is_empty() || !row.contains('|') {
                    break;
                }
                table.push_str(lines[i]);
                i += 1;
            }
            segments.push(Segment::Table(table));
            continue;
        }

        pending.push_str(lines[i]);
        i += 1;
    }
    flush_markdown(&mut pending, segments);
}

fn flush_markdown(pending: &mut String, segments: &mut Vec<Segment>) {
    if pending.is_empty() {
        return;
    }
    segments.push(Segment::Markdown(std::mem::take(pending)));
}

/// Adjacent markdown segments collapse into one; no other kinds merge.
fn merge_adjacent_markdown(segments: Vec<Segment>) -> Vec<Segment> {
    let mut out: Vec<Segment> = Vec::with_capacity(segments.len());
    for seg in segments {
        if let Segment::Markdown(text) = &seg {
            if let Some(Segment::Markdown(prev)) = out.last_mut() {
                prev.push_str(text);
                continue;
            }
        }
        out.push(seg);
    }
    out
}
