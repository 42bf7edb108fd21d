//! Feed markdown-bearing segments into `pulldown-cmark` for hosts that
//! already render pulldown events.

use crate::math::resolve_placeholders;
use crate::types::{MathToken, Segment, SegmentedMessage};

use pulldown_cmark::{Event, Options as PulldownOptions, Parser};

#[derive(Debug, Clone)]
pub struct PulldownAdapterOptions {
    pub pulldown: PulldownOptions,
}

impl Default for PulldownAdapterOptions {
    fn default() -> Self {
        Self {
            // Table segments need the extension to round-trip as tables.
            pulldown: PulldownOptions::ENABLE_TABLES,
        }
    }
}

/// Parse one segment into pulldown events.
///
/// `Markdown` segments have their math placeholders resolved back to
/// `$latex$` first; `Table` segments parse verbatim. `Math`/`Code`/`Rule`
/// return `None`: hosts paint those with dedicated renderers.
pub fn segment_events(
    segment: &Segment,
    math: &[MathToken],
    opts: &PulldownAdapterOptions,
) -> Option<Vec<Event<'static>>> {
    let text = match segment {
        Segment::Markdown(text) => resolve_placeholders(text, math),
        Segment::Table(raw) => raw.clone(),
        _ => return None,
    };
    Some(parse_events_static(&text, opts.pulldown))
}

/// Events for every markdown-bearing segment of a message, paired with the
/// segment's index so hosts can interleave their dedicated renderers.
pub fn message_events(
    message: &SegmentedMessage,
    opts: &PulldownAdapterOptions,
) -> Vec<(usize, Vec<Event<'static>>)> {
    message
        .segments
        .iter()
        .enumerate()
        .filter_map(|(idx, seg)| segment_events(seg, &message.math, opts).map(|ev| (idx, ev)))
        .collect()
}

fn parse_events_static(input: &str, options: PulldownOptions) -> Vec<Event<'static>> {
    Parser::new_ext(input, options)
        .map(|e| e.into_static())
        .collect()
}
