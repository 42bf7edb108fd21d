#![cfg(feature = "pulldown")]

use chatmark::adapters::pulldown::{PulldownAdapterOptions, message_events, segment_events};
use chatmark::{Role, Segment, segment_message};
use pulldown_cmark::{Event, Tag};

fn text_of(events: &[Event<'_>]) -> String {
    let mut out = String::new();
    for ev in events {
        if let Event::Text(t) = ev {
            out.push_str(t);
        }
    }
    out
}

#[test]
fn markdown_segments_parse_with_math_resolved() {
    let msg = segment_message(Role::User, "Bold **move** with $y+1$ inline.");
    let opts = PulldownAdapterOptions::default();
    let parsed = message_events(&msg, &opts);
    assert_eq!(parsed.len(), 1);
    let (idx, events) = &parsed[0];
    assert_eq!(*idx, 0);
    assert!(
        events
            .iter()
            .any(|e| matches!(e, Event::Start(Tag::Strong))),
        "expected strong emphasis events"
    );
    assert!(text_of(events).contains("$y+1$"));
}

#[test]
fn table_segments_parse_as_tables() {
    let msg = segment_message(Role::User, "| a | b |\n|---|---|\n| 1 | 2 |");
    let opts = PulldownAdapterOptions::default();
    let table = msg
        .segments
        .iter()
        .find(|s| matches!(s, Segment::Table(_)))
        .expect("table segment");
    let events = segment_events(table, &msg.math, &opts).expect("events");
    assert!(
        events
            .iter()
            .any(|e| matches!(e, Event::Start(Tag::Table(_)))),
        "expected table events"
    );
}

#[test]
fn dedicated_segments_are_skipped() {
    let msg = segment_message(Role::User, "```rust\nlet x = 1;\n```");
    let opts = PulldownAdapterOptions::default();
    assert!(message_events(&msg, &opts).is_empty());
    assert!(segment_events(&msg.segments[0], &msg.math, &opts).is_none());
}
