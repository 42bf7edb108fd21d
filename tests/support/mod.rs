#![allow(dead_code)]

use chatmark::{MathToken, Segment, segment_text};

pub fn visible_segments(text: &str) -> Vec<Segment> {
    segment_text(text).0
}

pub fn segments_and_tokens(text: &str) -> (Vec<Segment>, Vec<MathToken>) {
    segment_text(text)
}

pub fn kind_names(segments: &[Segment]) -> Vec<&'static str> {
    segments
        .iter()
        .map(|s| match s {
            Segment::Markdown(_) => "markdown",
            Segment::Math { .. } => "math",
            Segment::Code { .. } => "code",
            Segment::Rule => "rule",
            Segment::Table(_) => "table",
        })
        .collect()
}

pub fn markdown_concat(segments: &[Segment]) -> String {
    let mut out = String::new();
    for seg in segments {
        if let Segment::Markdown(text) = seg {
            out.push_str(text);
        }
    }
    out
}

pub fn chunk_whole(text: &str) -> Vec<String> {
    vec![text.to_string()]
}

pub fn chunk_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(|s| s.to_string()).collect()
}

fn fnv1a64(s: &str) -> u64 {
    let mut h: u64 = 0xcbf29ce484222325;
    for &b in s.as_bytes() {
        h ^= b as u64;
        h = h.wrapping_mul(0x100000001b3);
    }
    h
}

fn xorshift64(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    *state = x;
    x
}

pub fn chunk_pseudo_random(text: &str, seed_label: &str, trial: u64, max_bytes: usize) -> Vec<String> {
    assert!(max_bytes > 0);
    let mut state = fnv1a64(seed_label) ^ (trial.wrapping_mul(0x9e3779b97f4a7c15));

    let mut out = Vec::new();
    let mut start = 0usize;
    while start < text.len() {
        let want = (xorshift64(&mut state) as usize % max_bytes) + 1;
        let mut end = (start + want).min(text.len());
        while end < text.len() && !text.is_char_boundary(end) {
            end += 1;
        }
        out.push(text[start..end].to_string());
        start = end;
    }
    out
}
