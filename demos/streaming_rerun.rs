//! Streaming usage: the pipeline is pure, so a UI re-runs it on the whole
//! accumulated string each tick. Partial fences and math stay visible as
//! markdown until their closers arrive.
//!
//! Run:
//!   cargo run --example streaming_rerun

use chatmark::{Role, Segmenter, segment_message};

fn main() {
    let chunks = [
        "Let's check ",
        "$x^2$ quickly.\n\n",
        "```rust\n",
        "let y = x * x;\n",
        "```\n",
        "Done for $0.02.",
    ];

    let segmenter = Segmenter::default();
    let mut accumulated = String::new();

    for (tick, chunk) in chunks.iter().enumerate() {
        accumulated.push_str(chunk);
        let msg = segmenter.segment_message(Role::Assistant, &accumulated);
        println!(
            "tick {tick}: {} segment(s), {} math token(s)",
            msg.segments.len(),
            msg.math.len()
        );
    }

    let final_msg = segment_message(Role::Assistant, &accumulated);
    println!("\nfinal segments:");
    for segment in &final_msg.segments {
        println!("  {segment:?}");
    }
}
