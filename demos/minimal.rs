//! Minimal `chatmark` usage: segment one assistant message.
//!
//! Run:
//!   cargo run --example minimal

use chatmark::{Role, Segment, segment_message};

fn main() {
    let reply = "<think>keep it short</think>## Result\n\n\
        The closed form is $n(n+1)/2$, so:\n$$\n\\sum_{i=1}^{n} i\n$$\n\
        ```python\nprint(sum(range(n + 1)))\n```\nThat costs $0.00 to run.";

    let msg = segment_message(Role::Assistant, reply);

    if msg.has_reasoning() {
        println!("reasoning: {:?}\n", msg.reasoning);
    }
    for (i, segment) in msg.segments.iter().enumerate() {
        match segment {
            Segment::Markdown(text) => println!("[{i}] markdown {text:?}"),
            Segment::Math { latex, display } => println!("[{i}] math display={display} {latex:?}"),
            Segment::Code { code, language } => {
                println!("[{i}] code lang={language:?} {code:?}")
            }
            Segment::Rule => println!("[{i}] rule"),
            Segment::Table(raw) => println!("[{i}] table {raw:?}"),
        }
    }
    for token in &msg.math {
        println!("token {} -> {:?}", token.placeholder, token.latex);
    }
}
