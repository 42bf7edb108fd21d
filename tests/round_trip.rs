mod support;

use chatmark::{MathToken, Segment, extract_inline_math, resolve_placeholders, segment_text};
use support::markdown_concat;

/// Rebuild source text from segments using the canonical delimiter forms.
/// Inputs below are written in exactly those forms, so the rebuild must be
/// byte-identical.
fn reconstruct(segments: &[Segment], math: &[MathToken]) -> String {
    let mut out = String::new();
    for seg in segments {
        match seg {
            Segment::Markdown(text) => out.push_str(&resolve_placeholders(text, math)),
            Segment::Math { latex, .. } => {
                if latex.starts_with("\\begin{") {
                    out.push_str(latex);
                } else {
                    out.push_str("$$");
                    out.push_str(latex);
                    out.push_str("$$");
                }
            }
            Segment::Code { code, language } => {
                out.push_str("```");
                if let Some(lang) = language {
                    out.push_str(lang);
                }
                out.push('\n');
                out.push_str(code);
                out.push_str("\n```");
            }
            Segment::Rule => out.push_str("---\n"),
            Segment::Table(raw) => out.push_str(raw),
        }
    }
    out
}

#[test]
fn token_count_matches_placeholders_in_rewritten_text() {
    let inputs = [
        "no math at all",
        "one $a+b$ span",
        "two: $a+b$ and \\(c\\) spans",
        "rejected $5 price, kept $x^2$",
    ];
    for input in inputs {
        let (rewritten, tokens) = extract_inline_math(input);
        let count = rewritten.matches("ZZZMATHPLACEHOLDER").count();
        assert_eq!(count, tokens.len(), "input: {input:?}");
        for token in &tokens {
            assert_eq!(rewritten.matches(token.placeholder.as_str()).count(), 1);
        }
    }
}

#[test]
fn resolving_placeholders_restores_dollar_spans() {
    let input = "Compute $x+1$ and $y_2$ now.";
    let (rewritten, tokens) = extract_inline_math(input);
    assert_eq!(tokens.len(), 2);
    assert_eq!(resolve_placeholders(&rewritten, &tokens), input);
}

#[test]
fn segments_reconstruct_canonical_input() {
    let inputs = [
        "plain paragraph text",
        "Intro\n$$x+y$$\ntail",
        "a\n```rust\nlet x = 1;\n```\nb",
        "a\n---\nb",
        "| a | b | c |\n|---|---|---|\n| 1 | 2 | 3 |\n\nafter",
        "mixed $a+b$ inline\n$$d-e$$\nand ```\nraw $5\n``` done",
        "\\begin{align}\nx &= y\n\\end{align}",
    ];
    for input in inputs {
        let (segments, math) = segment_text(input);
        assert_eq!(reconstruct(&segments, &math), input, "input: {input:?}");
    }
}

#[test]
fn no_content_is_lost_or_duplicated_around_math() {
    let input = "start $$m$$ middle $$n$$ end";
    let (segments, math) = segment_text(input);
    assert_eq!(reconstruct(&segments, &math), input);
    assert!(math.is_empty());
}

#[test]
fn inline_tokens_order_matches_markdown_appearance() {
    let (segments, math) = segment_text("$a+b$ then $$d$$ and $c-1$");
    assert_eq!(math.len(), 2);
    let text = markdown_concat(&segments);
    let first = text.find(math[0].placeholder.as_str()).unwrap();
    let second = text.find(math[1].placeholder.as_str()).unwrap();
    assert!(first < second);
    assert_eq!(math[0].latex, "a+b");
    assert_eq!(math[1].latex, "c-1");
}
