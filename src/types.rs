/// Author of a chat message.
///
/// Reasoning extraction applies to [`Role::Assistant`] output only; other
/// roles render their content as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Prose, headings, lists. Inline-math placeholders are still embedded;
    /// resolve them against the message's token list at paint time.
    Markdown(String),
    /// A display-mode math block, `$$`/`\[` delimiters already stripped.
    ///
    /// LaTeX environments keep their `\begin{..}..\end{..}` wrapper: the
    /// environment name is semantics, not delimiter.
    Math { latex: String, display: bool },
    /// Verbatim fenced content. The language tag comes from a bare
    /// identifier on the first interior line, when present.
    Code { code: String, language: Option<String> },
    /// Horizontal divider. Carries no payload.
    Rule,
    /// A contiguous header+divider+rows block, kept verbatim.
    Table(String),
}

impl Segment {
    pub fn markdown(text: impl Into<String>) -> Self {
        Segment::Markdown(text.into())
    }

    pub fn is_markdown(&self) -> bool {
        matches!(self, Segment::Markdown(_))
    }

    pub fn as_markdown(&self) -> Option<&str> {
        match self {
            Segment::Markdown(text) => Some(text),
            _ => None,
        }
    }
}

/// An inline-math span lifted out of markdown text.
///
/// Placeholders are unique within one segmentation call and never collide
/// with user content; see [`crate::math::extract_inline_math`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathToken {
    pub placeholder: String,
    pub latex: String,
}

/// Assistant output split into the user-facing answer and the model's
/// reasoning spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThinkingSplit {
    /// Everything outside `<think>…</think>`, tags stripped.
    pub visible: String,
    /// Inner contents of all reasoning spans, joined by a blank line.
    pub reasoning: String,
}

/// The segmented form of one message, consumed by the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedMessage {
    pub segments: Vec<Segment>,
    /// Inline-math tokens across all `Markdown` segments, in appearance order.
    pub math: Vec<MathToken>,
    /// Empty unless the message carried reasoning spans.
    pub reasoning: String,
}

impl SegmentedMessage {
    pub fn has_reasoning(&self) -> bool {
        !self.reasoning.is_empty()
    }
}
