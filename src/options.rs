/// Behavior knobs for [`crate::Segmenter`].
///
/// Defaults reproduce the stock pipeline; hosts whose models emit a
/// different reasoning tag can adapt it here instead of forking.
#[derive(Debug, Clone)]
pub struct Options {
    /// Tag name wrapping reasoning spans in assistant output
    /// (`"think"` matches `<think>…</think>`).
    pub reasoning_tag: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            reasoning_tag: "think".to_string(),
        }
    }
}
