/// Execution category of a pipeline node.
///
/// The wire carries free-form type tags; they collapse into this closed enum
/// once per node, and the runner dispatches on it with an exhaustive match.
/// Tags outside the three sets map to `None` and the node is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCategory {
    /// Literal input holders: their text becomes their output.
    Source,
    /// Text-completion nodes: gather inputs, build a prompt, call out.
    Transform,
    /// Result collectors: copy the first resolved upstream output.
    Sink,
}

const SOURCE_TAGS: &[&str] = &["text", "input", "text_input", "textinput"];
const TRANSFORM_TAGS: &[&str] = &["gemini", "openai", "llm", "gpt", "claude", "mistral"];
const SINK_TAGS: &[&str] = &["output", "result"];

impl NodeCategory {
    /// Map a wire type tag to its category, case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let matches = |tags: &[&str]| tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
        if matches(SOURCE_TAGS) {
            Some(NodeCategory::Source)
        } else if matches(TRANSFORM_TAGS) {
            Some(NodeCategory::Transform)
        } else if matches(SINK_TAGS) {
            Some(NodeCategory::Sink)
        } else {
            None
        }
    }
}
