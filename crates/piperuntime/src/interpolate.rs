use once_cell::sync::Lazy;
use pipecore::PipelineNode;
use regex::{Captures, Regex};
use std::collections::HashMap;

/// Matches a `{{node-id}}` reference; the id is everything up to the closing
/// braces, so an unterminated `{{` never matches and stays verbatim.
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("marker pattern is valid"));

/// Substitute `{{node-id}}` references in a prompt template.
///
/// Each reference resolves, in order, to the referenced node's computed
/// output, its literal `text` field, or its `output` field; whitespace around
/// the id is trimmed. A reference that resolves to nothing is left untouched.
pub fn interpolate(
    text: &str,
    outputs: &HashMap<String, String>,
    nodes: &HashMap<&str, &PipelineNode>,
) -> String {
    MARKER
        .replace_all(text, |caps: &Captures| {
            let id = caps[1].trim();
            if let Some(output) = outputs.get(id) {
                return output.clone();
            }
            if let Some(data) = nodes.get(id).and_then(|node| node.data.as_ref()) {
                if let Some(literal) = data.text().or_else(|| data.output()) {
                    return literal.to_string();
                }
            }
            caps[0].to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(nodes: &[PipelineNode]) -> HashMap<&str, &PipelineNode> {
        nodes.iter().map(|node| (node.id.as_str(), node)).collect()
    }

    #[test]
    fn computed_output_wins_over_literal_text() {
        let nodes = vec![PipelineNode::new("q", "text").with_text("stale")];
        let outputs = HashMap::from([("q".to_string(), "fresh".to_string())]);

        let resolved = interpolate("Answer: {{q}}", &outputs, &index(&nodes));
        assert_eq!(resolved, "Answer: fresh");
    }

    #[test]
    fn falls_back_to_literal_text_then_output_field() {
        let nodes = vec![
            PipelineNode::new("question", "text").with_text("What is Rust?"),
            PipelineNode::new("cached", "text").with_field("output", "from last run"),
        ];
        let outputs = HashMap::new();

        let resolved = interpolate("{{question}} / {{cached}}", &outputs, &index(&nodes));
        assert_eq!(resolved, "What is Rust? / from last run");
    }

    #[test]
    fn unknown_reference_left_verbatim() {
        let resolved = interpolate("see {{ghost}}", &HashMap::new(), &HashMap::new());
        assert_eq!(resolved, "see {{ghost}}");
    }

    #[test]
    fn empty_fields_do_not_resolve() {
        let nodes = vec![PipelineNode::new("blank", "text").with_text("")];

        let resolved = interpolate("{{blank}}", &HashMap::new(), &index(&nodes));
        assert_eq!(resolved, "{{blank}}");
    }

    #[test]
    fn unterminated_marker_untouched() {
        let outputs = HashMap::from([("q".to_string(), "yes".to_string())]);

        let resolved = interpolate("broken {{q", &outputs, &HashMap::new());
        assert_eq!(resolved, "broken {{q");
    }

    #[test]
    fn whitespace_around_id_is_trimmed() {
        let outputs = HashMap::from([("q".to_string(), "yes".to_string())]);

        let resolved = interpolate("{{  q  }}", &outputs, &HashMap::new());
        assert_eq!(resolved, "yes");
    }

    #[test]
    fn resolves_every_marker_in_the_template() {
        let outputs = HashMap::from([
            ("a".to_string(), "one".to_string()),
            ("b".to_string(), "two".to_string()),
        ]);

        let resolved = interpolate("{{a}} and {{b}} and {{a}}", &outputs, &HashMap::new());
        assert_eq!(resolved, "one and two and one");
    }

    #[test]
    fn marker_free_text_is_identity() {
        let resolved = interpolate("plain prompt", &HashMap::new(), &HashMap::new());
        assert_eq!(resolved, "plain prompt");
    }
}
