use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reusable node metadata served to the editing surface.
///
/// Templates describe how a node renders and what fields it offers; the
/// execution engine never reads them. `type` is globally unique and doubles
/// as the lookup key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTemplate {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub label: String,
    pub tab: String,
    pub description: Option<String>,
    pub accent: Option<String>,
    pub fields: Vec<serde_json::Value>,
    pub handles: Vec<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl NodeTemplate {
    pub fn from_draft(draft: TemplateDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            node_type: draft.node_type,
            title: draft.title,
            label: draft.label,
            tab: draft.tab,
            description: draft.description,
            accent: draft.accent,
            fields: draft.fields,
            handles: draft.handles,
            created_at: Utc::now(),
        }
    }
}

/// Request body for registering a new node template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub label: String,
    #[serde(default = "default_tab")]
    pub tab: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub fields: Vec<serde_json::Value>,
    #[serde(default)]
    pub handles: Vec<serde_json::Value>,
}

fn default_tab() -> String {
    "GENERAL".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft_defaults_tab_and_schemas() {
        let draft: TemplateDraft = serde_json::from_value(json!({
            "type": "text_input",
            "title": "Text Input",
            "label": "Input"
        }))
        .unwrap();

        assert_eq!(draft.tab, "GENERAL");
        assert!(draft.fields.is_empty());
        assert!(draft.handles.is_empty());

        let template = NodeTemplate::from_draft(draft);
        assert_eq!(template.node_type, "text_input");
        assert!(template.description.is_none());
    }
}
