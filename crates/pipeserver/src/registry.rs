use pipecore::{NodeTemplate, RegistryError, TemplateDraft};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-process store of node templates, keyed by their unique type.
///
/// Shared across handlers behind the server state; reads take the lock
/// briefly and clone out.
pub struct TemplateRegistry {
    templates: RwLock<HashMap<String, NodeTemplate>>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self {
            templates: RwLock::new(HashMap::new()),
        }
    }

    /// Register a template built from the draft; its type must be unused.
    pub async fn create(&self, draft: TemplateDraft) -> Result<NodeTemplate, RegistryError> {
        let mut templates = self.templates.write().await;
        if templates.contains_key(&draft.node_type) {
            return Err(RegistryError::DuplicateType(draft.node_type));
        }

        let template = NodeTemplate::from_draft(draft);
        templates.insert(template.node_type.clone(), template.clone());
        Ok(template)
    }

    /// All templates, newest first.
    pub async fn list(&self) -> Vec<NodeTemplate> {
        let templates = self.templates.read().await;
        let mut all: Vec<_> = templates.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        all
    }

    pub async fn get(&self, node_type: &str) -> Result<NodeTemplate, RegistryError> {
        self.templates
            .read()
            .await
            .get(node_type)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(node_type.to_string()))
    }

    pub async fn delete(&self, node_type: &str) -> Result<(), RegistryError> {
        self.templates
            .write()
            .await
            .remove(node_type)
            .map(|_| ())
            .ok_or_else(|| RegistryError::NotFound(node_type.to_string()))
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn draft(node_type: &str) -> TemplateDraft {
        serde_json::from_value(json!({
            "type": node_type,
            "title": format!("{node_type} title"),
            "label": node_type
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn created_templates_can_be_fetched() {
        let registry = TemplateRegistry::new();

        let created = registry.create(draft("text_input")).await.unwrap();
        assert_eq!(created.tab, "GENERAL");

        let fetched = registry.get("text_input").await.unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.node_type, "text_input");
    }

    #[tokio::test]
    async fn duplicate_types_are_rejected() {
        let registry = TemplateRegistry::new();
        registry.create(draft("llm")).await.unwrap();

        let err = registry.create(draft("llm")).await.unwrap_err();
        assert_eq!(err, RegistryError::DuplicateType("llm".to_string()));
        assert_eq!(err.to_string(), "Node with type 'llm' already exists");
    }

    #[tokio::test]
    async fn missing_types_report_not_found() {
        let registry = TemplateRegistry::new();

        let err = registry.get("ghost").await.unwrap_err();
        assert_eq!(err.to_string(), "Node with type 'ghost' not found");

        let err = registry.delete("ghost").await.unwrap_err();
        assert_eq!(err, RegistryError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn deleted_templates_are_gone() {
        let registry = TemplateRegistry::new();
        registry.create(draft("output")).await.unwrap();

        registry.delete("output").await.unwrap();
        assert!(registry.get("output").await.is_err());
        assert!(registry.list().await.is_empty());
    }

    #[tokio::test]
    async fn listing_returns_newest_first() {
        let registry = TemplateRegistry::new();
        for node_type in ["first", "second", "third"] {
            registry.create(draft(node_type)).await.unwrap();
            // Keep creation timestamps strictly increasing.
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let types: Vec<_> = registry
            .list()
            .await
            .into_iter()
            .map(|t| t.node_type)
            .collect();
        assert_eq!(types, vec!["third", "second", "first"]);
    }
}
