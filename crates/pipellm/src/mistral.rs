use async_trait::async_trait;
use pipecore::{CompletionError, TextCompletion};
use serde_json::Value;
use std::time::Duration;

/// Editor placeholder for the instructions field; treated as absent.
const INSTRUCTIONS_PLACEHOLDER: &str = "Add Instructions";

/// Connection settings for the Mistral chat-completions API.
#[derive(Debug, Clone)]
pub struct MistralConfig {
    /// Credential; `None` makes every call fail fast with a configuration
    /// error, no network attempt.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Per-request deadline; the send itself is aborted when it passes.
    pub timeout: Duration,
}

impl Default for MistralConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.mistral.ai/v1".to_string(),
            model: "mistral-large-latest".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl MistralConfig {
    /// Read the credential from `MISTRAL_API_KEY`; an empty value counts as
    /// unset.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("MISTRAL_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            ..Self::default()
        }
    }
}

/// [`TextCompletion`] implementation over the Mistral HTTP API.
///
/// One request per call: a single user message carrying the woven
/// instructions and prompt. Every transport, API and decode failure is
/// normalized to [`CompletionError::Provider`] with one diagnostic message.
pub struct MistralClient {
    config: MistralConfig,
    client: reqwest::Client,
}

impl MistralClient {
    pub fn new(config: MistralConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Client configured from the process environment.
    pub fn from_env() -> Self {
        Self::new(MistralConfig::from_env())
    }
}

#[async_trait]
impl TextCompletion for MistralClient {
    async fn complete(&self, prompt: &str, instructions: &str) -> Result<String, CompletionError> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            CompletionError::Configuration(
                "MISTRAL_API_KEY environment variable is not set".to_string(),
            )
        })?;

        let full_prompt = compose_prompt(prompt, instructions);
        tracing::debug!("Requesting completion ({} prompt chars)", full_prompt.len());

        let payload = serde_json::json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": full_prompt}],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(provider_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompletionError::Provider(format!(
                "Error executing Mistral: API returned {status}: {body}"
            )));
        }

        let body: Value = response.json().await.map_err(provider_error)?;
        extract_content(&body).ok_or_else(|| {
            CompletionError::Provider(
                "Error executing Mistral: response carried no message content".to_string(),
            )
        })
    }
}

fn provider_error(err: reqwest::Error) -> CompletionError {
    CompletionError::Provider(format!("Error executing Mistral: {err}"))
}

/// Weave the instruction block into the user message.
///
/// Blank instructions and the editor placeholder are dropped; anything else
/// is prefixed above the prompt.
fn compose_prompt(prompt: &str, instructions: &str) -> String {
    if instructions.trim().is_empty() || instructions == INSTRUCTIONS_PLACEHOLDER {
        prompt.to_string()
    } else {
        format!("Instructions: {instructions}\n\n{prompt}")
    }
}

fn extract_content(body: &Value) -> Option<String> {
    body.get("choices")
        .and_then(|v| v.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
