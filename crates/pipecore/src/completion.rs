use crate::CompletionError;
use async_trait::async_trait;

/// Boundary to the external text-generation service.
///
/// Stateless per call: one prompt plus one instruction block in, generated
/// text out. The runner invokes it once per transform node; implementations
/// decide how the two pieces are woven into the provider request.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str, instructions: &str) -> Result<String, CompletionError>;
}
