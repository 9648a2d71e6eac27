//! Text-completion collaborator backed by the Mistral chat-completions API.

mod mistral;

pub use mistral::{MistralClient, MistralConfig};
