mod error;
pub mod openai;
pub mod stub;

pub use error::{ProviderError, ProviderErrorKind};
pub use openai::OpenAiGenerator;
pub use stub::StubGenerator;

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::ReasoningEffort;

/// Everything a generator needs for one schema-constrained call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fixed system instruction, shared across requests.
    pub instruction: Arc<str>,
    /// Trimmed, validated character name.
    pub name: String,
    /// Output contract the provider must enforce.
    pub schema: Arc<Value>,
    pub model: String,
    pub reasoning_effort: ReasoningEffort,
}

/// Given a prompt and a schema, return a value conforming to the schema, or
/// fail. Output is untrusted; callers validate it.
#[async_trait]
pub trait ProfileGenerator: Send + Sync {
    async fn generate(&self, req: &GenerationRequest) -> Result<Value, ProviderError>;

    /// Short label for logs.
    fn name(&self) -> &str;
}
