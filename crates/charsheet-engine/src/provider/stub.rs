use async_trait::async_trait;
use serde_json::Value;

use charsheet_core::templates::sample_profile;

use super::{GenerationRequest, ProfileGenerator, ProviderError};

/// Offline generator: returns the sample profile for the requested name.
#[derive(Debug, Default, Clone, Copy)]
pub struct StubGenerator;

#[async_trait]
impl ProfileGenerator for StubGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<Value, ProviderError> {
        Ok(sample_profile(&req.name))
    }

    fn name(&self) -> &str {
        "stub"
    }
}
