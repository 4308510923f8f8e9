use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use charsheet_core::prompt::system_instruction;
use charsheet_core::schema::{schema, validate_profile, SchemaError};
use charsheet_core::{validate_name_request, CharacterProfile, NameRequest};

use crate::config::GenerationConfig;
use crate::error::{FailureCause, GenerationError};
use crate::provider::{GenerationRequest, ProfileGenerator};

/// Name → profile transform. Stateless per request; cheap to clone.
#[derive(Clone)]
pub struct ProfileService {
    inner: Arc<Inner>,
}

struct Inner {
    generator: Arc<dyn ProfileGenerator>,
    config: GenerationConfig,
    instruction: Arc<str>,
    schema: Arc<Value>,
}

impl ProfileService {
    /// Builds the system instruction once, up front.
    pub fn new(
        generator: Arc<dyn ProfileGenerator>,
        config: GenerationConfig,
    ) -> Result<Self, SchemaError> {
        let instruction: Arc<str> = system_instruction()?.into();
        let schema = Arc::new(schema()?.clone());
        Ok(Self {
            inner: Arc::new(Inner {
                generator,
                config,
                instruction,
                schema,
            }),
        })
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.inner.config
    }

    pub fn instruction(&self) -> &str {
        &self.inner.instruction
    }

    /// Decode and validate a raw request body, then generate.
    pub async fn generate_from_body(&self, body: &[u8]) -> Result<CharacterProfile, GenerationError> {
        let raw: Value = serde_json::from_slice(body)
            .map_err(|e| GenerationError::BadRequest(e.to_string()))?;
        let request = validate_name_request(&raw).map_err(GenerationError::InvalidInput)?;
        self.generate(&request).await
    }

    /// Validate a bare name, then generate.
    pub async fn generate_for_name(&self, name: &str) -> Result<CharacterProfile, GenerationError> {
        let request = NameRequest::parse(name).map_err(GenerationError::InvalidInput)?;
        self.generate(&request).await
    }

    fn request_for(&self, name: &str) -> GenerationRequest {
        let inner = &self.inner;
        GenerationRequest {
            instruction: Arc::clone(&inner.instruction),
            name: name.to_string(),
            schema: Arc::clone(&inner.schema),
            model: inner.config.model.clone(),
            reasoning_effort: inner.config.reasoning_effort,
        }
    }

    /// One generator call under the configured deadline. The result is
    /// always validated and never repaired.
    pub async fn generate(&self, request: &NameRequest) -> Result<CharacterProfile, GenerationError> {
        let inner = &self.inner;
        let req = self.request_for(request.name());
        info!(
            generator = inner.generator.name(),
            name_len = charsheet_core::name::name_len(&req.name),
            "generating profile"
        );

        let deadline = inner.config.timeout;
        let raw = match tokio::time::timeout(deadline, inner.generator.generate(&req)).await {
            Err(_) => {
                warn!(timeout_secs = deadline.as_secs_f64(), "generation deadline exceeded");
                return Err(FailureCause::Unavailable(format!(
                    "no response within {}s",
                    deadline.as_secs_f64()
                ))
                .into());
            }
            Ok(Err(e)) => {
                warn!(retryable = e.is_retryable(), "generator failed: {e}");
                return Err(FailureCause::from(e).into());
            }
            Ok(Ok(v)) => v,
        };

        match validate_profile(&raw) {
            Ok(profile) => {
                info!(id = %profile.meta.id, "profile generated");
                Ok(profile)
            }
            Err(violations) => {
                warn!(
                    violations = violations.len(),
                    first = %violations.first().map(ToString::to_string).unwrap_or_default(),
                    "generator output does not conform"
                );
                Err(FailureCause::NonConforming(violations).into())
            }
        }
    }
}
