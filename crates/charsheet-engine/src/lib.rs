#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod provider;
pub mod retry;
pub mod service;

pub use config::{GenerationConfig, ReasoningEffort};
pub use error::{FailureCause, GenerationError};
pub use provider::{GenerationRequest, ProfileGenerator, ProviderError, ProviderErrorKind};
pub use retry::{RetryPolicy, RetryingGenerator};
pub use service::ProfileService;
