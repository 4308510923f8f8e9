use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How hard the model should reason before answering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReasoningEffort {
    Minimal,
    #[default]
    Low,
    Medium,
    High,
}

impl ReasoningEffort {
    pub fn as_str(self) -> &'static str {
        match self {
            ReasoningEffort::Minimal => "minimal",
            ReasoningEffort::Low => "low",
            ReasoningEffort::Medium => "medium",
            ReasoningEffort::High => "high",
        }
    }
}

impl fmt::Display for ReasoningEffort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown reasoning effort '{0}' (expected minimal, low, medium or high)")]
pub struct ReasoningEffortParseError(pub String);

impl FromStr for ReasoningEffort {
    type Err = ReasoningEffortParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(ReasoningEffort::Minimal),
            "low" => Ok(ReasoningEffort::Low),
            "medium" => Ok(ReasoningEffort::Medium),
            "high" => Ok(ReasoningEffort::High),
            _ => Err(ReasoningEffortParseError(s.to_string())),
        }
    }
}

/// Per-call generation settings shared by every request.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub model: String,
    pub reasoning_effort: ReasoningEffort,
    /// Deadline for one generator call, retries included.
    pub timeout: Duration,
}

pub const DEFAULT_MODEL: &str = "gpt-5";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            reasoning_effort: ReasoningEffort::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
