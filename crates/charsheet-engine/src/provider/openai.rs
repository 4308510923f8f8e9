use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use super::error::truncate_body;
use super::{GenerationRequest, ProfileGenerator, ProviderError, ProviderErrorKind};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Name the output contract is registered under in `response_format`.
const SCHEMA_NAME: &str = "character_profile";

/// Chat-completions generator using strict `json_schema` structured output.
pub struct OpenAiGenerator {
    client: Client,
    base_url: String,
    api_key: String,
}

/// HTTPS always; plain HTTP only for a local server.
fn validate_base_url(base_url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(base_url)
        .with_context(|| format!("invalid base_url '{base_url}'"))?;
    let host = parsed.host_str().unwrap_or("");

    match parsed.scheme() {
        "https" => Ok(()),
        "http" => {
            let is_localhost =
                host == "localhost" || host == "127.0.0.1" || host == "[::1]" || host == "::1";
            if !is_localhost {
                bail!("HTTP is only permitted for localhost (base_url: '{base_url}')");
            }
            warn!(base_url, "using unencrypted HTTP for a local provider");
            Ok(())
        }
        scheme => bail!("unsupported URL scheme '{scheme}' in base_url '{base_url}'"),
    }
}

impl OpenAiGenerator {
    /// `timeout` bounds a single HTTP exchange.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        validate_base_url(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn request_body(req: &GenerationRequest) -> Value {
        json!({
            "model": req.model,
            "messages": [
                { "role": "system", "content": &*req.instruction },
                { "role": "user", "content": req.name },
            ],
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": SCHEMA_NAME,
                    "strict": true,
                    "schema": &*req.schema,
                },
            },
            "reasoning_effort": req.reasoning_effort.as_str(),
        })
    }
}

/// Pull the generated document out of a chat-completions response.
fn extract_profile(data: &Value) -> Result<Value, ProviderError> {
    let message = data["choices"]
        .get(0)
        .map(|c| &c["message"])
        .ok_or_else(|| ProviderError::new(ProviderErrorKind::InvalidResponse, "no choices in response"))?;

    if let Some(refusal) = message["refusal"].as_str() {
        return Err(ProviderError::new(ProviderErrorKind::Refused, refusal));
    }

    let content = message["content"].as_str().ok_or_else(|| {
        ProviderError::new(ProviderErrorKind::InvalidResponse, "response has no content")
    })?;
    serde_json::from_str(content).map_err(|e| {
        ProviderError::new(
            ProviderErrorKind::InvalidResponse,
            format!("content is not JSON: {e}"),
        )
    })
}

#[async_trait]
impl ProfileGenerator for OpenAiGenerator {
    async fn generate(&self, req: &GenerationRequest) -> Result<Value, ProviderError> {
        let body = Self::request_body(req);
        let url = format!("{}/chat/completions", self.base_url);
        info!(model = %req.model, url = %url, effort = %req.reasoning_effort, "calling provider");

        let mut call = self.client.post(&url).json(&body);
        if !self.api_key.is_empty() {
            call = call.bearer_auth(&self.api_key);
        }
        let resp = match call.send().await {
            Ok(r) => r,
            Err(e) => {
                error!("provider request failed: {e}");
                return Err(ProviderError::network(&e));
            }
        };

        let status = resp.status();
        let text = resp.text().await.map_err(|e| ProviderError::network(&e))?;
        if !status.is_success() {
            error!(status = %status, "provider API error: {}", truncate_body(&text));
            return Err(ProviderError::from_status(status.as_u16(), &text));
        }
        debug!("provider response: {}", truncate_body(&text));

        let data: Value = serde_json::from_str(&text).map_err(|e| {
            ProviderError::new(
                ProviderErrorKind::InvalidResponse,
                format!("response is not JSON: {e}"),
            )
        })?;
        extract_profile(&data)
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReasoningEffort;
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> GenerationRequest {
        GenerationRequest {
            instruction: "instr".into(),
            name: "ルフィ".into(),
            schema: Arc::new(json!({ "type": "object" })),
            model: "gpt-5".into(),
            reasoning_effort: ReasoningEffort::Low,
        }
    }

    fn completion(content: &str) -> Value {
        json!({
            "choices": [
                { "message": { "role": "assistant", "content": content, "refusal": null } }
            ]
        })
    }

    async fn generator(server: &MockServer) -> OpenAiGenerator {
        OpenAiGenerator::new(&server.uri(), "sk-test", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn base_url_rules() {
        assert!(validate_base_url("https://api.openai.com/v1").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8080").is_ok());
        assert!(validate_base_url("http://example.com").is_err());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn body_carries_strict_schema_contract() {
        let body = OpenAiGenerator::request_body(&request());
        assert_eq!(body["response_format"]["type"], "json_schema");
        assert_eq!(body["response_format"]["json_schema"]["name"], "character_profile");
        assert_eq!(body["response_format"]["json_schema"]["strict"], true);
        assert_eq!(body["response_format"]["json_schema"]["schema"]["type"], "object");
        assert_eq!(body["reasoning_effort"], "low");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "ルフィ");
    }

    #[tokio::test]
    async fn parses_content_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"{"a":1}"#)))
            .expect(1)
            .mount(&server)
            .await;

        let v = generator(&server).await.generate(&request()).await.unwrap();
        assert_eq!(v, json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn refusal_is_classified() {
        let server = MockServer::start().await;
        let body = json!({
            "choices": [ { "message": { "content": null, "refusal": "I can't help" } } ]
        });
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = generator(&server).await.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Refused);
    }

    #[tokio::test]
    async fn non_json_content_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{\"trunc")))
            .mount(&server)
            .await;

        let err = generator(&server).await.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::InvalidResponse);
    }

    #[tokio::test]
    async fn http_errors_keep_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let err = generator(&server).await.generate(&request()).await.unwrap_err();
        assert_eq!(err.status, Some(503));
        assert!(err.is_retryable());
    }
}
