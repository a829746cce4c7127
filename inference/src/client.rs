use std::time::Duration;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::error::{ApiError, OpenAIError};
use async_openai::types::chat::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, error};

use crate::InferenceResult;
use crate::config::InferenceConfig;
use crate::credential::ApiKey;
use errors::InferenceError;

// Error codes and types the provider uses when it refuses the credential.
const CREDENTIAL_ERROR_CODES: &[&str] = &["invalid_api_key", "invalid_organization"];
const CREDENTIAL_ERROR_TYPES: &[&str] = &["authentication_error", "permission_error"];

/// One system instruction plus one user message.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32
}

/// Seam between the extraction logic and the remote provider.
///
/// Implementations make at most one upstream call per invocation and never
/// retry or cache.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    /// Returns the generated text. Missing content is returned as an empty
    /// string; interpreting it is up to the caller.
    async fn complete(&self, request: &CompletionRequest) -> InferenceResult<String>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct OpenAiClient {
    client: InferenceResult<Client<OpenAIConfig>>,
    model: String,
    timeout: Duration
}

impl OpenAiClient {
    /// Builds a client. A missing `api_key` is not an error here: it surfaces
    /// as `UpstreamUnavailable` on every call, before any request is sent.
    pub fn new(config: InferenceConfig, api_key: Option<String>) -> Self {
        let client = ApiKey::resolve(api_key.as_deref()).map(|key| {
            let openai = OpenAIConfig::new()
                .with_api_key(key.expose())
                .with_api_base(config.api_base());
            // A single attempt per call; rate limits and 5xx are not retried.
            let backoff = ExponentialBackoffBuilder::new()
                .with_max_elapsed_time(Some(Duration::ZERO))
                .build();
            Client::with_config(openai).with_backoff(backoff)
        });

        Self {
            client,
            model: config.model,
            timeout: config.timeout
        }
    }

    fn chat_request(
        &self,
        request: &CompletionRequest
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(request.system.as_str())
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(request.user.as_str())
                    .build()?
                    .into()
            ])
            .temperature(request.temperature)
            .build()
    }
}

fn rejects_credential(api_error: &ApiError) -> bool {
    api_error
        .code
        .as_deref()
        .is_some_and(|code| CREDENTIAL_ERROR_CODES.contains(&code))
        || api_error
            .r#type
            .as_deref()
            .is_some_and(|kind| CREDENTIAL_ERROR_TYPES.contains(&kind))
}

fn map_provider_error(e: OpenAIError) -> InferenceError {
    match e {
        OpenAIError::ApiError(api_error) if rejects_credential(&api_error) => {
            error!(error = %api_error, "Inference provider rejected the credential");
            InferenceError::unavailable("inference provider rejected the API key")
        }
        OpenAIError::ApiError(api_error) => {
            error!(error = %api_error, "Inference provider returned an error");
            InferenceError::call_failed(format!("inference provider returned an error: {api_error}"))
        }
        OpenAIError::Reqwest(e) => {
            error!(error = %e, "Chat completion request failed");
            InferenceError::call_failed(format!("request to inference provider failed: {e}"))
        }
        OpenAIError::JSONDeserialize(e, _) => {
            error!(error = %e, "Could not decode chat completion response");
            InferenceError::call_failed(format!("undecodable provider response: {e}"))
        }
        other => {
            error!(error = %other, "Chat completion failed");
            InferenceError::call_failed(other.to_string())
        }
    }
}

#[async_trait]
impl TextCompletion for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> InferenceResult<String> {
        let client = self.client.as_ref().map_err(|e| {
            error!(error = %e, "No usable credential for the inference provider");
            e.clone()
        })?;
        let chat_request = self.chat_request(request).map_err(map_provider_error)?;

        debug!(model = %self.model, "Sending chat completion request");

        let response = tokio::time::timeout(self.timeout, client.chat().create(chat_request))
            .await
            .map_err(|_| {
                error!(timeout = ?self.timeout, "Chat completion request timed out");
                InferenceError::call_failed("request to inference provider timed out")
            })?
            .map_err(map_provider_error)?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::call_failed("provider response contained no choices"))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
