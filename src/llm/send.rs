use crate::config::OpenAiSettings;
use crate::history::Turn;
use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse, WireMessage};
use crate::llm::{CompletionOptions, CompletionService, RequestError};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, instrument, warn};
use url::Url;
use zeroize::Zeroizing;

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    client: Client,
    endpoint: Url,
    api_key: Zeroizing<String>,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

impl OpenAiClient {
    /// `timeout` of `None` waits for the API as long as it takes.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RequestError> {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| RequestError::Setup(format!("invalid base URL {base_url}: {e}")))?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RequestError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key: Zeroizing::new(api_key.into()),
        })
    }

    pub fn from_settings(settings: &OpenAiSettings) -> Result<Self, RequestError> {
        Self::new(
            &settings.base_url,
            settings.api_key.as_str(),
            settings.request_timeout_secs.map(Duration::from_secs),
        )
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, body: &ChatCompletionRequest) -> Result<String, RequestError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(self.api_key.as_str())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RequestError::Timeout
                } else {
                    RequestError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(match status.as_u16() {
                401 => RequestError::Unauthorized,
                429 => RequestError::RateLimited,
                code => RequestError::Status { status: code, body },
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| RequestError::Malformed(format!("invalid JSON body: {e}")))?;

        parsed
            .into_content()
            .ok_or_else(|| RequestError::Malformed("response carried no message content".into()))
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    #[instrument(skip(self, turns, options), fields(turns = turns.len(), model = %options.model))]
    async fn complete(
        &self,
        turns: &[Turn],
        options: &CompletionOptions,
    ) -> Result<String, RequestError> {
        let start = Instant::now();
        let body = ChatCompletionRequest {
            model: options.model.clone(),
            messages: turns.iter().map(WireMessage::from).collect(),
            temperature: options.temperature,
            max_tokens: options.max_output_tokens,
        };

        match self.post(&body).await {
            Ok(content) => {
                debug!(
                    latency_ms = start.elapsed().as_millis() as u64,
                    reply_length = content.len(),
                    "Completion received"
                );
                Ok(content)
            }
            Err(e) => {
                warn!(
                    latency_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Completion request failed"
                );
                Err(e)
            }
        }
    }
}
