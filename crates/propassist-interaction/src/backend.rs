//! Transport to the property chat backend.

use async_trait::async_trait;
use propassist_core::chat_api::ChatRequest;
use propassist_core::config::BackendConfig;
use propassist_core::error::{ChatTurnError, PropAssistError, UNREADABLE_BODY};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Url};

/// Sends one chat request and returns the raw success body.
///
/// Implementations must fail with [`ChatTurnError::BackendRequestFailed`]
/// for transport errors and non-2xx statuses. Dropping the returned future
/// must abort the request.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn post_message(&self, request: &ChatRequest) -> Result<String, ChatTurnError>;
}

/// Builds `{base}/chat/property/{property_id}/message`.
///
/// The property id is added as a single, percent-encoded path segment.
pub fn message_endpoint(api_base_url: &str, property_id: &str) -> Result<Url, PropAssistError> {
    let mut url = Url::parse(api_base_url).map_err(|err| {
        PropAssistError::config(format!("Invalid API base URL '{api_base_url}': {err}"))
    })?;
    if property_id.trim().is_empty() {
        return Err(PropAssistError::config("Property id must not be empty"));
    }

    url.path_segments_mut()
        .map_err(|_| {
            PropAssistError::config(format!("API base URL '{api_base_url}' cannot carry a path"))
        })?
        .pop_if_empty()
        .extend(["chat", "property", property_id, "message"]);
    Ok(url)
}

/// [`ChatBackend`] over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    client: Client,
    endpoint: Url,
}

impl HttpChatBackend {
    pub fn new(config: &BackendConfig) -> Result<Self, PropAssistError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| PropAssistError::config(format!("Failed to build HTTP client: {err}")))?;
        let endpoint = message_endpoint(&config.api_base_url, &config.property_id)?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatBackend for HttpChatBackend {
    async fn post_message(&self, request: &ChatRequest) -> Result<String, ChatTurnError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            history_len = request.history.len(),
            "Sending request to backend"
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(request)
            .send()
            .await
            .map_err(|err| ChatTurnError::transport(format!("Backend request failed: {err}")))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "API response status");

        if !status.is_success() {
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| UNREADABLE_BODY.to_string());
            tracing::warn!(status = status.as_u16(), body = %body_text, "API request failed");
            return Err(ChatTurnError::backend(status.as_u16(), body_text));
        }

        response.text().await.map_err(|err| ChatTurnError::BackendRequestFailed {
            status: Some(status.as_u16()),
            body: format!("Failed to read response body: {err}"),
        })
    }
}
