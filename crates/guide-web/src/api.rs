//! API Client

use async_trait::async_trait;
use guide_core::backend::interpret_response;
use guide_core::{ChatBackend, ChatRequest, GuideError, Result};

/// Chat backend reached over HTTP
#[derive(Clone, Debug)]
pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait(?Send)]
impl ChatBackend for HttpChatBackend {
    async fn send(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ChatRequest::new(message))
            .send()
            .await
            .map_err(|e| GuideError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GuideError::Network(e.to_string()))?;

        interpret_response(status, &body)
    }
}
