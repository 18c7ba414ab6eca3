//! Chat Backend
//!
//! The remote assistant is reached with one JSON call per user turn:
//!
//! ```text
//! POST /chat  {"message": "<user text>"}   ->   2xx {"response": "<reply>"}
//! ```
//!
//! Network errors, non-2xx statuses and bodies without a string `response`
//! field are all request failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GuideError, Result};

/// Outbound request body
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Success response body
///
/// Extra fields (the guide backend also sends `suggestions`) are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Transport to the chat assistant
///
/// Futures are not required to be `Send`: the browser transport runs on the
/// single-threaded event loop.
#[async_trait(?Send)]
pub trait ChatBackend {
    /// Send one user message and return the assistant's reply text
    async fn send(&self, message: &str) -> Result<String>;
}

/// Map an HTTP status and body to the reply text or a request failure
pub fn interpret_response(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(GuideError::Status(status));
    }

    serde_json::from_str::<ChatReply>(body)
        .map(|reply| reply.response)
        .map_err(|e| GuideError::MalformedResponse(e.to_string()))
}
