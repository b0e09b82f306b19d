//! LLM transport port
//!
//! Defines the interface for sending one chat request to a model endpoint and
//! receiving its streamed response.

use async_trait::async_trait;
use roundtable_domain::{ApiKey, Message, ModelRef, StreamEvent, TokenUsage};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors that can occur during transport operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error: {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Stream error: {0}")]
    StreamError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Transport closed")]
    TransportClosed,
}

/// One chat request for one model.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: ModelRef,
    pub api_key: ApiKey,
    pub messages: Vec<Message>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Transport for model communication
///
/// This port defines how the application layer reaches model endpoints.
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmTransport: Send + Sync {
    /// Send a request and return its response stream.
    ///
    /// A non-success status is an `Err` here; failures after the body has
    /// started arrive as [`StreamEvent::Error`] on the handle.
    async fn stream_chat(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError>;
}

/// Handle for receiving streaming events from one request.
///
/// Wraps an `mpsc::Receiver<StreamEvent>` and provides convenience methods
/// for consuming the stream.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(mut self) -> Result<(String, TokenUsage), GatewayError> {
        let mut full_text = String::new();
        while let Some(event) = self.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => full_text.push_str(&chunk),
                StreamEvent::Completed { text, usage } => {
                    if full_text.is_empty() {
                        return Ok((text, usage));
                    }
                    return Ok((full_text, usage));
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::StreamError(e));
                }
            }
        }
        // Channel closed without Completed; return what we have
        Ok((full_text, TokenUsage::default()))
    }
}
