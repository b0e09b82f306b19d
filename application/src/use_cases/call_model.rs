//! Streaming call client
//!
//! Issues one request for one model, forwards each chunk to a token callback
//! in delivery order, and settles to the full text or an error. The completed
//! text is always exactly the concatenation of the forwarded chunks.

use crate::ports::llm_transport::{ChatRequest, GatewayError, LlmTransport};
use roundtable_domain::{Message, Model, StreamEvent, TokenUsage};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// Why a single call failed. Recorded on the model's response, never fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error("Cancelled")]
    Cancelled,
}

/// Sampling parameters of one call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Settled output of a successful call
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutput {
    pub text: String,
    pub usage: TokenUsage,
}

/// Client that performs single streamed model calls over a transport.
pub struct StreamingCallClient<T: LlmTransport + 'static> {
    transport: Arc<T>,
    timeout: Option<Duration>,
}

impl<T: LlmTransport + 'static> Clone for StreamingCallClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            timeout: self.timeout,
        }
    }
}

impl<T: LlmTransport + 'static> StreamingCallClient<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Perform one call.
    ///
    /// `on_token` sees every non-empty chunk. The call settles as
    /// [`CallError::Cancelled`] as soon as `cancel` fires, and as
    /// [`CallError::Timeout`] when the configured bound elapses.
    pub async fn call<F>(
        &self,
        model: &Model,
        messages: Vec<Message>,
        params: CallParams,
        cancel: &CancellationToken,
        mut on_token: F,
    ) -> Result<CallOutput, CallError>
    where
        F: FnMut(&str) + Send,
    {
        let request = ChatRequest {
            model: model.reference.clone(),
            api_key: model.api_key.clone(),
            messages,
            temperature: params.temperature,
            max_tokens: params.max_tokens,
        };
        debug!(model = %model.reference, "Dispatching model call");

        let stream_future = self.stream(request, &mut on_token);

        // Wrap with timeout if configured
        let bounded = async {
            match self.timeout {
                Some(timeout) => match tokio::time::timeout(timeout, stream_future).await {
                    Ok(r) => r,
                    Err(_) => Err(CallError::Timeout(timeout)),
                },
                None => stream_future.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CallError::Cancelled),
            result = bounded => result,
        }
    }

    async fn stream<F>(&self, request: ChatRequest, on_token: &mut F) -> Result<CallOutput, CallError>
    where
        F: FnMut(&str) + Send,
    {
        let model = request.model.clone();
        let mut handle = self.transport.stream_chat(request).await?;
        let mut text = String::new();

        while let Some(event) = handle.receiver.recv().await {
            match event {
                StreamEvent::Delta(chunk) => {
                    if chunk.is_empty() {
                        continue;
                    }
                    trace!(model = %model, len = chunk.len(), "chunk");
                    on_token(&chunk);
                    text.push_str(&chunk);
                }
                StreamEvent::Completed { text: tail, usage } => {
                    // Non-streaming transports deliver the whole text here
                    if text.is_empty() && !tail.is_empty() {
                        on_token(&tail);
                        text = tail;
                    }
                    return Ok(CallOutput { text, usage });
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::StreamError(e).into());
                }
            }
        }

        // Channel closed without a terminal event: end of body
        Ok(CallOutput {
            text,
            usage: TokenUsage::default(),
        })
    }
}
