//! HTTP gateway transport.
//!
//! Talks to a chat gateway that normalizes vendor APIs into one request shape
//! and answers with a plain streamed text body:
//!
//! ```text
//! POST <url>
//! {"provider":"openai","apiKey":"…","model":"gpt-4o","messages":[…],"temperature":0.7,"maxTokens":2048}
//!
//! 200 OK
//! x-input-tokens: 12      (optional)
//! x-output-tokens: 340    (optional)
//! <text chunks…>
//! ```

use super::utf8::Utf8ChunkDecoder;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::HeaderMap;
use roundtable_application::ports::llm_transport::{
    ChatRequest, GatewayError, LlmTransport, StreamHandle,
};
use roundtable_domain::{Message, StreamEvent, TokenUsage};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:3000/api/chat";
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

const INPUT_TOKENS_HEADER: &str = "x-input-tokens";
const OUTPUT_TOKENS_HEADER: &str = "x-output-tokens";

/// Wire body of a gateway request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GatewayRequest<'a> {
    provider: &'a str,
    api_key: &'a str,
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

/// [`LlmTransport`] over the streaming chat gateway
pub struct HttpGatewayTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpGatewayTransport {
    pub fn new(url: impl Into<String>) -> Result<Self, GatewayError> {
        Self::with_connect_timeout(url, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_connect_timeout(
        url: impl Into<String>,
        connect_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl LlmTransport for HttpGatewayTransport {
    async fn stream_chat(&self, request: ChatRequest) -> Result<StreamHandle, GatewayError> {
        let body = GatewayRequest {
            provider: request.model.provider_id(),
            api_key: request.api_key.expose(),
            model: request.model.model_id(),
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        debug!(url = %self.url, model = %request.model, "Sending gateway request");

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<unreadable body: {}>", e));
            return Err(GatewayError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let usage = usage_from_headers(response.headers());
        let model = request.model.clone();
        let (tx, rx) = mpsc::channel(64);

        tokio::spawn(async move {
            let mut stream = response.bytes_stream();
            let mut decoder = Utf8ChunkDecoder::new();

            while let Some(chunk) = stream.next().await {
                match chunk {
                    Ok(bytes) => {
                        let text = decoder.decode(&bytes);
                        if !text.is_empty() && tx.send(StreamEvent::Delta(text)).await.is_err() {
                            return; // Receiver dropped
                        }
                    }
                    Err(e) => {
                        warn!(model = %model, "Gateway stream failed: {}", e);
                        let _ = tx.send(StreamEvent::Error(e.to_string())).await;
                        return;
                    }
                }
            }

            let tail = decoder.finish();
            if !tail.is_empty() && tx.send(StreamEvent::Delta(tail)).await.is_err() {
                return;
            }
            let _ = tx.send(StreamEvent::completed(usage)).await;
        });

        Ok(StreamHandle::new(rx))
    }
}

fn usage_from_headers(headers: &HeaderMap) -> TokenUsage {
    let count = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok())
    };
    TokenUsage::new(count(INPUT_TOKENS_HEADER), count(OUTPUT_TOKENS_HEADER))
}
