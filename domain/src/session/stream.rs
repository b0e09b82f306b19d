//! Streaming events for LLM responses.
//!
//! [`StreamEvent`] represents individual events in a streaming model response,
//! enabling real-time display of model output as it's generated.

use crate::deliberation::value_objects::TokenUsage;

/// An event in a streaming LLM response.
///
/// Bridges transport-level streaming (raw HTTP body chunks) to the
/// application layer. A stream ends with exactly one `Completed` or `Error`.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A text chunk from the model, as delivered.
    Delta(String),
    /// End of stream.
    ///
    /// `text` is the full response when the transport knows it without
    /// streaming deltas, otherwise empty.
    Completed { text: String, usage: TokenUsage },
    /// An error that occurred during streaming.
    Error(String),
}

impl StreamEvent {
    /// End-of-stream marker with usage and no trailing text.
    pub fn completed(usage: TokenUsage) -> Self {
        StreamEvent::Completed {
            text: String::new(),
            usage,
        }
    }

    /// Returns the text content if this is a Delta or Completed event.
    pub fn text(&self) -> Option<&str> {
        match self {
            StreamEvent::Delta(s) | StreamEvent::Completed { text: s, .. } => Some(s),
            StreamEvent::Error(_) => None,
        }
    }

    /// Returns true if this event signals the end of the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Completed { .. } | StreamEvent::Error(_))
    }
}
