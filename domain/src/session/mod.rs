//! LLM session domain.
//!
//! - [`entities::Message`]: a single chat message sent to a model
//! - [`stream::StreamEvent`]: one event of a streamed model response

pub mod entities;
pub mod stream;
