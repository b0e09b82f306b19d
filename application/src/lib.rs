//! Application layer for ai-roundtable
//!
//! This crate contains the deliberation use case, its port definitions and
//! execution parameters. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    event_sink::{ChannelEventSink, CompositeEventSink, EventSink, NoEvents},
    llm_transport::{ChatRequest, GatewayError, LlmTransport, StreamHandle},
};
pub use use_cases::call_model::{CallError, CallOutput, CallParams, StreamingCallClient};
pub use use_cases::response_board::ResponseBoard;
pub use use_cases::run_deliberation::{
    MIN_PARTICIPANTS, RunDeliberationError, RunDeliberationUseCase,
};
