//! Execution parameters: per-call limits of a deliberation run.
//!
//! These are application-layer concerns, not domain policy.

use roundtable_domain::SynthesisParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Execution control parameters for
/// [`RunDeliberationUseCase`](crate::use_cases::run_deliberation::RunDeliberationUseCase).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Bound on one model call, connect plus full stream. `None` disables it.
    pub call_timeout: Option<Duration>,
    /// Request parameters of the synthesis call.
    pub synthesis: SynthesisParams,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(120)),
            synthesis: SynthesisParams::default(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_synthesis(mut self, synthesis: SynthesisParams) -> Self {
        self.synthesis = synthesis;
        self
    }
}
