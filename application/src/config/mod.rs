//! Application-level configuration.
//!
//! - [`ExecutionParams`]: per-call timeout and synthesis request parameters

pub mod execution_params;

pub use execution_params::ExecutionParams;
