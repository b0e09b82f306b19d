//! Presentation layer for ai-roundtable
//!
//! This crate contains the CLI definition, result formatters and the
//! event sinks that show a deliberation while it runs.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use progress::transcript::StreamingPrinter;
