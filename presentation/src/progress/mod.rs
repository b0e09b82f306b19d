//! Live progress sinks

pub mod reporter;
pub mod transcript;
