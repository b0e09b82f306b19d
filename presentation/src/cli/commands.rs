//! CLI command definitions

use clap::{Parser, ValueEnum};
use roundtable_domain::{DeliberationMode, ModelRef, SynthesizerChoice};
use std::path::PathBuf;

/// Output format for deliberation results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every round, every model, then the final answer
    Full,
    /// Only the final synthesis
    Synthesis,
    /// JSON output
    Json,
}

impl From<OutputFormat> for roundtable_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => roundtable_domain::OutputFormat::Full,
            OutputFormat::Synthesis => roundtable_domain::OutputFormat::Synthesis,
            OutputFormat::Json => roundtable_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for ai-roundtable
#[derive(Parser, Debug)]
#[command(name = "roundtable")]
#[command(author, version, about = "AI Roundtable - several models deliberate over one question")]
#[command(long_about = r#"
AI Roundtable poses one question to several models and lets them deliberate.

The rounds:
1. Independent:       every model answers on its own, in parallel
2. Cross-examination: each model critiques the others' answers
2.5 Debate:           (debate mode) models argue the remaining disagreements
3. Synthesis:         one model merges everything into the final answer

Models are given as provider:model. API keys are read from <PROVIDER>_API_KEY
(e.g. OPENAI_API_KEY) unless configured under [providers.<id>].

Configuration files are loaded from (in priority order):
1. ROUNDTABLE_* environment variables
2. --config <path>       Explicit config file
3. ./roundtable.toml     Project-level config
4. ~/.config/ai-roundtable/config.toml   Global config

Example:
  roundtable -m openai:gpt-4o -m anthropic:claude-sonnet-4-20250514 "Is Rust's borrow checker worth it?"
  roundtable --mode debate -o full "Tabs or spaces?"
  roundtable --list-models
"#)]
pub struct Cli {
    /// The question to put to the roundtable
    #[arg(required_unless_present_any = ["list_models", "show_config"])]
    pub question: Option<String>,

    /// Participants as provider:model (can be specified multiple times)
    #[arg(short, long, value_name = "PROVIDER:MODEL")]
    pub model: Vec<ModelRef>,

    /// Deliberation mode: standard, quick or debate
    #[arg(long, value_name = "MODE")]
    pub mode: Option<DeliberationMode>,

    /// Number of rounds to record (2 or 3)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(2..=3))]
    pub rounds: Option<u8>,

    /// Synthesizer: auto, a provider id, or provider:model
    #[arg(long, value_name = "CHOICE")]
    pub synthesizer: Option<SynthesizerChoice>,

    /// Chat gateway endpoint
    #[arg(long, value_name = "URL")]
    pub gateway_url: Option<String>,

    /// Per-call timeout in seconds (0 disables)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Write every deliberation event to a JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Leave streamed token events out of the event log
    #[arg(long, requires = "event_log")]
    pub event_log_no_tokens: bool,

    /// Print responses as they complete instead of progress bars
    #[arg(long)]
    pub stream: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// List the model catalog and exit
    #[arg(long)]
    pub list_models: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
