//! CLI entrypoint for AI Roundtable
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use roundtable_application::{CompositeEventSink, EventSink, RunDeliberationUseCase};
use roundtable_domain::{
    ApiKey, ConfigIssue, DeliberationConfig, Model, ModelCatalog, ModelRef, OutputFormat,
    Question, RoundCount, Severity,
};
use roundtable_infrastructure::config::parse_settings;
use roundtable_infrastructure::{ConfigLoader, FileConfig, HttpGatewayTransport, JsonlEventLog};
use roundtable_presentation::{
    Cli, ConsoleFormatter, ProgressReporter, SimpleProgress, StreamingPrinter,
};
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting AI Roundtable");

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    // === Configuration ===
    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.no_color || !config.output.color {
        colored::control::set_override(false);
    }

    let catalog = ModelCatalog::builtin();

    if cli.list_models {
        println!("{}", ConsoleFormatter::format_catalog(&catalog));
        return Ok(());
    }

    report_issues(&config.validate())?;

    let question = Question::try_new(cli.question.clone().unwrap_or_default())?;
    let deliberation = build_deliberation(&cli, &config, &catalog, question)?;

    // === Dependency Injection ===
    let gateway_url = cli
        .gateway_url
        .clone()
        .unwrap_or_else(|| config.gateway.url.clone());
    let transport = Arc::new(
        HttpGatewayTransport::with_connect_timeout(&gateway_url, config.gateway.connect_timeout())
            .context("Failed to create gateway client")?,
    );
    info!(url = %gateway_url, "Using chat gateway");

    let (mut params, _) = config.execution.to_execution_params();
    if let Some(secs) = cli.timeout {
        params = params.with_call_timeout((secs > 0).then(|| Duration::from_secs(secs)));
    }

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    // Live transcript goes to stdout, so it's off when stdout carries JSON
    let streaming = cli.stream && format != OutputFormat::Json;
    let sink = build_sink(&cli, streaming);

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling outstanding calls");
                cancel.cancel();
            }
        });
    }

    let use_case = RunDeliberationUseCase::new(transport)
        .with_params(params)
        .with_cancellation(cancel);

    let result = use_case.execute(deliberation, sink).await?;

    // Output results
    let output = match format {
        OutputFormat::Full => ConsoleFormatter::format(&result),
        // Already on screen
        OutputFormat::Synthesis if streaming => return Ok(()),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };

    println!("{}", output);

    Ok(())
}

/// Log warnings; print errors and abort if there are any.
fn report_issues(issues: &[ConfigIssue]) -> Result<()> {
    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!("{}", issue.message);
    }
    if ConfigIssue::has_errors(issues) {
        for issue in issues.iter().filter(|i| i.severity == Severity::Error) {
            eprintln!("{}", issue);
        }
        bail!("Invalid configuration");
    }
    Ok(())
}

/// Merge CLI flags over the file config into a [`DeliberationConfig`].
fn build_deliberation(
    cli: &Cli,
    config: &FileConfig,
    catalog: &ModelCatalog,
    question: Question,
) -> Result<DeliberationConfig> {
    let refs: Vec<ModelRef> = if cli.model.is_empty() {
        config.models.parse_participants().0
    } else {
        cli.model.clone()
    };
    if refs.is_empty() {
        bail!("No models given. Use -m provider:model (at least twice) or [models] participants.");
    }

    let models: Vec<Model> = refs
        .iter()
        .map(|r| {
            let api_key = config
                .providers
                .resolve_api_key(r.provider_id())
                .unwrap_or_else(|| {
                    warn!(model = %r, "No API key found for provider '{}'", r.provider_id());
                    ApiKey::default()
                });
            catalog.resolve(r, api_key)
        })
        .collect();

    let mode = cli
        .mode
        .unwrap_or_else(|| config.deliberation.parse_mode().0);
    let rounds = match cli.rounds {
        Some(n) => RoundCount::try_from(n)?,
        None => config.deliberation.parse_rounds().0,
    };
    let synthesizer = cli
        .synthesizer
        .clone()
        .unwrap_or_else(|| config.deliberation.parse_synthesizer().0);

    let mut deliberation = DeliberationConfig::new(question, models)
        .with_mode(mode)
        .with_rounds(rounds)
        .with_synthesizer(synthesizer);
    for (model, overrides) in parse_settings(&config.settings).0 {
        deliberation = deliberation.with_settings(model, overrides);
    }

    Ok(deliberation)
}

fn build_sink(cli: &Cli, streaming: bool) -> Arc<dyn EventSink> {
    let mut sink = CompositeEventSink::new(Vec::new());

    if !cli.quiet {
        if streaming {
            sink.push(Arc::new(StreamingPrinter::stdout()));
        } else if std::io::stderr().is_terminal() {
            sink.push(Arc::new(ProgressReporter::new()));
        } else {
            sink.push(Arc::new(SimpleProgress));
        }
    }

    if let Some(path) = &cli.event_log {
        match JsonlEventLog::new(path) {
            Some(log) => {
                let log = if cli.event_log_no_tokens {
                    log.without_tokens()
                } else {
                    log
                };
                info!(path = %log.path().display(), "Writing event log");
                sink.push(Arc::new(log));
            }
            None => warn!("Event log disabled: could not open {}", path.display()),
        }
    }

    Arc::new(sink)
}
