//! Progress reporting for deliberation runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use roundtable_application::EventSink;
use roundtable_domain::core::string::{single_line, truncate};
use roundtable_domain::{DeliberationEvent, ModelRef, Round};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

const ERROR_PREVIEW_CHARS: usize = 60;

/// Reports progress with one indicatif bar per round
pub struct ProgressReporter {
    multi: MultiProgress,
    bars: Mutex<HashMap<Round, ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    fn round_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn round_short_name(round: Round) -> &'static str {
        match round {
            Round::Independent => "Round 1",
            Round::CrossExamination => "Round 2",
            Round::Debate => "Round 2.5",
            Round::Synthesis => "Round 3",
        }
    }

    fn with_bar(&self, round: Round, f: impl FnOnce(&ProgressBar)) {
        let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(pb) = bars.get(&round) {
            f(pb);
        }
    }

    fn start(&self, round: Round, models: &[ModelRef]) {
        let pb = self.multi.add(ProgressBar::new(models.len() as u64));
        pb.set_style(Self::round_style());
        pb.set_prefix(round.display_name());
        pb.set_message("Waiting for responses...");
        self.bars
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(round, pb);
    }

    /// Position of a round's bar, if the round has started.
    pub fn position(&self, round: Round) -> Option<u64> {
        let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        bars.get(&round).map(|pb| pb.position())
    }

    /// Whether a round's bar has been finished.
    pub fn is_finished(&self, round: Round) -> bool {
        let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
        bars.get(&round).is_some_and(|pb| pb.is_finished())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for ProgressReporter {
    fn on_event(&self, event: &DeliberationEvent) {
        match event {
            DeliberationEvent::RoundStart { round, models } => self.start(*round, models),
            DeliberationEvent::RoundComplete { round, model, .. } => self.with_bar(*round, |pb| {
                pb.set_message(format!("{} {}", "v".green(), model));
                pb.inc(1);
            }),
            DeliberationEvent::RoundError {
                round,
                model,
                error,
            } => self.with_bar(*round, |pb| {
                pb.set_message(format!(
                    "{} {} ({})",
                    "x".red(),
                    model,
                    truncate(&single_line(error), ERROR_PREVIEW_CHARS)
                ));
                pb.inc(1);
            }),
            DeliberationEvent::RoundFinished {
                round,
                succeeded,
                failed,
            } => self.with_bar(*round, |pb| {
                let summary = if *failed == 0 {
                    format!("{} complete!", Self::round_short_name(*round).green())
                } else {
                    format!(
                        "{} complete ({} ok, {} failed)",
                        Self::round_short_name(*round).yellow(),
                        succeeded,
                        failed
                    )
                };
                pb.finish_with_message(summary);
            }),
            DeliberationEvent::Error { .. } => {
                let bars = self.bars.lock().unwrap_or_else(PoisonError::into_inner);
                for pb in bars.values().filter(|pb| !pb.is_finished()) {
                    pb.abandon_with_message("aborted".red().to_string());
                }
            }
            _ => {}
        }
    }
}

/// Simple text-based progress on stderr (no fancy UI)
pub struct SimpleProgress;

impl EventSink for SimpleProgress {
    fn on_event(&self, event: &DeliberationEvent) {
        match event {
            DeliberationEvent::RoundStart { round, models } => eprintln!(
                "{} {} ({} models)",
                "->".cyan(),
                round.display_name().bold(),
                models.len()
            ),
            DeliberationEvent::RoundComplete { model, .. } => {
                eprintln!("  {} {}", "v".green(), model)
            }
            DeliberationEvent::RoundError { model, error, .. } => eprintln!(
                "  {} {} ({})",
                "x".red(),
                model,
                truncate(&single_line(error), ERROR_PREVIEW_CHARS)
            ),
            DeliberationEvent::RoundFinished { .. } => eprintln!(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::TokenUsage;

    fn models() -> Vec<ModelRef> {
        vec![
            ModelRef::new("openai", "gpt-4o"),
            ModelRef::new("anthropic", "claude-3-5-haiku-20241022"),
        ]
    }

    #[test]
    fn test_bar_tracks_settled_calls() {
        let reporter = ProgressReporter::with_draw_target(ProgressDrawTarget::hidden());
        let [a, b]: [ModelRef; 2] = models().try_into().unwrap();

        assert_eq!(reporter.position(Round::Independent), None);

        reporter.on_event(&DeliberationEvent::RoundStart {
            round: Round::Independent,
            models: models(),
        });
        reporter.on_event(&DeliberationEvent::Token {
            round: Round::Independent,
            model: a.clone(),
            chunk: "hi".to_string(),
        });
        assert_eq!(reporter.position(Round::Independent), Some(0));

        reporter.on_event(&DeliberationEvent::RoundComplete {
            round: Round::Independent,
            model: a,
            text: "hi".to_string(),
            usage: TokenUsage::default(),
        });
        reporter.on_event(&DeliberationEvent::RoundError {
            round: Round::Independent,
            model: b,
            error: "API error: 500 - boom".to_string(),
        });
        assert_eq!(reporter.position(Round::Independent), Some(2));
        assert!(!reporter.is_finished(Round::Independent));

        reporter.on_event(&DeliberationEvent::RoundFinished {
            round: Round::Independent,
            succeeded: 1,
            failed: 1,
        });
        assert!(reporter.is_finished(Round::Independent));
    }

    #[test]
    fn test_error_abandons_open_bars() {
        let reporter = ProgressReporter::with_draw_target(ProgressDrawTarget::hidden());
        reporter.on_event(&DeliberationEvent::RoundStart {
            round: Round::Synthesis,
            models: models()[..1].to_vec(),
        });
        reporter.on_event(&DeliberationEvent::Error {
            message: "Synthesis failed: boom".to_string(),
        });
        assert!(reporter.is_finished(Round::Synthesis));
    }

    #[test]
    fn test_events_for_unknown_round_are_ignored() {
        let reporter = ProgressReporter::with_draw_target(ProgressDrawTarget::hidden());
        reporter.on_event(&DeliberationEvent::RoundFinished {
            round: Round::Debate,
            succeeded: 0,
            failed: 0,
        });
        assert!(!reporter.is_finished(Round::Debate));
    }
}
