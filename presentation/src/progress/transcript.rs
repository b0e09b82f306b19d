//! Plain-text live transcript of a deliberation run.
//!
//! Parallel rounds interleave tokens from several models, so their responses
//! are printed whole as each one settles. The synthesis round has a single
//! speaker and is streamed token by token.

use colored::Colorize;
use roundtable_application::EventSink;
use roundtable_domain::{DeliberationEvent, Round};
use std::io::Write;
use std::sync::{Mutex, PoisonError};

/// Event sink that writes the transcript as it happens
pub struct StreamingPrinter<W: Write + Send> {
    out: Mutex<W>,
}

impl StreamingPrinter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> StreamingPrinter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = out.write_all(text.as_bytes());
        let _ = out.flush();
    }
}

impl<W: Write + Send> EventSink for StreamingPrinter<W> {
    fn on_event(&self, event: &DeliberationEvent) {
        match event {
            DeliberationEvent::RoundStart { round, models } => {
                let mut text = format!(
                    "\n{}\n{}\n",
                    round.display_name().cyan().bold(),
                    "-".repeat(40)
                );
                if *round == Round::Synthesis
                    && let Some(model) = models.first()
                {
                    text.push_str(&format!("{}\n\n", format!("── {} ──", model).yellow().bold()));
                }
                self.write(&text);
            }
            DeliberationEvent::Token {
                round: Round::Synthesis,
                chunk,
                ..
            } => self.write(chunk),
            DeliberationEvent::RoundComplete {
                round: Round::Synthesis,
                ..
            } => self.write("\n"),
            DeliberationEvent::RoundComplete { model, text, .. } => self.write(&format!(
                "\n{}\n{}\n",
                format!("── {} ──", model).yellow().bold(),
                text
            )),
            DeliberationEvent::RoundError { model, error, .. } => self.write(&format!(
                "\n{}\nError: {}\n",
                format!("── {} ──", model).red().bold(),
                error
            )),
            DeliberationEvent::Error { message } => {
                self.write(&format!("\n{} {}\n", "Error:".red().bold(), message))
            }
            _ => {}
        }
    }
}
