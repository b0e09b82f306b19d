//! Console output formatter for deliberation results

use colored::{ColoredString, Colorize};
use roundtable_domain::{DeliberationResult, ModelCatalog, Round, RoundResponse, TokenUsage};

/// Formats deliberation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete result: every round, every model, then the answer
    pub fn format(result: &DeliberationResult) -> String {
        let mut output = String::new();

        // Header
        output.push_str(&Self::header("AI Roundtable"));
        output.push('\n');

        output.push_str(&format!(
            "{} {}\n\n",
            "Question:".cyan().bold(),
            result.prompt
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            Self::participants(result)
        ));
        output.push_str(&format!(
            "{} {} ({} rounds)\n",
            "Mode:".cyan().bold(),
            result.mode,
            result.rounds
        ));

        for round in [Round::Independent, Round::CrossExamination, Round::Debate] {
            let responses = result.round(round);
            if responses.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(round.display_name()));
            for response in responses {
                output.push_str(&Self::response_block(response));
            }
        }

        output.push_str(&Self::section_header(Round::Synthesis.display_name()));
        match &result.final_answer {
            Some(answer) => {
                output.push_str(&format!(
                    "\n{}\n",
                    format!("Synthesizer: {}", answer.name).yellow().bold()
                ));
                match &answer.error {
                    None => output.push_str(&format!("\n{}\n", answer.text)),
                    Some(e) => output.push_str(&format!("\n{} {}\n", "Error:".red(), e)),
                }
            }
            None => output.push_str(&format!("\n{}\n", "No synthesis was produced.".dimmed())),
        }

        let total = result.total_usage();
        if !total.is_empty() {
            output.push_str(&format!(
                "\n{} {}\n",
                "Total tokens:".dimmed(),
                Self::usage_label(total)
            ));
        }

        output.push_str(&Self::footer());

        output
    }

    /// Format as JSON
    pub fn format_json(result: &DeliberationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format synthesis only (concise output)
    pub fn format_synthesis_only(result: &DeliberationResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n\n",
            "=== Roundtable Conclusion ===".cyan().bold()
        ));

        output.push_str(&format!("{} {}\n\n", "Q:".bold(), result.prompt));

        output.push_str(&format!(
            "{} {}\n\n",
            "Models consulted:".dimmed(),
            Self::participants(result)
        ));

        match result.final_text() {
            Some(text) => output.push_str(text),
            None => output.push_str(&"No synthesis was produced.".dimmed().to_string()),
        }
        output.push('\n');

        output
    }

    /// List the catalog grouped by provider
    pub fn format_catalog(catalog: &ModelCatalog) -> String {
        let mut output = String::new();

        for provider in catalog.providers() {
            output.push_str(&format!(
                "\n{} {}\n",
                Self::paint(provider.name, provider.color).bold(),
                format!("({})", provider.id).dimmed()
            ));
            for model in provider.models {
                output.push_str(&format!(
                    "  {:<44} {:<28} capability {:>2}\n",
                    format!("{}:{}", provider.id, model.id),
                    model.name,
                    model.capability
                ));
            }
        }

        output
    }

    fn response_block(response: &RoundResponse) -> String {
        let title = format!("── {} ──", response.name);
        match &response.error {
            None => {
                let usage = response.usage();
                let usage = if usage.is_empty() {
                    String::new()
                } else {
                    format!(" {}", Self::usage_label(usage).dimmed())
                };
                format!(
                    "\n{}{}\n{}\n",
                    Self::paint(&title, &response.color).bold(),
                    usage,
                    response.text
                )
            }
            Some(e) => format!("\n{}\nError: {}\n", title.red().bold(), e),
        }
    }

    fn participants(result: &DeliberationResult) -> String {
        result
            .round1
            .iter()
            .map(|r| r.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn usage_label(usage: TokenUsage) -> String {
        let part = |n: Option<u32>| n.map_or_else(|| "?".to_string(), |n| n.to_string());
        format!(
            "[in {} / out {} tokens]",
            part(usage.input_tokens),
            part(usage.output_tokens)
        )
    }

    /// Color text with a `#rrggbb` hex, yellow when the hex is malformed
    fn paint(text: &str, hex: &str) -> ColoredString {
        match parse_hex(hex) {
            Some((r, g, b)) => text.truecolor(r, g, b),
            None => text.yellow(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}
