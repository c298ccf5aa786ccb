//! Console output formatting for turn replies

use colored::Colorize;
use majordomo_application::TurnReply;
use serde_json::Value;

/// Formats turn replies for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format one reply: the conversational text, optionally followed by
    /// the structured payload.
    ///
    /// The text is always exactly what the coordinator decided to say;
    /// formatting only decorates around it.
    pub fn format_reply(reply: &TurnReply, show_data: bool) -> String {
        let mut output = String::new();
        output.push_str(&reply.text_response);
        output.push('\n');

        if show_data && let Some(data) = &reply.structured_output {
            output.push('\n');
            output.push_str(&format!("{}\n", "Structured data:".dimmed()));
            output.push_str(&Self::format_data(data));
            output.push('\n');
        }

        output
    }

    /// Pretty JSON, dimmed so it reads as an aside.
    pub fn format_data(value: &Value) -> String {
        let pretty =
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        pretty.dimmed().to_string()
    }

    /// Session line printed under a reply in one-shot mode.
    pub fn format_session_hint(session_id: &str) -> String {
        format!("(session: {session_id} - pass --session {session_id} to continue)")
            .dimmed()
            .to_string()
    }

    pub fn format_warning(text: &str) -> String {
        format!("{} {}", "Warning:".yellow().bold(), text)
    }

    pub fn format_error(text: &str) -> String {
        format!("{} {}", "Error:".red().bold(), text)
    }
}
