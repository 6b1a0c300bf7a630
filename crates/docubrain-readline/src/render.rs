//! Text layout for sessions, messages and cited sources.
//!
//! Functions here return plain lines; `main` applies colors when printing.

use docubrain_core::error::DocubrainError;
use docubrain_core::session::{Message, Session, Source};

/// Excerpts are clamped to this many lines under each source.
pub const EXCERPT_MAX_LINES: usize = 2;

/// One line per session: position, active marker, title.
pub fn session_list(sessions: &[Session], active_id: Option<&str>) -> Vec<String> {
    sessions
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let marker = if Some(session.id.as_str()) == active_id {
                '*'
            } else {
                ' '
            };
            format!("{} {:>2}. {}", marker, i + 1, session.title)
        })
        .collect()
}

/// The `Sources:` block under an assistant reply. Empty when nothing is cited.
pub fn sources_block(sources: &[Source]) -> Vec<String> {
    if sources.is_empty() {
        return Vec::new();
    }

    let mut lines = vec!["Sources:".to_string()];
    for source in sources {
        lines.push(format!("  - {} ({})", source.filename, source.match_label()));
        for excerpt_line in excerpt(&source.text, EXCERPT_MAX_LINES) {
            lines.push(format!("      {}", excerpt_line));
        }
    }
    lines
}

/// First `max_lines` lines of `text`, with `...` marking a cut.
pub fn excerpt(text: &str, max_lines: usize) -> Vec<String> {
    let all: Vec<&str> = text.trim().lines().collect();
    let mut lines: Vec<String> = all.iter().take(max_lines).map(|l| l.to_string()).collect();
    if all.len() > max_lines {
        if let Some(last) = lines.last_mut() {
            last.push_str("...");
        }
    }
    lines
}

/// Speaker label shown above a message body.
pub fn speaker(message: &Message) -> &'static str {
    if message.is_user() { "You" } else { "DocuBrain" }
}

/// Terminal note printed under the apology when a send fails.
pub fn failure_notice(error: &DocubrainError) -> String {
    if error.is_config() {
        format!("{} (set DOCUBRAIN_API_URL or pass --api-url)", error)
    } else if error.is_remote() {
        format!("QA backend request failed: {}", error)
    } else {
        format!("Request failed: {}", error)
    }
}
