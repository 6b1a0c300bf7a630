//! REPL line parsing.

use docubrain_core::session::Session;

/// Slash commands offered for completion and hints, in `/help` order.
pub const COMMANDS: &[&str] = &[
    "/new", "/list", "/switch", "/delete", "/history", "/help", "/quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New,
    List,
    Switch(String),
    Delete(String),
    History,
    Help,
    Quit,
    /// A command that needs an argument was given none.
    MissingArgument(&'static str),
    Unknown(String),
}

/// What the user typed, once continuations are joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Command(Command),
    Message(String),
}

pub fn parse_line(raw: &str) -> ReplInput {
    let text = join_continuations(raw);
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return ReplInput::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return ReplInput::Command(Command::Quit);
    }
    if let Some(escaped) = trimmed.strip_prefix("//") {
        return ReplInput::Message(format!("/{}", escaped));
    }
    if !trimmed.starts_with('/') {
        return ReplInput::Message(text);
    }

    let (name, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (trimmed, ""),
    };
    let command = match name {
        "/new" => Command::New,
        "/list" => Command::List,
        "/switch" if arg.is_empty() => Command::MissingArgument("/switch"),
        "/switch" => Command::Switch(arg.to_string()),
        "/delete" if arg.is_empty() => Command::MissingArgument("/delete"),
        "/delete" => Command::Delete(arg.to_string()),
        "/history" => Command::History,
        "/help" => Command::Help,
        "/quit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    };
    ReplInput::Command(command)
}

/// Whether the buffer continues onto the next line: its last line ends in
/// an odd number of backslashes. `\\` at the end is a literal backslash.
pub fn continues(input: &str) -> bool {
    trailing_backslashes(input) % 2 == 1
}

fn trailing_backslashes(line: &str) -> usize {
    line.chars().rev().take_while(|c| *c == '\\').count()
}

/// Turns `abc\` + newline + `def` into `abc` + newline + `def`, and a
/// final `\\` into a single backslash.
pub fn join_continuations(raw: &str) -> String {
    let mut lines: Vec<&str> = raw.split('\n').collect();
    let last = lines.len() - 1;
    for (i, line) in lines.iter_mut().enumerate() {
        let strip = if i < last {
            continues(line)
        } else {
            trailing_backslashes(line) >= 2
        };
        if strip {
            if let Some(stripped) = line.strip_suffix('\\') {
                *line = stripped;
            }
        }
    }
    lines.join("\n")
}

/// Resolves a `/switch` or `/delete` argument to a session id.
///
/// Accepts the 1-based position shown by `/list`, a full id, or an id
/// prefix that matches exactly one session.
pub fn resolve_target(sessions: &[Session], arg: &str) -> Option<String> {
    if let Ok(position) = arg.parse::<usize>() {
        if position >= 1 && position <= sessions.len() {
            return Some(sessions[position - 1].id.clone());
        }
    }

    if let Some(session) = sessions.iter().find(|s| s.id == arg) {
        return Some(session.id.clone());
    }

    let mut matches = sessions.iter().filter(|s| s.id.starts_with(arg));
    match (matches.next(), matches.next()) {
        (Some(session), None) => Some(session.id.clone()),
        _ => None,
    }
}
