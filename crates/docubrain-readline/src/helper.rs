use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use docubrain_application::{Key, KeyPress};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::commands::{COMMANDS, continues};

/// CLI helper for rustyline that provides completion, highlighting, hints
/// and backslash line continuation.
#[derive(Clone)]
pub struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        Ok(submit_or_continue(ctx.input()))
    }
}

/// Enter submits the buffer unless its last line ends with an unpaired `\`.
fn submit_or_continue(input: &str) -> ValidationResult {
    let mut press = KeyPress::new(Key::Enter);
    if continues(input) {
        press = press.with_line_break();
    }
    if press.is_submit() {
        ValidationResult::Valid(None)
    } else {
        ValidationResult::Incomplete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_backslash_keeps_editing() {
        assert!(matches!(submit_or_continue("first\\"), ValidationResult::Incomplete));
        assert!(matches!(submit_or_continue("first\\\nsecond"), ValidationResult::Valid(None)));
        assert!(matches!(submit_or_continue("/list"), ValidationResult::Valid(None)));
    }

    #[test]
    fn test_doubled_backslash_submits() {
        assert!(matches!(submit_or_continue(r"path C:\\"), ValidationResult::Valid(None)));
        assert!(matches!(submit_or_continue(r"path C:\\\"), ValidationResult::Incomplete));
    }

    #[test]
    fn test_commands_cover_help_list() {
        let helper = CliHelper::new();
        assert!(helper.commands.contains(&"/switch".to_string()));
        assert_eq!(helper.commands.len(), COMMANDS.len());
    }
}
