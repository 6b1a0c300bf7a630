//! Session domain model.
//!
//! This module contains the core Session entity and the pure functions that
//! transform a list of sessions.

use super::message::Message;
use serde::{Deserialize, Serialize};

/// Title every session carries until its first user message.
pub const PLACEHOLDER_TITLE: &str = "New Chat";

/// Number of characters of the first user message kept in the title.
pub const TITLE_MAX_CHARS: usize = 15;

/// Appended to titles cut at [`TITLE_MAX_CHARS`].
pub const TITLE_ELLIPSIS: &str = "...";

/// One persisted conversation thread.
///
/// The serialized shape (`id`, `title`, `messages`, `createdAt`) is the
/// storage format; records written by the browser client load unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque, time-ordered identifier (UUID v7 for sessions created here)
    pub id: String,
    /// Placeholder until the first user message, then derived from it
    pub title: String,
    /// Chronological history, seeded with the greeting
    pub messages: Vec<Message>,
    /// Creation time in milliseconds since the Unix epoch
    pub created_at: i64,
}

impl Session {
    /// Builds a fresh session holding only the greeting.
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            title: PLACEHOLDER_TITLE.to_string(),
            messages: vec![Message::greeting()],
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// True while the session holds nothing but the seeded greeting.
    pub fn awaiting_first_message(&self) -> bool {
        self.messages.len() == 1
    }

    /// Appends a message, consuming and returning the session.
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a session title from the first user message.
///
/// Keeps the first 15 characters and appends `...` when the text is longer.
/// Characters are Unicode scalar values; there is no word-boundary handling.
pub fn derive_title(text: &str) -> String {
    match text.char_indices().nth(TITLE_MAX_CHARS) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TITLE_ELLIPSIS),
        None => text.to_string(),
    }
}

/// Replaces the session with `id` by `transform(session)`.
///
/// Other sessions and the list order are untouched. When no session matches
/// the list is returned unchanged.
pub fn update_session<F>(sessions: Vec<Session>, id: &str, transform: F) -> Vec<Session>
where
    F: FnOnce(Session) -> Session,
{
    let mut transform = Some(transform);
    sessions
        .into_iter()
        .map(|session| {
            if session.id == id {
                if let Some(f) = transform.take() {
                    return f(session);
                }
            }
            session
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{GREETING, MessageRole};

    fn session_with_id(id: &str) -> Session {
        Session {
            id: id.to_string(),
            ..Session::new()
        }
    }

    #[test]
    fn test_new_session_is_seeded() {
        let session = Session::new();
        assert_eq!(session.title, PLACEHOLDER_TITLE);
        assert_eq!(session.messages.len(), 1);
        assert_eq!(session.messages[0].role, MessageRole::Assistant);
        assert_eq!(session.messages[0].content, GREETING);
        assert!(session.awaiting_first_message());
        assert!(session.created_at > 0);
    }

    #[test]
    fn test_new_sessions_have_distinct_ids() {
        let a = Session::new();
        let b = Session::new();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_derive_title_truncates_long_text() {
        let title = derive_title("Where is the refund policy located in the handbook?");
        assert_eq!(title, "Where is the re...");
    }

    #[test]
    fn test_derive_title_keeps_short_text() {
        assert_eq!(derive_title("Hi"), "Hi");
        // exactly at the budget: no ellipsis
        assert_eq!(derive_title("123456789012345"), "123456789012345");
        assert_eq!(derive_title("1234567890123456"), "123456789012345...");
    }

    #[test]
    fn test_derive_title_counts_characters_not_bytes() {
        let text = "返金ポリシーはハンドブックのどこに書いてありますか";
        let title = derive_title(text);
        assert_eq!(title, "返金ポリシーはハンドブックのど...");
        assert_eq!(title.chars().count(), TITLE_MAX_CHARS + TITLE_ELLIPSIS.len());
    }

    #[test]
    fn test_update_session_touches_only_match() {
        let sessions = vec![session_with_id("a"), session_with_id("b")];
        let before_b = sessions[1].clone();

        let updated = update_session(sessions, "a", |s| s.with_message(Message::user("q")));

        assert_eq!(updated.len(), 2);
        assert_eq!(updated[0].id, "a");
        assert_eq!(updated[0].messages.len(), 2);
        assert_eq!(updated[1], before_b);
    }

    #[test]
    fn test_update_session_unknown_id_is_noop() {
        let sessions = vec![session_with_id("a"), session_with_id("b")];
        let expected = sessions.clone();

        let updated = update_session(sessions, "missing", |mut s| {
            s.title = "changed".to_string();
            s
        });

        assert_eq!(updated, expected);
    }

    #[test]
    fn test_session_json_shape() {
        let session = Session {
            id: "1718000000000".to_string(),
            title: "Hi".to_string(),
            messages: vec![Message::greeting()],
            created_at: 1_718_000_000_000,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["createdAt"], 1_718_000_000_000i64);
        assert_eq!(json["id"], "1718000000000");
        assert!(json.get("created_at").is_none());
    }
}
