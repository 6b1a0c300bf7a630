use super::message::{Message, Source};
use super::model::{Session, derive_title, update_session};
use super::repository::SessionStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Owns the in-memory session list and the active-session pointer.
///
/// `SessionManager` is responsible for:
/// - Restoring history from the store on startup
/// - Creating, selecting and deleting sessions
/// - Appending messages to a session by id
/// - Writing the full list back to the store after every change that must
///   survive a reload
///
/// The list is most-recent-first: new sessions are prepended and selection
/// never reorders. Whenever the list is non-empty the active id names one of
/// its sessions.
pub struct SessionManager {
    /// Session list, newest first
    sessions: Vec<Session>,
    /// Id of the session shown and targeted by new sends
    active_id: Option<String>,
    /// Persistent storage backend for the session list
    store: Arc<dyn SessionStore>,
}

impl SessionManager {
    /// Restores the session list from `store`.
    ///
    /// The head of the stored list becomes active. When nothing usable is
    /// stored (absent, unparsable, unreadable or empty) a fresh session is
    /// created instead.
    pub async fn open(store: Arc<dyn SessionStore>) -> Self {
        let stored = match store.load().await {
            Ok(stored) => stored,
            Err(e) => {
                warn!("Failed to read session history, starting fresh: {}", e);
                None
            }
        };

        let mut manager = Self {
            sessions: Vec::new(),
            active_id: None,
            store,
        };

        match stored {
            Some(sessions) if !sessions.is_empty() => {
                info!("Restored {} session(s)", sessions.len());
                manager.active_id = sessions.first().map(|s| s.id.clone());
                manager.sessions = sessions;
            }
            _ => {
                manager.create_session().await;
            }
        }

        manager
    }

    /// Returns all sessions, newest first.
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Returns the ID of the currently active session.
    pub fn active_session_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// Returns the currently active session.
    pub fn active_session(&self) -> Option<&Session> {
        self.active_id.as_deref().and_then(|id| self.find(id))
    }

    pub fn find(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    /// Creates a new session, prepends it and makes it active.
    pub async fn create_session(&mut self) -> Session {
        let session = self.push_new_session();
        self.persist().await;
        session
    }

    /// Makes `session_id` the active session.
    ///
    /// Unknown ids are ignored. Returns whether the id was found.
    pub fn select_session(&mut self, session_id: &str) -> bool {
        if self.find(session_id).is_none() {
            debug!("Ignoring selection of unknown session {}", session_id);
            return false;
        }
        self.active_id = Some(session_id.to_string());
        true
    }

    /// Deletes a session.
    ///
    /// If it was the active session, the new head becomes active, or a fresh
    /// session is created when the list is now empty. The resulting list is
    /// written once. Returns whether a session was removed.
    pub async fn delete_session(&mut self, session_id: &str) -> bool {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != session_id);
        let removed = self.sessions.len() != before;

        if self.active_id.as_deref() == Some(session_id) {
            match self.sessions.first() {
                Some(head) => self.active_id = Some(head.id.clone()),
                None => {
                    self.push_new_session();
                }
            }
        }

        if removed {
            info!("Deleted session {}", session_id);
        }
        self.persist().await;
        removed
    }

    /// Appends a user message to the session.
    ///
    /// The first user message of a session (the session holds only the
    /// greeting) also sets the title.
    pub async fn append_user_message(&mut self, session_id: &str, text: &str) {
        self.apply(session_id, |mut session| {
            if session.awaiting_first_message() {
                session.title = derive_title(text);
            }
            session.with_message(Message::user(text))
        });
        self.persist().await;
    }

    /// Appends an assistant reply, optionally citing sources.
    pub async fn append_assistant_message(
        &mut self,
        session_id: &str,
        content: &str,
        sources: Option<Vec<Source>>,
    ) {
        let message = match sources {
            Some(sources) => Message::assistant_with_sources(content, sources),
            None => Message::assistant(content),
        };
        self.apply(session_id, |session| session.with_message(message));
        self.persist().await;
    }

    /// Appends the fixed apology used when the QA call fails.
    pub async fn append_assistant_error(&mut self, session_id: &str) {
        self.apply(session_id, |session| session.with_message(Message::apology()));
        self.persist().await;
    }

    fn push_new_session(&mut self) -> Session {
        let session = Session::new();
        info!("Created session {}", session.id);
        self.sessions.insert(0, session.clone());
        self.active_id = Some(session.id.clone());
        session
    }

    fn apply<F>(&mut self, session_id: &str, transform: F)
    where
        F: FnOnce(Session) -> Session,
    {
        if self.find(session_id).is_none() {
            debug!("Append target {} no longer exists", session_id);
        }
        let sessions = std::mem::take(&mut self.sessions);
        self.sessions = update_session(sessions, session_id, transform);
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.sessions).await {
            warn!("Failed to persist {} session(s): {}", self.sessions.len(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DocubrainError, Result};
    use crate::session::message::{APOLOGY, MessageRole};
    use crate::session::model::PLACEHOLDER_TITLE;
    use std::sync::Mutex;

    // Mock SessionStore for testing
    #[derive(Default)]
    struct MockSessionStore {
        stored: Mutex<Option<Vec<Session>>>,
        saves: Mutex<usize>,
        fail_load: bool,
        fail_save: bool,
    }

    impl MockSessionStore {
        fn with_sessions(sessions: Vec<Session>) -> Self {
            Self {
                stored: Mutex::new(Some(sessions)),
                ..Self::default()
            }
        }

        fn stored(&self) -> Vec<Session> {
            self.stored.lock().unwrap().clone().unwrap_or_default()
        }

        fn saves(&self) -> usize {
            *self.saves.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl SessionStore for MockSessionStore {
        async fn load(&self) -> Result<Option<Vec<Session>>> {
            if self.fail_load {
                return Err(DocubrainError::io("disk on fire"));
            }
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn save(&self, sessions: &[Session]) -> Result<()> {
            *self.saves.lock().unwrap() += 1;
            if self.fail_save {
                return Err(DocubrainError::io("read-only filesystem"));
            }
            *self.stored.lock().unwrap() = Some(sessions.to_vec());
            Ok(())
        }
    }

    fn stored_session(id: &str, title: &str) -> Session {
        Session {
            id: id.to_string(),
            title: title.to_string(),
            messages: vec![Message::greeting(), Message::user(title)],
            created_at: 1_700_000_000_000,
        }
    }

    async fn open_empty() -> (SessionManager, Arc<MockSessionStore>) {
        let store = Arc::new(MockSessionStore::default());
        let manager = SessionManager::open(store.clone()).await;
        (manager, store)
    }

    fn assert_active_is_valid(manager: &SessionManager) {
        assert!(!manager.sessions().is_empty());
        let active = manager.active_session_id().expect("active id must be set");
        assert!(manager.find(active).is_some(), "active id {active} not in list");
    }

    #[tokio::test]
    async fn test_open_without_history_creates_session() {
        let (manager, store) = open_empty().await;

        assert_eq!(manager.sessions().len(), 1);
        let active = manager.active_session().unwrap();
        assert_eq!(active.title, PLACEHOLDER_TITLE);
        assert_eq!(active.messages.len(), 1);
        assert_eq!(store.stored().len(), 1);
    }

    #[tokio::test]
    async fn test_open_restores_head_as_active() {
        let store = Arc::new(MockSessionStore::with_sessions(vec![
            stored_session("newer", "Second"),
            stored_session("older", "First"),
        ]));

        let manager = SessionManager::open(store.clone()).await;

        assert_eq!(manager.sessions().len(), 2);
        assert_eq!(manager.active_session_id(), Some("newer"));
        // restoring alone writes nothing
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_open_with_empty_list_creates_session() {
        let store = Arc::new(MockSessionStore::with_sessions(Vec::new()));
        let manager = SessionManager::open(store).await;
        assert_eq!(manager.sessions().len(), 1);
        assert_active_is_valid(&manager);
    }

    #[tokio::test]
    async fn test_open_with_unreadable_store_starts_fresh() {
        let store = Arc::new(MockSessionStore {
            fail_load: true,
            ..MockSessionStore::default()
        });
        let manager = SessionManager::open(store).await;
        assert_eq!(manager.sessions().len(), 1);
        assert_active_is_valid(&manager);
    }

    #[tokio::test]
    async fn test_create_session_prepends_and_activates() {
        let (mut manager, store) = open_empty().await;
        let first = manager.active_session_id().unwrap().to_string();

        let created = manager.create_session().await;

        assert_eq!(manager.sessions()[0].id, created.id);
        assert_eq!(manager.sessions()[1].id, first);
        assert_eq!(manager.active_session_id(), Some(created.id.as_str()));
        assert_eq!(store.stored().len(), 2);
    }

    #[tokio::test]
    async fn test_select_session_does_not_reorder() {
        let (mut manager, _store) = open_empty().await;
        let older = manager.active_session_id().unwrap().to_string();
        let newer = manager.create_session().await;

        assert!(manager.select_session(&older));

        assert_eq!(manager.active_session_id(), Some(older.as_str()));
        assert_eq!(manager.sessions()[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_select_active_session_is_idempotent() {
        let (mut manager, store) = open_empty().await;
        let active = manager.active_session_id().unwrap().to_string();
        let before = manager.sessions().to_vec();
        let saves = store.saves();

        assert!(manager.select_session(&active));

        assert_eq!(manager.active_session_id(), Some(active.as_str()));
        assert_eq!(manager.sessions(), before.as_slice());
        assert_eq!(store.saves(), saves);
    }

    #[tokio::test]
    async fn test_select_unknown_session_is_ignored() {
        let (mut manager, _store) = open_empty().await;
        let active = manager.active_session_id().unwrap().to_string();

        assert!(!manager.select_session("does-not-exist"));
        assert_eq!(manager.active_session_id(), Some(active.as_str()));
    }

    #[tokio::test]
    async fn test_delete_only_session_creates_fresh_one() {
        let (mut manager, store) = open_empty().await;
        let only = manager.active_session_id().unwrap().to_string();

        assert!(manager.delete_session(&only).await);

        assert_eq!(manager.sessions().len(), 1);
        let fresh = manager.active_session().unwrap();
        assert_ne!(fresh.id, only);
        assert_eq!(fresh.messages.len(), 1);
        assert_eq!(store.stored(), manager.sessions().to_vec());
    }

    #[tokio::test]
    async fn test_delete_writes_once() {
        let (mut manager, store) = open_empty().await;
        let only = manager.active_session_id().unwrap().to_string();
        let saves = store.saves();

        manager.delete_session(&only).await;

        assert_eq!(store.saves(), saves + 1);
    }

    #[tokio::test]
    async fn test_delete_active_repoints_to_head() {
        let (mut manager, _store) = open_empty().await;
        let oldest = manager.active_session_id().unwrap().to_string();
        let middle = manager.create_session().await;
        let newest = manager.create_session().await;

        assert!(manager.delete_session(&newest.id).await);

        assert_eq!(manager.active_session_id(), Some(middle.id.as_str()));
        assert_eq!(manager.sessions().len(), 2);
        assert_eq!(manager.sessions()[1].id, oldest);
    }

    #[tokio::test]
    async fn test_delete_inactive_keeps_active() {
        let (mut manager, _store) = open_empty().await;
        let oldest = manager.active_session_id().unwrap().to_string();
        let newest = manager.create_session().await;

        assert!(manager.delete_session(&oldest).await);

        assert_eq!(manager.active_session_id(), Some(newest.id.as_str()));
        assert_eq!(manager.sessions().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_session_changes_nothing() {
        let (mut manager, _store) = open_empty().await;
        let before = manager.sessions().to_vec();

        assert!(!manager.delete_session("missing").await);
        assert_eq!(manager.sessions(), before.as_slice());
    }

    #[tokio::test]
    async fn test_create_delete_sequences_keep_active_valid() {
        let (mut manager, _store) = open_empty().await;
        // Deterministic pseudo-random walk over create/delete operations.
        let mut seed: u64 = 0x5eed;
        for _ in 0..200 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let roll = (seed >> 33) as usize;
            if roll % 3 == 0 {
                manager.create_session().await;
            } else {
                let ids: Vec<String> = manager.sessions().iter().map(|s| s.id.clone()).collect();
                let target = ids[roll % ids.len()].clone();
                manager.delete_session(&target).await;
            }
            assert_active_is_valid(&manager);
        }
    }

    #[tokio::test]
    async fn test_first_user_message_sets_title() {
        let (mut manager, _store) = open_empty().await;
        let id = manager.active_session_id().unwrap().to_string();

        manager
            .append_user_message(&id, "Where is the refund policy located in the handbook?")
            .await;

        let session = manager.find(&id).unwrap();
        assert_eq!(session.title, "Where is the re...");
        assert_eq!(session.messages.len(), 2);
        assert_eq!(session.messages[1].role, MessageRole::User);
    }

    #[tokio::test]
    async fn test_second_user_message_keeps_title() {
        let (mut manager, _store) = open_empty().await;
        let id = manager.active_session_id().unwrap().to_string();

        manager.append_user_message(&id, "Hi").await;
        manager.append_assistant_message(&id, "Hello!", None).await;
        manager.append_user_message(&id, "What about vacation days?").await;

        let session = manager.find(&id).unwrap();
        assert_eq!(session.title, "Hi");
        assert_eq!(session.messages.len(), 4);
    }

    #[tokio::test]
    async fn test_append_assistant_message_keeps_sources() {
        let (mut manager, store) = open_empty().await;
        let id = manager.active_session_id().unwrap().to_string();
        let sources = vec![
            Source::new("a.pdf", "...", 0.92),
            Source::new("b.pdf", "excerpt", 0.41),
        ];

        manager
            .append_assistant_message(&id, "X", Some(sources.clone()))
            .await;

        let last = manager.find(&id).unwrap().messages.last().unwrap().clone();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, "X");
        assert_eq!(last.sources, Some(sources));
        assert_eq!(store.stored(), manager.sessions().to_vec());
    }

    #[tokio::test]
    async fn test_append_assistant_error() {
        let (mut manager, _store) = open_empty().await;
        let id = manager.active_session_id().unwrap().to_string();

        manager.append_assistant_error(&id).await;

        let last = manager.find(&id).unwrap().messages.last().unwrap().clone();
        assert_eq!(last.content, APOLOGY);
        assert!(last.sources.is_none());
    }

    #[tokio::test]
    async fn test_append_to_unknown_session_is_noop() {
        let (mut manager, _store) = open_empty().await;
        let before = manager.sessions().to_vec();

        manager.append_user_message("gone", "hello").await;
        manager.append_assistant_error("gone").await;

        assert_eq!(manager.sessions(), before.as_slice());
    }

    #[tokio::test]
    async fn test_append_targets_inactive_session() {
        let (mut manager, _store) = open_empty().await;
        let older = manager.active_session_id().unwrap().to_string();
        let newer = manager.create_session().await;

        manager.append_assistant_message(&older, "late reply", None).await;

        assert_eq!(manager.active_session_id(), Some(newer.id.as_str()));
        assert_eq!(manager.find(&older).unwrap().messages.len(), 2);
        assert_eq!(manager.find(&newer.id).unwrap().messages.len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_memory_state() {
        let store = Arc::new(MockSessionStore {
            fail_save: true,
            ..MockSessionStore::default()
        });
        let mut manager = SessionManager::open(store).await;
        let id = manager.active_session_id().unwrap().to_string();

        manager.append_user_message(&id, "still here").await;

        assert_eq!(manager.find(&id).unwrap().messages.len(), 2);
    }
}
