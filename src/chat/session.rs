// Session store for embedders exposing the engine to multiple concurrent
// conversations: one ConversationState per session id, single-writer
// access per session, independent sessions sharing nothing mutable.
use crate::chat::{QueryEngine, Reply};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

pub struct SessionStore {
    max_sessions: usize,
    sessions: Mutex<HashMap<String, Arc<Mutex<QueryEngine>>>>,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        SessionStore {
            max_sessions,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Bind an engine under a fresh session id.
    pub fn create(&self, engine: QueryEngine) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.insert(&id, engine)?;
        Ok(id)
    }

    /// Bind an engine under a caller-chosen id. Re-binding an existing id
    /// replaces its conversation.
    pub fn insert(&self, id: &str, engine: QueryEngine) -> Result<()> {
        let mut sessions = self.lock_map()?;
        if !sessions.contains_key(id) && sessions.len() >= self.max_sessions {
            return Err(Error::Session(format!(
                "Session limit of {} reached",
                self.max_sessions
            )));
        }
        info!("Session {} bound to '{}'", id, engine.recipe().title);
        sessions.insert(id.to_string(), Arc::new(Mutex::new(engine)));
        Ok(())
    }

    /// Answer a question within one session. The per-session mutex gives
    /// the single-writer discipline: one in-flight mutation per id.
    pub fn respond(&self, id: &str, question: &str) -> Result<Reply> {
        let engine = {
            let sessions = self.lock_map()?;
            sessions
                .get(id)
                .cloned()
                .ok_or_else(|| Error::Session(format!("Unknown session: {id}")))?
        };
        let mut engine = engine
            .lock()
            .map_err(|_| Error::Session(format!("Session {id} lock poisoned")))?;
        Ok(engine.respond(question))
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.lock_map()?.remove(id).is_some())
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_map(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<Mutex<QueryEngine>>>>> {
        self.sessions
            .lock()
            .map_err(|_| Error::Session("Session store lock poisoned".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::LexiconAnnotator;
    use crate::recipe::build_recipe;

    fn engine() -> QueryEngine {
        let annotator = LexiconAnnotator::new();
        let recipe = build_recipe(
            "Toast",
            &["2 slices bread".to_string()],
            &["Toast the bread. Serve warm.".to_string()],
            &annotator,
        );
        QueryEngine::new(recipe)
    }

    #[test]
    fn test_sessions_are_independent() {
        let store = SessionStore::new(4);
        let a = store.create(engine()).unwrap();
        let b = store.create(engine()).unwrap();

        store.respond(&a, "what's next").unwrap();
        let reply_a = store.respond(&a, "repeat").unwrap();
        let reply_b = store.respond(&b, "repeat").unwrap();

        assert_eq!(reply_a.current_step, 1);
        assert_eq!(reply_b.current_step, 0);
    }

    #[test]
    fn test_session_limit() {
        let store = SessionStore::new(1);
        store.insert("only", engine()).unwrap();
        assert!(store.create(engine()).is_err());
        // Re-binding an existing id is allowed.
        assert!(store.insert("only", engine()).is_ok());
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new(1);
        assert!(store.respond("missing", "repeat").is_err());
    }
}
