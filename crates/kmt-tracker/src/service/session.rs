//! In-memory visitor sessions keyed by the session cookie.

use ahash::HashMap;
use kmt_core::{
    Uuid,
    context::AppContext,
    i18n::{Translator, select_language},
    simulation::SimulationDelays,
};
use parking_lot::Mutex;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "kmt-session";

/// Minimum interval between two sweeps of the idle sessions.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// A shared visitor context.
pub type SharedContext = Arc<Mutex<AppContext>>;

#[derive(Debug)]
struct Session {
    context: SharedContext,
    last_access: Instant,
}

#[derive(Debug)]
struct Sessions {
    entries: HashMap<Uuid, Session>,
    last_sweep: Instant,
}

/// Store of the visitor contexts.
#[derive(Debug)]
pub struct SessionStore {
    /// Sessions and the time of the last sweep.
    sessions: Mutex<Sessions>,
    /// Translator cloned into new contexts.
    translator: Translator,
    /// Delays of the simulations.
    delays: SimulationDelays,
    /// Idle time after which a session is evicted.
    max_idle: Duration,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new(translator: Translator, delays: SimulationDelays, max_idle: Duration) -> Self {
        Self {
            sessions: Mutex::new(Sessions {
                entries: HashMap::default(),
                last_sweep: Instant::now(),
            }),
            translator,
            delays,
            max_idle,
        }
    }

    /// Returns the number of live sessions.
    #[inline]
    pub fn len(&self) -> usize {
        self.sessions.lock().entries.len()
    }

    /// Returns `true` if there are no live sessions.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the context of the session, creating a new session if it is unknown.
    ///
    /// A new context starts in the preferred language if it is supported,
    /// or in the best match of the `Accept-Language` header.
    /// The returned flag is `true` for a new session.
    pub fn get_or_create(
        &self,
        session_id: Option<&str>,
        preferred_language: Option<&str>,
        accept_language: Option<&str>,
    ) -> (Uuid, SharedContext, bool) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        if now.duration_since(sessions.last_sweep) >= SWEEP_INTERVAL {
            let max_idle = self.max_idle;
            let len = sessions.entries.len();
            sessions
                .entries
                .retain(|_, session| now.duration_since(session.last_access) < max_idle);
            sessions.last_sweep = now;
            let evicted = len - sessions.entries.len();
            if evicted > 0 {
                tracing::info!(evicted, "idle sessions evicted");
            }
        }

        if let Some(id) = session_id.and_then(|id| id.parse::<Uuid>().ok()) {
            if let Some(session) = sessions.entries.get_mut(&id) {
                session.last_access = now;
                return (id, session.context.clone(), false);
            }
        }

        let context = Arc::new(Mutex::new(self.new_context(preferred_language, accept_language)));
        let id = Uuid::new_v4();
        sessions.entries.insert(
            id,
            Session {
                context: context.clone(),
                last_access: now,
            },
        );
        tracing::debug!(session_id = %id, "session created");
        (id, context, true)
    }

    fn new_context(
        &self,
        preferred_language: Option<&str>,
        accept_language: Option<&str>,
    ) -> AppContext {
        let mut translator = self.translator.clone();
        let language = preferred_language
            .and_then(|language| translator.resolve_language(language))
            .or_else(|| {
                let supported = translator.languages();
                accept_language.and_then(|header| select_language(header, &supported))
            })
            .map(|language| language.to_owned());
        if let Some(language) = language {
            translator.set_language(&language);
        }
        AppContext::new(translator, self.delays)
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStore;
    use kmt_core::{
        i18n::{Dictionary, Translator},
        simulation::SimulationDelays,
    };
    use std::{sync::Arc, time::Duration};

    fn store(max_idle: Duration) -> SessionStore {
        let sources = [("en", "nav_home = Home\n"), ("mr", "nav_home = मुख्यपृष्ठ\n")];
        let dictionary = Dictionary::from_sources("en", sources).unwrap();
        SessionStore::new(
            Translator::new(Arc::new(dictionary)),
            SimulationDelays::default(),
            max_idle,
        )
    }

    #[test]
    fn it_reuses_sessions() {
        let store = store(Duration::from_secs(60));
        let (id, context, created) = store.get_or_create(None, None, Some("mr-IN,mr;q=0.9"));
        assert!(created);
        assert_eq!(context.lock().language(), "mr");

        let session_id = id.to_string();
        let (same_id, same_context, created) = store.get_or_create(Some(&session_id), None, None);
        assert!(!created);
        assert_eq!(same_id, id);
        assert!(Arc::ptr_eq(&context, &same_context));

        let (other_id, context, created) = store.get_or_create(Some("forged"), Some("hindi"), None);
        assert!(created);
        assert_ne!(other_id, id);
        assert_eq!(context.lock().language(), "en");
        assert_eq!(store.len(), 2);
    }
}
