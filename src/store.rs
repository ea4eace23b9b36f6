use crate::score::focus_score;
use crate::session::{FocusSample, Session};
use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Durable backend for the session log: one serialized sequence under a
/// single location, replaced wholesale on every write
pub trait SessionPersistence {
    /// Missing or unparsable data loads as an empty sequence, never an error
    fn load(&self) -> Vec<Session>;
    fn save(&self, sessions: &[Session]) -> io::Result<()>;
}

/// JSON file under the application state directory
#[derive(Debug, Clone)]
pub struct FileSessionLog {
    path: PathBuf,
}

impl FileSessionLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = crate::app_dirs::AppDirs::sessions_path()
            .unwrap_or_else(|| PathBuf::from("fokus_sessions.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileSessionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPersistence for FileSessionLog {
    fn load(&self) -> Vec<Session> {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(sessions) = serde_json::from_slice::<Vec<Session>>(&bytes) {
                return sessions;
            }
        }
        Vec::new()
    }

    fn save(&self, sessions: &[Session]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec(sessions).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

/// In-memory backend for tests
#[derive(Debug, Default)]
pub struct MemorySessionLog {
    stored: RefCell<Vec<Session>>,
}

impl MemorySessionLog {
    pub fn with_sessions(sessions: Vec<Session>) -> Self {
        Self {
            stored: RefCell::new(sessions),
        }
    }
}

impl SessionPersistence for MemorySessionLog {
    fn load(&self) -> Vec<Session> {
        self.stored.borrow().clone()
    }

    fn save(&self, sessions: &[Session]) -> io::Result<()> {
        *self.stored.borrow_mut() = sessions.to_vec();
        Ok(())
    }
}

/// Append-only log of completed sessions, loaded once at construction and
/// written back in full after every append. Insertion order is
/// chronological order.
pub struct SessionStore {
    sessions: Vec<Session>,
    log: Box<dyn SessionPersistence>,
}

impl SessionStore {
    pub fn new(log: Box<dyn SessionPersistence>) -> Self {
        let sessions = log.load();
        Self { sessions, log }
    }

    /// Append a completed session and persist the full sequence.
    ///
    /// A session stopped before any tick fired arrives with an empty score
    /// history; a single terminal sample is synthesized from its duration
    /// so stored sessions always carry at least one sample.
    pub fn append(&mut self, mut session: Session) {
        if session.focus_scores.is_empty() {
            session.focus_scores.push(FocusSample {
                time: session.start_time + session.duration,
                value: focus_score(session.duration),
            });
        }
        self.sessions.push(session);
        // Best effort: a failed write degrades to in-memory only
        let _ = self.log.save(&self.sessions);
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.sessions.len())
            .finish()
    }
}
