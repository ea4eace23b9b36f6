use crate::score::focus_score;
use crate::session::{FocusSample, Session};
use crate::store::SessionStore;
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time, injectable so session durations and
/// debounce deadlines are deterministic under test
pub trait TimeSource {
    fn now(&self) -> SystemTime;
}

/// Production time source backed by the system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Manually advanced time source for tests
#[derive(Debug)]
pub struct ManualTimeSource {
    now: Cell<SystemTime>,
}

impl ManualTimeSource {
    pub fn starting_at(epoch_ms: u64) -> Self {
        Self {
            now: Cell::new(UNIX_EPOCH + Duration::from_millis(epoch_ms)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> SystemTime {
        self.now.get()
    }
}

/// Milliseconds since the unix epoch
pub fn epoch_ms(t: SystemTime) -> u64 {
    t.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Render elapsed milliseconds as zero-padded HH:MM:SS.
/// Hours are unbounded, not wrapped at 24.
pub fn format_hms(elapsed_ms: u64) -> String {
    let total_secs = elapsed_ms / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60
    )
}

/// Tracks the single active focus session: start time, elapsed time,
/// and the periodic tick that samples the focus score.
///
/// At most one in-flight session exists at a time and it is owned here;
/// it reaches the store only through `stop`.
pub struct SessionClock {
    time: Rc<dyn TimeSource>,
    is_running: bool,
    start_time_ms: u64,
    elapsed_ms: u64,
    current: Option<Session>,
}

impl SessionClock {
    pub fn new(time: Rc<dyn TimeSource>) -> Self {
        Self {
            time,
            is_running: false,
            start_time_ms: 0,
            elapsed_ms: 0,
            current: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Latest score of the in-flight session, 0 when idle
    pub fn current_score(&self) -> u8 {
        self.current.as_ref().map(|s| s.current_score).unwrap_or(0)
    }

    fn now_ms(&self) -> u64 {
        epoch_ms(self.time.now())
    }

    /// Begin timing. No-op while already running. Backdates the start so a
    /// previously paused-but-not-reset elapsed time resumes counting.
    pub fn start(&mut self) {
        if self.is_running {
            return;
        }
        self.is_running = true;
        let now = self.now_ms();
        self.start_time_ms = now - self.elapsed_ms;
        self.current = Some(Session::open(now, self.start_time_ms));
    }

    /// Finish timing and hand the completed session to the store.
    /// No-op while not running.
    pub fn stop(&mut self, store: &mut SessionStore) {
        if !self.is_running {
            return;
        }
        // Flipping the flag first means a stray tick observed after this
        // point cannot write into the cleared in-flight session.
        self.is_running = false;
        self.elapsed_ms = self.now_ms() - self.start_time_ms;
        if let Some(mut session) = self.current.take() {
            session.duration = self.elapsed_ms;
            session.current_score = focus_score(self.elapsed_ms);
            store.append(session);
        }
    }

    pub fn toggle(&mut self, store: &mut SessionStore) {
        if self.is_running {
            self.stop(store);
        } else {
            self.start();
        }
    }

    /// Periodic bookkeeping: refresh elapsed time and append a score sample
    /// to the in-flight session. No-op while not running.
    pub fn on_tick(&mut self) {
        if !self.is_running {
            return;
        }
        let now = self.now_ms();
        self.elapsed_ms = now - self.start_time_ms;
        let score = focus_score(self.elapsed_ms);
        if let Some(session) = self.current.as_mut() {
            session.duration = self.elapsed_ms;
            session.current_score = score;
            session.focus_scores.push(FocusSample {
                time: now,
                value: score,
            });
        }
    }

    /// Elapsed time rendered for the clock display
    pub fn format_elapsed(&self) -> String {
        format_hms(self.elapsed_ms)
    }
}

impl std::fmt::Debug for SessionClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionClock")
            .field("is_running", &self.is_running)
            .field("elapsed_ms", &self.elapsed_ms)
            .field("current", &self.current)
            .finish()
    }
}
