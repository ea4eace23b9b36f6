pub mod analytics;
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod runtime;
pub mod score;
pub mod session;
pub mod store;
pub mod ui;
pub mod visibility;
pub mod visual;

use crate::clock::{epoch_ms, SessionClock, SystemTimeSource, TimeSource};
use crate::config::{Config, ConfigStore, FileConfigStore};
use crate::runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner};
use crate::store::{FileSessionLog, SessionPersistence, SessionStore};
use crate::visibility::VisibilityCoordinator;
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    rc::Rc,
    time::Duration,
};

/// terminal focus timer with session analytics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal focus timer that logs work sessions, charts your recent history, and celebrates focus with an animated particle visual."
)]
pub struct Cli {
    /// tick interval in milliseconds
    #[clap(short = 't', long)]
    tick_rate_ms: Option<u64>,

    /// file to keep the session log in (defaults to the state directory)
    #[clap(long)]
    session_file: Option<PathBuf>,

    /// show the visualization on startup
    #[clap(long)]
    visual: bool,
}

/// Top-level application state: the clock, the session store, and the
/// visibility coordinator, all sharing one injected time source
pub struct App {
    pub config: Config,
    pub time: Rc<dyn TimeSource>,
    pub clock: SessionClock,
    pub store: SessionStore,
    pub coordinator: VisibilityCoordinator,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let mut config = FileConfigStore::new().load();
        if let Some(t) = cli.tick_rate_ms {
            config.tick_rate_ms = t.max(10);
        }
        if cli.visual {
            config.start_visible = true;
        }
        let log: Box<dyn SessionPersistence> = match &cli.session_file {
            Some(p) => Box::new(FileSessionLog::with_path(p)),
            None => Box::new(FileSessionLog::new()),
        };
        Self::with_parts(config, Rc::new(SystemTimeSource), log)
    }

    /// Single construction point for all core components; tests pass a
    /// manual time source and an in-memory log
    pub fn with_parts(
        config: Config,
        time: Rc<dyn TimeSource>,
        log: Box<dyn SessionPersistence>,
    ) -> Self {
        let clock = SessionClock::new(time.clone());
        let store = SessionStore::new(log);
        let mut coordinator = VisibilityCoordinator::new(
            time.clone(),
            Duration::from_millis(config.debounce_ms),
            config.particle_count,
        );
        if config.start_visible {
            coordinator.show();
        }
        Self {
            config,
            time,
            clock,
            store,
            coordinator,
        }
    }

    /// Start or stop the clock. Timing and the visualization are mutually
    /// exclusive in the UI: starting hides the visual, stopping re-shows it.
    pub fn toggle_clock(&mut self) {
        self.clock.toggle(&mut self.store);
        if self.clock.is_running() {
            self.coordinator.hide();
        } else {
            self.coordinator.show();
        }
    }

    pub fn toggle_visual(&mut self) {
        if self.coordinator.is_visible() {
            self.coordinator.hide();
        } else {
            self.coordinator.show();
        }
    }

    /// One cooperative tick: session bookkeeping first, then visibility
    /// transitions, then an animation frame while the scene is on screen
    pub fn on_tick(&mut self) {
        self.clock.on_tick();
        self.coordinator.poll();
        if self.coordinator.should_render() {
            let now_ms = epoch_ms(self.time.now());
            let is_running = self.clock.is_running();
            let score = self.clock.current_score();
            if let Some(scene) = self.coordinator.scene_mut() {
                scene.advance(now_ms, is_running, score);
            }
        }
    }

    /// Process teardown. An in-flight session is deliberately abandoned;
    /// only an explicit stop persists.
    pub fn cleanup(&mut self) {
        self.coordinator.cleanup();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&cli);
    let res = start_tui(&mut terminal, &mut app);
    app.cleanup();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let events = CrosstermEventSource::new();
    let ticker = FixedTicker::new(Duration::from_millis(app.config.tick_rate_ms));
    let runner = Runner::new(events, ticker);

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Resize => {}
            AppEvent::Key(key) => match key.code {
                KeyCode::Esc => break,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => break,
                KeyCode::Char('q') => break,
                KeyCode::Char(' ') => app.toggle_clock(),
                KeyCode::Char('v') => app.toggle_visual(),
                _ => {}
            },
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    f.render_widget(&*app, f.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::store::MemorySessionLog;
    use crate::visibility::VisibilityState;
    use assert_matches::assert_matches;

    fn manual_app(config: Config) -> (Rc<ManualTimeSource>, App) {
        let time = Rc::new(ManualTimeSource::starting_at(1_700_000_000_000));
        let app = App::with_parts(config, time.clone(), Box::new(MemorySessionLog::default()));
        (time, app)
    }

    fn default_app() -> (Rc<ManualTimeSource>, App) {
        manual_app(Config::default())
    }

    fn debounce() -> Duration {
        Duration::from_millis(Config::default().debounce_ms)
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["fokus"]);
        assert_eq!(cli.tick_rate_ms, None);
        assert_eq!(cli.session_file, None);
        assert!(!cli.visual);
    }

    #[test]
    fn test_cli_tick_rate_flag() {
        let cli = Cli::parse_from(["fokus", "-t", "50"]);
        assert_eq!(cli.tick_rate_ms, Some(50));
    }

    #[test]
    fn test_cli_session_file_flag() {
        let cli = Cli::parse_from(["fokus", "--session-file", "/tmp/s.json"]);
        assert_eq!(cli.session_file, Some(PathBuf::from("/tmp/s.json")));
    }

    #[test]
    fn test_cli_visual_flag() {
        let cli = Cli::parse_from(["fokus", "--visual"]);
        assert!(cli.visual);
    }

    #[test]
    fn test_app_starts_idle_and_hidden() {
        let (_time, app) = default_app();
        assert!(!app.clock.is_running());
        assert!(app.store.is_empty());
        assert_matches!(app.coordinator.state(), VisibilityState::Hidden);
    }

    #[test]
    fn test_app_start_visible_config() {
        let config = Config {
            start_visible: true,
            ..Config::default()
        };
        let (time, mut app) = manual_app(config);
        assert_matches!(app.coordinator.state(), VisibilityState::Showing);
        time.advance(debounce());
        app.on_tick();
        assert_matches!(app.coordinator.state(), VisibilityState::Visible);
    }

    #[test]
    fn test_toggle_clock_starts_and_hides_visual() {
        let config = Config {
            start_visible: true,
            ..Config::default()
        };
        let (time, mut app) = manual_app(config);
        time.advance(debounce());
        app.on_tick();

        app.toggle_clock();
        assert!(app.clock.is_running());
        assert_matches!(app.coordinator.state(), VisibilityState::Hiding);
    }

    #[test]
    fn test_toggle_clock_stop_persists_and_shows_visual() {
        let (time, mut app) = default_app();
        app.toggle_clock();
        time.advance(Duration::from_secs(90));
        app.on_tick();
        app.toggle_clock();

        assert!(!app.clock.is_running());
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.sessions()[0].duration, 90_000);
        assert_matches!(app.coordinator.state(), VisibilityState::Showing);
    }

    #[test]
    fn test_immediate_stop_still_records_session() {
        let (_time, mut app) = default_app();
        app.toggle_clock();
        app.toggle_clock();
        assert_eq!(app.store.len(), 1);
        let s = &app.store.sessions()[0];
        assert_eq!(s.duration, 0);
        assert_eq!(s.focus_scores.len(), 1, "terminal sample synthesized");
    }

    #[test]
    fn test_on_tick_advances_scene_while_visible() {
        let config = Config {
            start_visible: true,
            ..Config::default()
        };
        let (time, mut app) = manual_app(config);
        time.advance(debounce());
        app.on_tick();

        let before = app.coordinator.scene().unwrap().mesh_rot_y;
        time.advance(Duration::from_millis(100));
        app.on_tick();
        let after = app.coordinator.scene().unwrap().mesh_rot_y;
        assert!(after > before);
    }

    #[test]
    fn test_on_tick_skips_scene_while_hidden() {
        let (time, mut app) = default_app();
        time.advance(Duration::from_millis(100));
        app.on_tick();
        assert!(app.coordinator.scene().is_none());
    }

    #[test]
    fn test_toggle_visual_round_trip() {
        let (time, mut app) = default_app();
        app.toggle_visual();
        assert!(app.coordinator.is_visible());
        time.advance(debounce());
        app.on_tick();

        app.toggle_visual();
        assert!(!app.coordinator.is_visible());
        time.advance(debounce());
        app.on_tick();
        assert_matches!(app.coordinator.state(), VisibilityState::Hidden);
    }

    #[test]
    fn test_cleanup_abandons_in_flight_session() {
        let (time, mut app) = default_app();
        app.toggle_clock();
        time.advance(Duration::from_secs(5));
        app.on_tick();
        app.cleanup();
        // nothing persisted; only an explicit stop saves the session
        assert!(app.store.is_empty());
        assert!(app.coordinator.scene().is_none());
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (_time, mut app) = default_app();
        app.cleanup();
        app.cleanup();
        assert_matches!(app.coordinator.state(), VisibilityState::Hidden);
    }
}
