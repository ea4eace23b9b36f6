use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default clock tick and animation frame interval
pub const TICK_RATE_MS: u64 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Clock/animation tick interval in milliseconds
    pub tick_rate_ms: u64,
    /// Show/hide transition debounce in milliseconds
    pub debounce_ms: u64,
    /// Number of recent sessions plotted in the chart
    pub chart_sessions: usize,
    /// Particle count of the visualization scene
    pub particle_count: usize,
    /// Show the visualization on startup
    pub start_visible: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_rate_ms: TICK_RATE_MS,
            debounce_ms: 500,
            chart_sessions: 7,
            particle_count: crate::visual::DEFAULT_PARTICLE_COUNT,
            start_visible: false,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "fokus") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("fokus_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(cfg) = serde_json::from_slice::<Config>(&bytes) {
                return cfg;
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
