use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the session log lives, under $HOME/.local/state/fokus
    pub fn sessions_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("fokus");
            Some(state_dir.join("sessions.json"))
        } else {
            ProjectDirs::from("", "", "fokus")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("sessions.json"))
        }
    }
}
