use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "refrain")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("refrain_config.json"))
    }

    pub fn db_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("refrain")
                .join("leaderboard.db")
        } else {
            ProjectDirs::from("", "", "refrain")
                .map(|pd| pd.data_local_dir().join("leaderboard.db"))
                .unwrap_or_else(|| PathBuf::from("refrain_leaderboard.db"))
        }
    }
}
