//! Client configuration loaded from the environment.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;
use gauntlet_runtime::SessionConfig;

/// Settings for one run of the gauntlet.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Directory holding character sheets, staged loot and the grudge ledger.
    pub save_dir: PathBuf,
    /// Root for per-session log directories.
    pub log_dir: PathBuf,
    /// Character sheet id to play.
    pub character_id: String,
    pub session_id: Option<String>,
    /// Encounters per run.
    pub gauntlet_length: usize,
    pub session: SessionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let (save_dir, log_dir) = match ProjectDirs::from("", "", "gauntlet") {
            Some(dirs) => (
                dirs.data_dir().to_path_buf(),
                dirs.cache_dir().join("logs"),
            ),
            None => (PathBuf::from(".gauntlet"), PathBuf::from(".gauntlet/logs")),
        };

        Self {
            save_dir,
            log_dir,
            character_id: "hero".to_string(),
            session_id: None,
            gauntlet_length: 5,
            session: SessionConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `GAUNTLET_SAVE_DIR` - Save directory (default: platform data dir)
    /// - `GAUNTLET_LOG_DIR` - Log root (default: platform cache dir + `logs`)
    /// - `GAUNTLET_CHARACTER` - Character id (default: `hero`)
    /// - `GAUNTLET_SESSION_ID` - Session id used to name the log directory
    /// - `GAUNTLET_GAUNTLET_LENGTH` - Encounters per run (default: 5)
    ///
    /// Session tuning is read through [`SessionConfig::from_env`].
    pub fn from_env() -> Self {
        let mut config = Self {
            session: SessionConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = read_env::<PathBuf>("GAUNTLET_SAVE_DIR") {
            config.save_dir = dir;
        }
        if let Some(dir) = read_env::<PathBuf>("GAUNTLET_LOG_DIR") {
            config.log_dir = dir;
        }
        if let Ok(id) = env::var("GAUNTLET_CHARACTER")
            && !id.trim().is_empty()
        {
            config.character_id = id.trim().to_string();
        }
        if let Ok(id) = env::var("GAUNTLET_SESSION_ID")
            && !id.trim().is_empty()
        {
            config.session_id = Some(id.trim().to_string());
        }
        if let Some(length) = read_env::<usize>("GAUNTLET_GAUNTLET_LENGTH") {
            config.gauntlet_length = length.max(1);
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
