//! Application configuration.
//!
//! Read from `config.json` in the platform config directory. Every field has
//! a default, so a missing file or a partial file is fine.

use crate::constants::{
    APP_NAME, CONFIG_FILE_NAME, DEFAULT_MAX_PLIES, DEFAULT_THINK_TICKS, TICK_INTERVAL_MS,
};
use crate::session::{ControllerOptions, Mode, PuzzleOrder};
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Where puzzles come from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PuzzleSource {
    /// The set compiled into the binary
    #[default]
    Builtin,
    /// A JSON array of puzzle entries
    File { path: PathBuf },
    /// A puzzle server's REST API
    Http { base_url: String },
}

/// Configuration for the trainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ticks the opponent "thinks" before replying
    pub think_ticks: u32,

    /// Milliseconds per tick
    pub tick_millis: u64,

    /// Ply cap when a puzzle carries no `mate_in_N` label
    pub max_plies: u32,

    /// Start in free play instead of mate-in-N
    pub free_play: bool,

    pub order: PuzzleOrder,

    pub source: PuzzleSource,

    /// Random seed for the opponent's move choice (None = random)
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            think_ticks: DEFAULT_THINK_TICKS,
            tick_millis: TICK_INTERVAL_MS,
            max_plies: DEFAULT_MAX_PLIES,
            free_play: false,
            order: PuzzleOrder::Random,
            source: PuzzleSource::Builtin,
            seed: None,
        }
    }
}

impl AppConfig {
    /// Instant replies, fixed seed. For scripted runs.
    pub fn instant(seed: u64) -> Self {
        Self {
            think_ticks: 0,
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Platform path of the config file.
    pub fn default_path() -> io::Result<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", APP_NAME).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;
        Ok(project_dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from the platform path, falling back to defaults when the file
    /// is missing or unreadable.
    pub fn load() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("using default config: {}", e);
                return Self::default();
            }
        };
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Self::default()
            }
            Err(e) => {
                warn!("ignoring config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> io::Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn save_to(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, json)
    }

    pub fn mode(&self) -> Mode {
        if self.free_play {
            Mode::FreePlay
        } else {
            Mode::Constrained(self.max_plies.max(1))
        }
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            mode: self.mode(),
            mode_from_puzzle: !self.free_play,
            think_ticks: self.think_ticks,
            order: self.order,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir()
            .join(format!("mate-trainer-config-{}-{}", std::process::id(), test_id))
            .join(name)
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.think_ticks, 30);
        assert_eq!(config.tick_millis, 100);
        assert_eq!(config.mode(), Mode::Constrained(4));
        assert_eq!(config.source, PuzzleSource::Builtin);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"free_play": true, "seed": 5}"#).unwrap();
        assert!(config.free_play);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.think_ticks, DEFAULT_THINK_TICKS);
        assert_eq!(config.mode(), Mode::FreePlay);
        assert!(!config.controller_options().mode_from_puzzle);
    }

    #[test]
    fn test_source_variants() {
        let config: AppConfig = serde_json::from_str(
            r#"{"source": {"kind": "http", "base_url": "http://localhost:5000/api"}, "order": "sequential"}"#,
        )
        .unwrap();
        assert_eq!(
            config.source,
            PuzzleSource::Http {
                base_url: "http://localhost:5000/api".to_string()
            }
        );
        assert_eq!(config.order, PuzzleOrder::Sequential);

        let config: AppConfig =
            serde_json::from_str(r#"{"source": {"kind": "file", "path": "puzzles.json"}}"#).unwrap();
        assert_eq!(
            config.source,
            PuzzleSource::File {
                path: PathBuf::from("puzzles.json")
            }
        );
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_path("config.json");
        let config = AppConfig {
            max_plies: 6,
            order: PuzzleOrder::Sequential,
            ..AppConfig::instant(9)
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_load_errors() {
        let missing = temp_path("missing.json");
        assert_eq!(
            AppConfig::load_from(&missing).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        let bad = temp_path("bad.json");
        fs::create_dir_all(bad.parent().unwrap()).unwrap();
        fs::write(&bad, "{oops").unwrap();
        assert_eq!(
            AppConfig::load_from(&bad).unwrap_err().kind(),
            io::ErrorKind::InvalidData
        );
    }

    #[test]
    fn test_controller_options() {
        let options = AppConfig::instant(3).controller_options();
        assert_eq!(options.think_ticks, 0);
        assert_eq!(options.seed, Some(3));
        assert_eq!(options.mode, Mode::Constrained(DEFAULT_MAX_PLIES));
        assert!(options.mode_from_puzzle);
    }
}
