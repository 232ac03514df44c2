use crate::clock::Speed;
use crate::consts;
use crate::grid::{BoundaryMode, LevelSize};
use crate::scores::{FileStore, ScoreStore};
use crate::simulation::{SetupError, Settings};
use crate::util::{error_chain, scores_file_path, LoadError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Default, Eq, PartialEq)]
pub struct Config {
    /// Parameters of the games to play
    #[serde(default)]
    pub game: GameOptions,

    /// Settings about data files
    #[serde(default)]
    pub files: FileConfig,
}

impl Config {
    /// Return the default configuration file path
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("snake-engine").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        toml::from_str(&content).map_err(Into::into)
    }

    /// Return the simulation settings described by the configuration
    pub fn settings(&self) -> Settings {
        self.game.settings()
    }

    /// Open the best-score store described by the configuration.
    ///
    /// If `self.files.save_scores` is `false`, or if no scores file is
    /// configured and the default path could not be determined, the returned
    /// store keeps the best score in memory only.
    pub fn score_store(&self) -> ScoreStore {
        if !self.files.save_scores {
            return ScoreStore::in_memory();
        }
        match self.files.scores_file.clone().or_else(scores_file_path) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Using best-score file");
                ScoreStore::open(Box::new(FileStore::new(path)))
            }
            None => {
                let e = LoadError::no_path("best score");
                tracing::warn!(
                    error = %error_chain(&e),
                    "Best score storage unavailable; keeping best score in memory only"
                );
                ScoreStore::in_memory()
            }
        }
    }
}

/// The `[game]` table of the configuration file
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawGameOptions")]
pub struct GameOptions {
    level_size: LevelSize,
    pub boundary: BoundaryMode,
    pub speed: Speed,
    initial_length: usize,
    pub auto_restart: bool,
}

impl GameOptions {
    pub fn level_size(&self) -> LevelSize {
        self.level_size
    }

    pub fn initial_length(&self) -> usize {
        self.initial_length
    }

    pub fn settings(&self) -> Settings {
        Settings {
            grid: self.level_size.grid(),
            boundary: self.boundary,
            initial_length: self.initial_length,
        }
    }

    /// Switch to a different level size.  Fails if the configured initial
    /// snake length does not fit the new grid.
    pub fn set_level_size(&mut self, level_size: LevelSize) -> Result<(), SetupError> {
        let opts = GameOptions {
            level_size,
            ..*self
        };
        opts.settings().validate()?;
        *self = opts;
        Ok(())
    }
}

impl Default for GameOptions {
    fn default() -> GameOptions {
        GameOptions {
            level_size: LevelSize::default(),
            boundary: BoundaryMode::default(),
            speed: Speed::default(),
            initial_length: consts::INITIAL_SNAKE_LENGTH,
            auto_restart: true,
        }
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawGameOptions {
    level_size: LevelSize,
    boundary: BoundaryMode,
    speed: Speed,
    initial_length: usize,
    auto_restart: bool,
}

impl Default for RawGameOptions {
    fn default() -> RawGameOptions {
        let GameOptions {
            level_size,
            boundary,
            speed,
            initial_length,
            auto_restart,
        } = GameOptions::default();
        RawGameOptions {
            level_size,
            boundary,
            speed,
            initial_length,
            auto_restart,
        }
    }
}

impl TryFrom<RawGameOptions> for GameOptions {
    type Error = SetupError;

    fn try_from(value: RawGameOptions) -> Result<GameOptions, SetupError> {
        let opts = GameOptions {
            level_size: value.level_size,
            boundary: value.boundary,
            speed: value.speed,
            initial_length: value.initial_length,
            auto_restart: value.auto_restart,
        };
        opts.settings().validate()?;
        Ok(opts)
    }
}

/// The `[files]` table of the configuration file
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub struct FileConfig {
    /// Path at which the best score should be stored
    scores_file: Option<PathBuf>,

    /// Whether to load & save the best score in a file
    save_scores: bool,
}

impl FileConfig {
    pub fn scores_file(&self) -> Option<&Path> {
        self.scores_file.as_deref()
    }

    pub fn save_scores(&self) -> bool {
        self.save_scores
    }
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            scores_file: None,
            save_scores: true,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    scores_file: Option<String>,
    save_scores: bool,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            scores_file: None,
            save_scores: true,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            scores_file: value.scores_file.map(expanduser::expanduser).transpose()?,
            save_scores: value.save_scores,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
