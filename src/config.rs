use crate::consts::{CELL_WIDTH, DISPLAY_SIZE};
use crate::game::{Board, Progression, Rules};
use crate::highscore::HighScoreStore;
use log::LevelFilter;
use serde::Deserialize;
use std::num::{NonZeroU16, NonZeroU32};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct Config {
    /// Whether sound effects start out enabled
    pub(crate) sound: bool,

    /// Gameplay parameters
    pub(crate) game: GameConfig,

    /// Settings about data files
    pub(crate) files: FileConfig,

    /// Logging settings
    pub(crate) log: LogConfig,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            sound: true,
            game: GameConfig::default(),
            files: FileConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read, if the file's contents
    /// could not be deserialized, or if the gameplay settings are invalid.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                return Ok(Config::default())
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        Config::parse(&content)
    }

    fn parse(content: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.game.rules()?;
        Ok(config)
    }

    /// The high score store described by the configuration
    pub(crate) fn high_score_store(&self) -> HighScoreStore {
        if !self.files.save_high_score {
            return HighScoreStore::in_memory();
        }
        match self
            .files
            .high_score_file
            .clone()
            .or_else(HighScoreStore::default_path)
        {
            Some(path) => HighScoreStore::new(path),
            None => {
                log::warn!("Could not determine local data directory; high score will not be saved");
                HighScoreStore::in_memory()
            }
        }
    }

    /// The file to write logs to, if one can be determined
    pub(crate) fn log_file(&self) -> Option<PathBuf> {
        self.files.log_file.clone().or_else(|| {
            dirs::data_local_dir().map(|p| p.join("gridsnake").join("gridsnake.log"))
        })
    }
}

/// Gameplay parameters
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub(crate) struct GameConfig {
    /// Number of cells along each edge of the board
    pub(crate) board_size: NonZeroU16,

    /// Points needed to advance one level
    pub(crate) points_per_level: NonZeroU32,

    /// Milliseconds between ticks at level 1
    pub(crate) initial_speed_ms: u64,

    /// Milliseconds the tick interval shrinks by per level
    pub(crate) speed_increment_ms: u64,

    /// The shortest tick interval in milliseconds
    pub(crate) min_speed_ms: u64,
}

impl GameConfig {
    /// Validate the parameters and convert them into [`Rules`]
    pub(crate) fn rules(&self) -> Result<Rules, ConfigError> {
        let side = self.board_size.get();
        if side.saturating_mul(CELL_WIDTH).saturating_add(2) > DISPLAY_SIZE.width
            || side.saturating_add(4) > DISPLAY_SIZE.height
        {
            return Err(ConfigError::Invalid(
                "board-size is too large to fit on the screen",
            ));
        }
        if self.min_speed_ms == 0 {
            return Err(ConfigError::Invalid("min-speed-ms must be positive"));
        }
        if self.min_speed_ms > self.initial_speed_ms {
            return Err(ConfigError::Invalid(
                "min-speed-ms must not exceed initial-speed-ms",
            ));
        }
        Ok(Rules {
            board: Board::new(self.board_size),
            progression: Progression {
                points_per_level: self.points_per_level,
                initial_speed: Duration::from_millis(self.initial_speed_ms),
                speed_increment: Duration::from_millis(self.speed_increment_ms),
                min_speed: Duration::from_millis(self.min_speed_ms),
            },
        })
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        let progression = Progression::default();
        GameConfig {
            board_size: NonZeroU16::new(20).expect("20 should be nonzero"),
            points_per_level: progression.points_per_level,
            initial_speed_ms: duration_ms(progression.initial_speed),
            speed_increment_ms: duration_ms(progression.speed_increment),
            min_speed_ms: duration_ms(progression.min_speed),
        }
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(try_from = "RawFileConfig")]
pub(crate) struct FileConfig {
    /// Path at which the high score should be stored
    high_score_file: Option<PathBuf>,

    /// Whether to load & save the high score in a file
    save_high_score: bool,

    /// Path to write logs to
    log_file: Option<PathBuf>,
}

impl Default for FileConfig {
    fn default() -> FileConfig {
        FileConfig {
            high_score_file: None,
            save_high_score: true,
            log_file: None,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Eq, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
struct RawFileConfig {
    high_score_file: Option<String>,
    save_high_score: bool,
    log_file: Option<String>,
}

impl Default for RawFileConfig {
    fn default() -> RawFileConfig {
        RawFileConfig {
            high_score_file: None,
            save_high_score: true,
            log_file: None,
        }
    }
}

impl TryFrom<RawFileConfig> for FileConfig {
    type Error = std::io::Error;

    fn try_from(value: RawFileConfig) -> Result<FileConfig, std::io::Error> {
        Ok(FileConfig {
            high_score_file: value
                .high_score_file
                .map(expanduser::expanduser)
                .transpose()?,
            save_high_score: value.save_high_score,
            log_file: value.log_file.map(expanduser::expanduser).transpose()?,
        })
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(default)]
pub(crate) struct LogConfig {
    /// Most verbose level of messages to write
    pub(crate) level: LevelFilter,
}

impl Default for LogConfig {
    fn default() -> LogConfig {
        LogConfig {
            level: LevelFilter::Info,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
    #[error("invalid game settings: {0}")]
    Invalid(&'static str),
}
