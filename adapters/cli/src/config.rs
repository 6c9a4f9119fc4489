use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chain_reaction_core::{BoardSize, ConfigError, GameConfig, OpeningCell, PlayerId};
use chain_reaction_system_scheduler::Config as SchedulerConfig;
use log::warn;
use serde::{Deserialize, Serialize};

/// Config file consulted when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_PATH: &str = "chain-reaction.toml";

/// Errors raised while loading the application configuration.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ConfigFileError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid game configuration: {0}")]
    Invalid(#[from] ConfigError),

    #[error("display.tick_interval_ms must be > 0")]
    InvalidTickInterval,
}

/// Top-level application configuration, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) game: GameSection,
    pub(crate) display: DisplaySection,
}

/// `[game]` table. Leaving out `first_player` while setting `seed` lets the
/// seed pick who opens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GameSection {
    pub(crate) size: BoardSize,
    pub(crate) first_player: Option<PlayerId>,
    pub(crate) seed: Option<u64>,
    pub(crate) opening: Vec<OpeningCell>,
}

/// `[display]` table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DisplaySection {
    pub(crate) tick_interval_ms: u64,
    pub(crate) max_ticks_per_frame: u32,
    pub(crate) window_width: u32,
    pub(crate) window_height: u32,
    pub(crate) vsync: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            tick_interval_ms: 40,
            max_ticks_per_frame: 4,
            window_width: 640,
            window_height: 700,
            vsync: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigFileError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub(crate) fn load_or_default(path: &Path) -> Result<Self, ConfigFileError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(
                "config file '{}' not found, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigFileError> {
        if self.display.tick_interval_ms == 0 {
            return Err(ConfigFileError::InvalidTickInterval);
        }
        self.game_config().validate()?;
        Ok(())
    }

    /// Game parameters handed to the world.
    pub(crate) fn game_config(&self) -> GameConfig {
        let game = &self.game;
        let first_player = match (game.first_player, game.seed) {
            (Some(player), _) => Some(player),
            (None, Some(_)) => None,
            (None, None) => Some(PlayerId::First),
        };
        GameConfig {
            size: game.size,
            first_player,
            seed: game.seed.unwrap_or_default(),
            opening: game.opening.clone(),
        }
    }

    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.display.tick_interval_ms)
    }

    pub(crate) fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.tick_interval(), self.display.max_ticks_per_frame)
    }
}
