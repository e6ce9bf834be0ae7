//! TOML replay scenarios.
//!
//! ```toml
//! nearby = ["Alex"]
//!
//! [player]
//! name = "Steve"
//!
//! [config]            # optional, replaces the stored config
//! default_mode = "macro"
//!
//! [[step]]
//! action = "hold"
//! off_hand = true
//!
//! [[step]]
//! at_ms = 5000
//! action = "tick"
//! count = 3
//! ```

use std::path::{Path, PathBuf};

use ghostwatch_types::{ConfigError, DeliveryMode, DetectorConfig, PlayerState};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("failed to read scenario {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid detector config: {0}")]
    Config(#[from] ConfigError),
    #[error("scenario player needs a name")]
    MissingPlayerName,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub player: PlayerState,
    #[serde(default)]
    pub nearby: Vec<String>,
    #[serde(default)]
    pub config: Option<DetectorConfig>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Step {
    /// Jump the replay clock here before acting. Earlier values are ignored.
    #[serde(default)]
    pub at_ms: Option<u64>,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Run `count` ticks. Each tick first advances the clock by one tick
    /// length, except the first tick of a step that carries `at_ms`.
    Tick {
        #[serde(default = "one")]
        count: u32,
    },
    Hold {
        #[serde(default)]
        off_hand: bool,
    },
    Drop,
    Wipe,
    Kill,
    Respawn,
    Spectate,
    Chat { line: String },
    Health { value: f32 },
    Pop,
    Mode { mode: DeliveryMode },
    ToggleMacro,
    ToggleClipboard,
    Nearby { names: Vec<String> },
    /// Player context disappears (title screen, disconnect).
    Leave,
    Rejoin,
    Network { up: bool },
    Clipboard { up: bool },
}

fn one() -> u32 {
    1
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = toml::from_str(text)?;
        if scenario.player.name.trim().is_empty() {
            return Err(ScenarioError::MissingPlayerName);
        }
        Ok(scenario)
    }

    /// The scenario's own `[config]` table wins over `stored`.
    pub fn detector_config(&self, stored: &DetectorConfig) -> Result<DetectorConfig, ScenarioError> {
        let config = self.config.clone().unwrap_or_else(|| stored.clone());
        config.validate()?;
        Ok(config)
    }
}
