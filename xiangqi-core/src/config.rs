//! Session configuration: who plays whom, AI strength and seed

use crate::ai::Difficulty;
use crate::pieces::Side;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Who controls each side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum GameMode {
    PlayerVsPlayer,
    PlayerVsAi { ai_side: Side },
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::PlayerVsAi { ai_side: Side::Black }
    }
}

impl GameMode {
    /// The side the computer plays, if any
    pub fn ai_side(self) -> Option<Side> {
        match self {
            GameMode::PlayerVsPlayer => None,
            GameMode::PlayerVsAi { ai_side } => Some(ai_side),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub difficulty: Difficulty,
    /// Seed for the AI's random source; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl SessionConfig {
    pub fn pvp() -> Self {
        Self {
            mode: GameMode::PlayerVsPlayer,
            ..Self::default()
        }
    }

    pub fn vs_ai(ai_side: Side) -> Self {
        Self {
            mode: GameMode::PlayerVsAi { ai_side },
            ..Self::default()
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.mode.ai_side(), Some(Side::Black));
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.seed, None);
        assert_eq!(SessionConfig::pvp().mode.ai_side(), None);
    }

    #[test]
    fn test_partial_json() {
        let config: SessionConfig = serde_json::from_str(r#"{"difficulty": "hard"}"#).unwrap();
        assert_eq!(config, SessionConfig::default().with_difficulty(Difficulty::Hard));

        let config: SessionConfig =
            serde_json::from_str(r#"{"mode": {"type": "player_vs_ai", "ai_side": "red"}, "seed": 3}"#)
                .unwrap();
        assert_eq!(config, SessionConfig::vs_ai(Side::Red).with_seed(3));
    }

    #[test]
    fn test_save_load() {
        let path = std::env::temp_dir().join(format!("xiangqi-config-{}.json", std::process::id()));
        let config = SessionConfig::vs_ai(Side::Red)
            .with_difficulty(Difficulty::Easy)
            .with_seed(11);

        config.save(&path).unwrap();
        let loaded = SessionConfig::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = SessionConfig::load(Path::new("/nonexistent/xiangqi.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
