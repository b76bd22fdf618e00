//! Game configuration and asset access.
//!
//! Configuration is a single JSON document naming the sprite strips to load
//! and the ability tuning numbers. The engine never touches the filesystem
//! directly; texture metadata comes in through the [`AssetSource`] seam so
//! hosts and tests can supply their own backends.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use serde::Deserialize;

use crate::math::Vec2;

/// Tuning numbers for the player abilities. Every field has a default
/// matching the shipped game so a partial config stays playable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AbilityConfig {
    pub dash_cooldown: i32,
    pub attack_cooldown: i32,
    pub bone_throw_cooldown: i32,
    pub buffer_window: i32,
    pub coyote_frames: i32,
    pub max_jumps: i32,
    pub bone_throw: BoneThrowConfig,
}

impl Default for AbilityConfig {
    fn default() -> Self {
        Self {
            dash_cooldown: 60,
            attack_cooldown: 70,
            bone_throw_cooldown: 60,
            buffer_window: 15,
            coyote_frames: 6,
            max_jumps: 2,
            bone_throw: BoneThrowConfig::default(),
        }
    }
}

/// Bone-throw projectile tuning: which animations to play and how the
/// projectile flies.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoneThrowConfig {
    pub player_animation: String,
    pub projectile_animation: String,
    pub projectile_velocity: [f32; 2],
    pub ecb: [f32; 2],
    pub lifespan: i32,
}

impl Default for BoneThrowConfig {
    fn default() -> Self {
        Self {
            player_animation: "uspecial".to_string(),
            projectile_animation: "bone".to_string(),
            projectile_velocity: [10.0, -5.0],
            ecb: [40.0, 40.0],
            lifespan: 180,
        }
    }
}

/// The root configuration document.
///
/// Sprite maps go from logical animation name to strip filename; the frame
/// count is encoded in the filename itself (`idle_strip9.png` has 9 frames).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub player_sprites: BTreeMap<String, String>,
    pub freya_sprites: BTreeMap<String, String>,
    pub abilities: AbilityConfig,
}

impl GameConfig {
    /// Parse a configuration document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(ConfigError::Parse)
    }

    /// Read and parse a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Extract the frame count from a strip filename, e.g. `run_strip8.png` has
/// 8 frames. Files without the suffix are single-frame strips.
pub fn strip_frame_count(file: &str) -> u32 {
    let Some(stem) = file.strip_suffix(".png") else {
        return 1;
    };
    stem.rfind("_strip")
        .and_then(|at| stem[at + "_strip".len()..].parse().ok())
        .filter(|&n| n > 0)
        .unwrap_or(1)
}

/// Failure to obtain a usable configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "unable to read config: {err}"),
            ConfigError::Parse(err) => write!(f, "unable to parse config: {err}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(err: io::Error) -> Self {
        ConfigError::Io(err)
    }
}

/// Failure to resolve a texture through an [`AssetSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetError {
    pub path: String,
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to load texture: {}", self.path)
    }
}

impl Error for AssetError {}

/// Backend that resolves texture files to their pixel dimensions.
///
/// The real host backs this with its renderer's texture loader; tests supply
/// canned sizes.
pub trait AssetSource {
    fn texture_size(&mut self, path: &str) -> Result<Vec2, AssetError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sprite_maps_and_abilities() {
        // Given
        let text = r#"{
            "player_sprites": { "idle": "idle_strip9.png" },
            "freya_sprites": { "freya_idle": "freya_idle_strip4.png" },
            "abilities": {
                "dash_cooldown": 45,
                "bone_throw": { "projectile_velocity": [12.0, -4.0] }
            }
        }"#;

        // When
        let config = GameConfig::from_json(text).unwrap();

        // Then
        assert_eq!(config.player_sprites["idle"], "idle_strip9.png");
        assert_eq!(config.freya_sprites["freya_idle"], "freya_idle_strip4.png");
        assert_eq!(config.abilities.dash_cooldown, 45);
        assert_eq!(config.abilities.bone_throw.projectile_velocity, [12.0, -4.0]);
        // Unspecified fields keep their defaults
        assert_eq!(config.abilities.attack_cooldown, 70);
        assert_eq!(config.abilities.buffer_window, 15);
        assert_eq!(config.abilities.bone_throw.lifespan, 180);
    }

    #[test]
    fn empty_document_uses_defaults() {
        // When
        let config = GameConfig::from_json("{}").unwrap();

        // Then
        assert!(config.player_sprites.is_empty());
        assert_eq!(config.abilities.coyote_frames, 6);
        assert_eq!(config.abilities.max_jumps, 2);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        // When
        let err = GameConfig::from_json("{ not json").unwrap_err();

        // Then
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("unable to parse config"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        // When
        let err = GameConfig::from_path("/definitely/not/here/config.json").unwrap_err();

        // Then
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn frame_count_comes_from_filename() {
        assert_eq!(strip_frame_count("idle_strip9.png"), 9);
        assert_eq!(strip_frame_count("dash_strip12.png"), 12);
        // No suffix means a single frame
        assert_eq!(strip_frame_count("portrait.png"), 1);
        // Malformed suffixes fall back to a single frame
        assert_eq!(strip_frame_count("bad_strip.png"), 1);
        assert_eq!(strip_frame_count("bad_stripx.png"), 1);
    }
}
