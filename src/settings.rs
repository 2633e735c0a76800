//! Game settings
//!
//! Loaded from an optional JSON file; every missing field falls back to
//! its default.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Simulation tuning that is not baked into the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    /// Screen the rooms are centered on and the player is kept inside
    pub screen_width: f32,
    pub screen_height: f32,
    /// Pixel size of one room tile
    pub tile_size: u32,

    // === Camera ===
    /// Camera easing speed between rooms (pixels/s)
    pub camera_speed: f32,

    // === Enemies ===
    /// Spawn enemies on a timer
    pub spawn_enemies: bool,
    /// Seconds between timed spawns
    pub spawn_interval: f32,
    /// No timed spawns while this many enemies are alive
    pub max_enemies: usize,

    // === RNG ===
    /// Fixed seed; `None` picks one from the clock
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,

            camera_speed: CAMERA_SPEED,

            spawn_enemies: true,
            spawn_interval: SPAWN_INTERVAL,
            max_enemies: MAX_ENEMIES,

            seed: None,
        }
    }
}

impl Settings {
    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }

    /// Configured seed, or one derived from the clock
    pub fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or(0)
        })
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    log::warn!("Invalid settings in {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "tile_size": 32, "seed": 7 }"#).unwrap();
        assert_eq!(settings.tile_size, 32);
        assert_eq!(settings.seed(), 7);
        assert_eq!(settings.screen_width, SCREEN_WIDTH);
        assert_eq!(settings.max_enemies, MAX_ENEMIES);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = Settings::load(Path::new("/nonexistent/fractured-veil.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("fractured-veil-settings-{}.json", std::process::id()));
        let settings = Settings {
            spawn_interval: 1.5,
            seed: Some(99),
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
