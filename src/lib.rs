//! Fractured Veil - simulation core of a top-down room-crawling action game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (rooms, actors, collisions, room transitions)
//! - `rooms`: Room pool directory scanner and filesystem room source
//! - `settings`: Data-driven configuration

pub mod rooms;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Screen canvas the rooms are centered on
    pub const SCREEN_WIDTH: f32 = 1920.0;
    pub const SCREEN_HEIGHT: f32 = 1080.0;
    pub const DEFAULT_TILE_SIZE: u32 = 64;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_RADIUS: f32 = 15.0;
    pub const PLAYER_HP: f32 = 100.0;
    /// Dash speed is a per-tick displacement, like normal movement velocity
    pub const DASH_SPEED: f32 = 50.0;
    pub const DASH_DURATION: f32 = 0.2;
    pub const DASH_COOLDOWN: f32 = 1.0;

    /// Priest bolts
    pub const ENEMY_PROJECTILE_SPEED: f32 = 250.0;
    pub const ENEMY_PROJECTILE_RADIUS: f32 = 6.0;
    pub const ENEMY_PROJECTILE_LIFETIME: f32 = 3.0;

    /// Camera snaps to target once closer than this
    pub const CAMERA_SNAP_DISTANCE: f32 = 10.0;
    pub const CAMERA_SPEED: f32 = 500.0;

    /// Timed enemy spawns
    pub const SPAWN_INTERVAL: f32 = 3.0;
    pub const MAX_ENEMIES: usize = 10;

    /// Length of the attack animation window after any weapon fires
    pub const ATTACK_ANIMATION: f32 = 0.2;
    /// Minimum cos(angle) between facing and target for a melee hit
    pub const MELEE_CONE_DOT: f32 = 0.3;
}

/// Unit vector from `from` toward `to`, or zero when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to() {
        let dir = direction_to(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((dir - Vec2::new(0.6, 0.8)).length() < 1e-6);
        assert_eq!(direction_to(Vec2::ONE, Vec2::ONE), Vec2::ZERO);
    }
}
