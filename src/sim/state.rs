//! Game state and actors
//!
//! The player is a singleton that is reset, never recreated. Enemies and
//! projectiles live in plain vectors and are compacted once per tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use super::dungeon::{Dungeon, DungeonError, RoomPools, RoomSource};
use super::room::TileGrid;
use super::weapon::{Weapon, WeaponKind};
use crate::consts::*;
use crate::{Settings, direction_to};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Running,
    /// Player died
    GameOver,
    /// Game is paused
    Paused,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Displacement applied this tick (not a per-second rate)
    pub vel: Vec2,
    pub acc: Vec2,
    /// Max speed, pixels/s
    pub speed: f32,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub dash_cooldown: f32,
    pub is_dashing: bool,
    pub dash_duration: f32,
    pub dash_speed: f32,
    /// Unit aim direction
    pub facing: Vec2,
    pub weapons: [Weapon; 2],
    pub active_weapon: usize,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            acc: Vec2::ZERO,
            speed: PLAYER_SPEED,
            radius: PLAYER_RADIUS,
            hp: PLAYER_HP,
            max_hp: PLAYER_HP,
            dash_cooldown: DASH_COOLDOWN,
            is_dashing: false,
            dash_duration: 0.0,
            dash_speed: DASH_SPEED,
            facing: Vec2::X,
            weapons: [Weapon::new(WeaponKind::Sword), Weapon::new(WeaponKind::Bow)],
            active_weapon: 0,
        }
    }
}

impl Player {
    /// Restore a fresh run's values in place
    pub fn reset(&mut self) {
        self.pos = Vec2::new(SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        self.vel = Vec2::ZERO;
        self.acc = Vec2::ZERO;
        self.hp = self.max_hp;
        self.is_dashing = false;
        self.dash_duration = 0.0;
        self.facing = Vec2::X;
        self.active_weapon = 0;
        self.weapons = [Weapon::new(WeaponKind::Sword), Weapon::new(WeaponKind::Bow)];
    }

    /// Move from input, then keep the whole circle on screen
    pub fn update(&mut self, dt: f32, move_input: Vec2, bounds: Vec2) {
        let input = move_input.normalize_or_zero();

        if self.dash_cooldown > 0.0 {
            self.dash_cooldown -= dt;
        }

        if self.is_dashing {
            self.dash_duration -= dt;
            if self.dash_duration <= 0.0 {
                self.is_dashing = false;
            }
        } else {
            self.acc = input * self.speed;
            self.vel = self.acc * dt;
        }

        self.pos += self.vel;

        // Keep the player on screen
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
        }
        if self.pos.x + self.radius > bounds.x {
            self.pos.x = bounds.x - self.radius;
        }
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
        }
        if self.pos.y + self.radius > bounds.y {
            self.pos.y = bounds.y - self.radius;
        }
    }

    /// Start a dash along the current velocity. Returns false while on cooldown.
    pub fn try_dash(&mut self) -> bool {
        if self.dash_cooldown > 0.0 {
            return false;
        }
        self.is_dashing = true;
        self.dash_duration = DASH_DURATION;
        self.dash_cooldown = DASH_COOLDOWN;
        self.vel = self.vel.normalize_or_zero() * self.dash_speed;
        true
    }

    /// Face along `dir`; a zero direction keeps the previous facing
    pub fn aim(&mut self, dir: Vec2) {
        if let Some(facing) = dir.try_normalize() {
            self.facing = facing;
        }
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapons[self.active_weapon]
    }

    pub fn weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.active_weapon]
    }

    pub fn switch_weapon(&mut self) {
        self.active_weapon = (self.active_weapon + 1) % self.weapons.len();
    }

    pub fn tick_weapons(&mut self, dt: f32) {
        for weapon in &mut self.weapons {
            weapon.tick(dt);
        }
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Skeleton,
    Vampire,
    Priest,
}

/// Fixed stats for an enemy kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    /// Contact damage per second; priest bolts deal half
    pub damage: f32,
    /// Seconds between shots, 0 for enemies that never shoot
    pub shoot_cooldown: f32,
    pub score: u32,
}

static PROFILES: [EnemyProfile; 3] = [
    // Skeleton
    EnemyProfile {
        radius: 12.0,
        hp: 30.0,
        speed: 150.0,
        damage: 10.0,
        shoot_cooldown: 0.0,
        score: 10,
    },
    // Vampire
    EnemyProfile {
        radius: 8.0,
        hp: 20.0,
        speed: 280.0,
        damage: 5.0,
        shoot_cooldown: 0.0,
        score: 15,
    },
    // Priest
    EnemyProfile {
        radius: 30.0,
        hp: 40.0,
        speed: 100.0,
        damage: 20.0,
        shoot_cooldown: 2.0,
        score: 25,
    },
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Skeleton, EnemyKind::Vampire, EnemyKind::Priest];

    #[inline]
    pub fn profile(self) -> &'static EnemyProfile {
        &PROFILES[self as usize]
    }
}

/// An enemy that walks straight at the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub alive: bool,
    pub speed: f32,
    pub damage: f32,
    pub shoot_timer: f32,
    pub shoot_cooldown: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2) -> Self {
        let profile = kind.profile();
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            radius: profile.radius,
            hp: profile.hp,
            max_hp: profile.hp,
            alive: true,
            speed: profile.speed,
            damage: profile.damage,
            shoot_timer: 0.0,
            shoot_cooldown: profile.shoot_cooldown,
        }
    }

    /// Chase the player. Returns a bolt when a shooter's timer elapses.
    pub fn update(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        player_radius: f32,
        room: &TileGrid,
    ) -> Option<Projectile> {
        if !self.alive {
            return None;
        }

        let mut shot = None;
        if self.shoot_cooldown > 0.0 {
            self.shoot_timer += dt;
            if self.shoot_timer >= self.shoot_cooldown {
                self.shoot_timer = 0.0;
                shot = Some(Projectile::new(
                    self.pos,
                    direction_to(self.pos, player_pos) * ENEMY_PROJECTILE_SPEED,
                    self.damage * 0.5,
                    ENEMY_PROJECTILE_RADIUS,
                    Faction::Enemy,
                    ENEMY_PROJECTILE_LIFETIME,
                ));
            }
        }

        // Standing still while touching avoids push jitter
        if circles_overlap(self.pos, self.radius, player_pos, player_radius) {
            self.vel = Vec2::ZERO;
            return shot;
        }

        self.vel = direction_to(self.pos, player_pos) * self.speed * dt;
        let next_pos = self.pos + self.vel;
        if room.is_walkable(next_pos, self.radius) {
            self.pos = next_pos;
        }

        shot
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// Who fired a projectile, and so who it can hurt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Faction {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Pixels/s
    pub vel: Vec2,
    pub damage: f32,
    pub radius: f32,
    pub lifetime: f32,
    pub alive: bool,
    pub faction: Faction,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, damage: f32, radius: f32, faction: Faction, lifetime: f32) -> Self {
        Self {
            pos,
            vel,
            damage,
            radius,
            lifetime,
            alive: true,
            faction,
        }
    }

    /// Fly straight; walls and expiry destroy the projectile
    pub fn update(&mut self, dt: f32, room: &TileGrid) {
        if !self.alive {
            return;
        }

        self.pos += self.vel * dt;
        self.lifetime -= dt;

        if self.lifetime <= 0.0 {
            self.alive = false;
        }
        if !room.is_walkable(self.pos, self.radius) {
            self.alive = false;
        }
    }
}

/// Read-only view handed to renderers and the HUD
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub projectiles: &'a [Projectile],
    pub room: &'a TileGrid,
    pub camera_pos: Vec2,
    pub rooms_visited: u32,
    pub score: u64,
    pub wave: u32,
    pub time_elapsed: f32,
}

/// Complete simulation state
pub struct GameState {
    pub phase: GamePhase,
    pub player: Player,
    pub dungeon: Dungeon,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    /// Seconds spent running
    pub time_elapsed: f32,
    pub score: u64,
    /// Rooms cleared through doors this run
    pub wave: u32,
    /// Seconds since the last timed spawn
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub max_enemies: usize,
    pub spawn_enabled: bool,
    /// Player stays inside this rectangle
    pub screen_size: Vec2,
    rng: Pcg32,
}

impl GameState {
    /// Build a game and load its first room. Any failure here is fatal to startup.
    pub fn new(
        settings: &Settings,
        pools: RoomPools,
        source: Box<dyn RoomSource>,
    ) -> Result<Self, DungeonError> {
        let seed = settings.seed();
        let mut dungeon = Dungeon::new(pools, source, settings.tile_size as i32, seed)?;
        dungeon.screen_size = settings.screen_size();
        dungeon.camera_speed = settings.camera_speed;

        let mut state = Self {
            phase: GamePhase::Menu,
            player: Player::default(),
            dungeon,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            time_elapsed: 0.0,
            score: 0,
            wave: 0,
            spawn_timer: 0.0,
            spawn_interval: settings.spawn_interval,
            max_enemies: settings.max_enemies,
            spawn_enabled: settings.spawn_enemies,
            screen_size: settings.screen_size(),
            rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
        };
        state.start_run()?;
        Ok(state)
    }

    /// Reset counters and actors, load a fresh first room and go back to the menu
    pub fn restart(&mut self) -> Result<(), DungeonError> {
        self.dungeon.reset();
        self.start_run()?;
        self.phase = GamePhase::Menu;
        Ok(())
    }

    fn start_run(&mut self) -> Result<(), DungeonError> {
        self.dungeon.load_next_room()?;
        self.time_elapsed = 0.0;
        self.score = 0;
        self.wave = 0;
        self.spawn_timer = 0.0;
        self.enemies.clear();
        self.projectiles.clear();
        self.player.reset();
        self.player.pos = self.dungeon.current_room().get_spawn();
        Ok(())
    }

    #[inline]
    pub fn room(&self) -> &TileGrid {
        self.dungeon.current_room()
    }

    pub fn spawn_enemy(&mut self, kind: EnemyKind, pos: Vec2) {
        self.enemies.push(Enemy::new(kind, pos));
    }

    /// Spawn a random kind at the room spawn point
    pub fn spawn_random_enemy(&mut self) {
        let kind = EnemyKind::ALL[self.rng.random_range(0..EnemyKind::ALL.len())];
        let pos = self.room().get_spawn();
        log::debug!("Spawning {:?} at {}", kind, pos);
        self.spawn_enemy(kind, pos);
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.phase,
            player: &self.player,
            enemies: &self.enemies,
            projectiles: &self.projectiles,
            room: self.room(),
            camera_pos: self.dungeon.camera_pos,
            rooms_visited: self.dungeon.rooms_visited,
            score: self.score,
            wave: self.wave,
            time_elapsed: self.time_elapsed,
        }
    }
}
