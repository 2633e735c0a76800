//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, input polling or filesystem access
//!
//! The active room is owned by [`Dungeon`]; actors only ever see it as `&TileGrid`.

pub mod collision;
pub mod dungeon;
pub mod room;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::{circles_overlap, overlap_depth, resolve_overlap};
pub use dungeon::{Dungeon, DungeonError, MemoryRooms, RoomCategory, RoomPools, RoomSource};
pub use room::{DOOR_NOT_FOUND, RoomError, Tile, TileGrid};
pub use state::{
    Enemy, EnemyKind, EnemyProfile, Faction, GamePhase, GameState, Player, Projectile, Snapshot,
};
pub use tick::{TickInput, tick};
pub use weapon::{Attack, Weapon, WeaponKind, melee_hits};
