//! Room selection and camera easing
//!
//! The dungeon owns the active room and picks the next one from four
//! difficulty pools. Harder pools get more weight the more rooms the
//! player has visited. Identifiers are not repeated until every pool is
//! exhausted, then the whole used set is cleared at once.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::room::{RoomError, TileGrid};
use crate::consts::*;

/// Errors raised while selecting or loading a room
#[derive(Debug, Error)]
pub enum DungeonError {
    /// All four pools are empty
    #[error("no room files found")]
    NoRoomsFound,

    /// Nothing left to pick and nothing to reshuffle
    #[error("no rooms available")]
    NoRoomsAvailable,

    #[error(transparent)]
    Room(#[from] RoomError),
}

/// Room difficulty category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoomCategory {
    Easy,
    Medium,
    Hard,
    Boss,
}

impl RoomCategory {
    /// Fixed order used when walking cumulative weights
    pub const ALL: [RoomCategory; 4] = [
        RoomCategory::Easy,
        RoomCategory::Medium,
        RoomCategory::Hard,
        RoomCategory::Boss,
    ];

    /// Subdirectory name in the room pool layout
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomCategory::Easy => "easy",
            RoomCategory::Medium => "medium",
            RoomCategory::Hard => "hard",
            RoomCategory::Boss => "boss",
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    /// Selection weight given how many rooms have been visited
    pub fn weight(self, rooms_visited: u32) -> f32 {
        let v = rooms_visited as f32;
        match self {
            RoomCategory::Easy => (50.0 - 5.0 * v).max(1.0),
            RoomCategory::Medium => (30.0 - 2.0 * v).max(1.0),
            RoomCategory::Hard => 15.0 + 3.0 * v,
            RoomCategory::Boss => 5.0 + 4.0 * v,
        }
    }
}

/// Room identifiers grouped by difficulty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomPools {
    pools: [Vec<String>; 4],
}

impl RoomPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: RoomCategory, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.pools[category.index()].extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn push(&mut self, category: RoomCategory, id: impl Into<String>) {
        self.pools[category.index()].push(id.into());
    }

    pub fn get(&self, category: RoomCategory) -> &[String] {
        &self.pools[category.index()]
    }

    pub fn len(&self) -> usize {
        self.pools.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(Vec::is_empty)
    }
}

/// Supplies room text for an identifier
pub trait RoomSource {
    fn room_text(&self, id: &str) -> Result<String, RoomError>;
}

/// In-memory room source keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct MemoryRooms {
    rooms: HashMap<String, String>,
}

impl MemoryRooms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, text: impl Into<String>) {
        self.rooms.insert(id.into(), text.into());
    }

    pub fn with(mut self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(id, text);
        self
    }
}

impl RoomSource for MemoryRooms {
    fn room_text(&self, id: &str) -> Result<String, RoomError> {
        self.rooms
            .get(id)
            .cloned()
            .ok_or_else(|| RoomError::Missing { id: id.to_string() })
    }
}

/// Owns the active room and walks the player through randomly picked rooms
pub struct Dungeon {
    active_room: TileGrid,
    /// Monotonic, survives pool reshuffles
    pub rooms_visited: u32,
    pub tile_size: i32,
    /// Canvas the rooms are centered on
    pub screen_size: Vec2,
    pools: RoomPools,
    used: HashSet<String>,
    source: Box<dyn RoomSource>,
    rng: Pcg32,
    pub camera_pos: Vec2,
    pub camera_target: Vec2,
    pub camera_speed: f32,
    pub transitioning: bool,
}

impl Dungeon {
    /// Create a dungeon over the given pools. Fails if every pool is empty.
    pub fn new(
        pools: RoomPools,
        source: Box<dyn RoomSource>,
        tile_size: i32,
        seed: u64,
    ) -> Result<Self, DungeonError> {
        if pools.is_empty() {
            log::error!("No room files found");
            return Err(DungeonError::NoRoomsFound);
        }
        log::info!(
            "Room pools: {} total (easy:{}, medium:{}, hard:{}, boss:{})",
            pools.len(),
            pools.get(RoomCategory::Easy).len(),
            pools.get(RoomCategory::Medium).len(),
            pools.get(RoomCategory::Hard).len(),
            pools.get(RoomCategory::Boss).len(),
        );

        Ok(Self {
            active_room: TileGrid::default(),
            rooms_visited: 0,
            tile_size,
            screen_size: Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT),
            pools,
            used: HashSet::new(),
            source,
            rng: Pcg32::seed_from_u64(seed),
            camera_pos: Vec2::ZERO,
            camera_target: Vec2::ZERO,
            camera_speed: CAMERA_SPEED,
            transitioning: false,
        })
    }

    /// The room actors live in. Only the dungeon may replace it.
    #[inline]
    pub fn current_room(&self) -> &TileGrid {
        &self.active_room
    }

    pub fn pools(&self) -> &RoomPools {
        &self.pools
    }

    /// Identifiers shown since the last reshuffle
    pub fn used_identifiers(&self) -> &HashSet<String> {
        &self.used
    }

    /// Forget progress for a new run. Pools are kept; the next load snaps
    /// the camera like the first one.
    pub fn reset(&mut self) {
        self.active_room = TileGrid::default();
        self.rooms_visited = 0;
        self.used.clear();
        self.transitioning = false;
    }

    /// Per-category weights for the currently unused identifiers
    pub fn category_weights(&self) -> [f32; 4] {
        RoomCategory::ALL.map(|cat| {
            let any_available = self
                .pools
                .get(cat)
                .iter()
                .any(|id| !self.used.contains(id));
            if any_available {
                cat.weight(self.rooms_visited)
            } else {
                0.0
            }
        })
    }

    /// Pick the next room identifier, reshuffling once if every pool is used up
    pub fn pick_next_identifier(&mut self) -> Result<String, DungeonError> {
        let weights = self.category_weights();
        let total: f32 = weights.iter().sum();

        if total <= 0.0 {
            if self.used.is_empty() {
                log::error!("No room files available at all");
                return Err(DungeonError::NoRoomsAvailable);
            }
            log::debug!("All rooms visited, reshuffling pools");
            self.used.clear();
            return self.pick_next_identifier();
        }

        log::debug!(
            "Room weights [easy:{:.0} medium:{:.0} hard:{:.0} boss:{:.0}] (visited:{})",
            weights[0],
            weights[1],
            weights[2],
            weights[3],
            self.rooms_visited
        );

        let roll = self.rng.random::<f32>() * total;
        let mut chosen = None;
        let mut cumulative = 0.0;
        for (cat, weight) in RoomCategory::ALL.into_iter().zip(weights) {
            cumulative += weight;
            if roll < cumulative {
                chosen = Some(cat);
                break;
            }
        }
        // Rounding can leave the roll at the very top; fall back to the last weighted pool
        let chosen = chosen
            .or_else(|| {
                RoomCategory::ALL
                    .into_iter()
                    .zip(weights)
                    .rev()
                    .find(|&(_, w)| w > 0.0)
                    .map(|(cat, _)| cat)
            })
            .ok_or(DungeonError::NoRoomsAvailable)?;

        let available: Vec<&String> = self
            .pools
            .get(chosen)
            .iter()
            .filter(|id| !self.used.contains(*id))
            .collect();
        let idx = self.rng.random_range(0..available.len());
        log::debug!("Picked category: {}", chosen.as_str());

        Ok(available[idx].clone())
    }

    /// Replace the active room with a freshly picked one.
    ///
    /// On error the previous room stays active.
    pub fn load_next_room(&mut self) -> Result<(), DungeonError> {
        let id = self.pick_next_identifier()?;
        let text = self.source.room_text(&id)?;
        let mut room = TileGrid::parse(&id, &text, self.tile_size)?;

        room.world_offset = (self.screen_size - room.pixel_size()) * 0.5;

        let first_room = self.active_room.width == 0;
        self.camera_target = room.center();
        if first_room {
            self.camera_pos = self.camera_target;
        } else {
            self.transitioning = true;
        }

        self.active_room = room;
        self.rooms_visited += 1;
        log::info!("Loaded room {} (total visited: {})", id, self.rooms_visited);
        self.used.insert(id);

        Ok(())
    }

    /// Ease the camera toward its target at a fixed speed
    pub fn update(&mut self, dt: f32) {
        if !self.transitioning {
            return;
        }

        let diff = self.camera_target - self.camera_pos;
        if diff.length() < CAMERA_SNAP_DISTANCE {
            self.camera_pos = self.camera_target;
            self.transitioning = false;
        } else {
            self.camera_pos += diff.normalize_or_zero() * self.camera_speed * dt;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "###\n#.#\n###";

    fn pools_and_source(per_pool: usize) -> (RoomPools, MemoryRooms) {
        let mut pools = RoomPools::new();
        let mut rooms = MemoryRooms::new();
        for cat in RoomCategory::ALL {
            for i in 0..per_pool {
                let id = format!("{}/{}.room", cat.as_str(), i);
                rooms.insert(id.clone(), SMALL);
                pools.push(cat, id);
            }
        }
        (pools, rooms)
    }

    fn dungeon(per_pool: usize, seed: u64) -> Dungeon {
        let (pools, rooms) = pools_and_source(per_pool);
        Dungeon::new(pools, Box::new(rooms), 32, seed).unwrap()
    }

    fn category_of(id: &str) -> &str {
        id.split('/').next().unwrap()
    }

    #[test]
    fn test_empty_pools_rejected() {
        let result = Dungeon::new(RoomPools::new(), Box::new(MemoryRooms::new()), 32, 1);
        assert!(matches!(result, Err(DungeonError::NoRoomsFound)));
    }

    #[test]
    fn test_weights_by_progress() {
        assert_eq!(RoomCategory::Easy.weight(0), 50.0);
        assert_eq!(RoomCategory::Boss.weight(0), 5.0);
        assert_eq!(RoomCategory::Easy.weight(20), 1.0);
        assert_eq!(RoomCategory::Medium.weight(20), 1.0);
        assert_eq!(RoomCategory::Hard.weight(20), 75.0);
        assert_eq!(RoomCategory::Boss.weight(20), 85.0);
    }

    #[test]
    fn test_exhausted_pool_has_zero_weight() {
        let mut d = dungeon(1, 3);
        d.used.insert("easy/0.room".to_string());
        let w = d.category_weights();
        assert_eq!(w[0], 0.0);
        assert_eq!(w[1], 30.0);
    }

    #[test]
    fn test_early_picks_favor_easy() {
        let mut d = dungeon(50, 7);
        let mut easy = 0;
        let mut boss = 0;
        for _ in 0..2000 {
            let id = d.pick_next_identifier().unwrap();
            match category_of(&id) {
                "easy" => easy += 1,
                "boss" => boss += 1,
                _ => {}
            }
        }
        assert!(easy > boss * 3, "easy={easy} boss={boss}");
    }

    #[test]
    fn test_late_picks_favor_boss() {
        let mut d = dungeon(50, 11);
        d.rooms_visited = 20;
        let mut easy = 0;
        let mut boss = 0;
        for _ in 0..2000 {
            let id = d.pick_next_identifier().unwrap();
            match category_of(&id) {
                "easy" => easy += 1,
                "boss" => boss += 1,
                _ => {}
            }
        }
        assert!(boss > easy * 10, "easy={easy} boss={boss}");
    }

    #[test]
    fn test_reshuffle_when_all_used() {
        let mut d = dungeon(2, 5);
        for cat in RoomCategory::ALL {
            for id in d.pools.get(cat).to_vec() {
                d.used.insert(id);
            }
        }
        let id = d.pick_next_identifier().unwrap();
        assert!(d.used.is_empty());
        assert!(RoomCategory::ALL.iter().any(|&cat| d.pools.get(cat).contains(&id)));
    }

    #[test]
    fn test_load_next_room_centers_and_counts() {
        let mut d = dungeon(1, 9);
        d.load_next_room().unwrap();
        let room = d.current_room();
        assert_eq!(room.width, 3);
        assert_eq!(room.world_offset, Vec2::new((1920.0 - 96.0) / 2.0, (1080.0 - 96.0) / 2.0));
        assert_eq!(d.rooms_visited, 1);
        assert_eq!(d.used_identifiers().len(), 1);
        // First room snaps the camera
        assert!(!d.transitioning);
        assert_eq!(d.camera_pos, room.center());
    }

    #[test]
    fn test_every_room_visited_before_repeat() {
        let mut d = dungeon(2, 13);
        let mut seen = HashSet::new();
        for _ in 0..8 {
            d.load_next_room().unwrap();
            assert_eq!(d.used_identifiers().len(), seen.len() + 1);
            seen.extend(d.used_identifiers().iter().cloned());
        }
        assert_eq!(seen.len(), 8);
        // Ninth load reshuffles, visited count keeps growing
        d.load_next_room().unwrap();
        assert_eq!(d.used_identifiers().len(), 1);
        assert_eq!(d.rooms_visited, 9);
    }

    #[test]
    fn test_failed_load_keeps_previous_room() {
        let rooms = MemoryRooms::new()
            .with("good.room", SMALL)
            .with("bad.room", "");
        let pools = RoomPools::new()
            .with(RoomCategory::Easy, ["good.room"])
            .with(RoomCategory::Boss, ["bad.room"]);
        let mut d = Dungeon::new(pools, Box::new(rooms), 32, 21).unwrap();

        // Keep loading until the malformed room is drawn
        let mut failed = false;
        for _ in 0..50 {
            let before = d.current_room().clone();
            let visited = d.rooms_visited;
            if let Err(err) = d.load_next_room() {
                assert!(matches!(err, DungeonError::Room(RoomError::Malformed { .. })));
                assert_eq!(d.current_room(), &before);
                assert_eq!(d.rooms_visited, visited);
                failed = true;
                break;
            }
        }
        assert!(failed);
    }

    #[test]
    fn test_missing_room_text() {
        let pools = RoomPools::new().with(RoomCategory::Hard, ["ghost.room"]);
        let mut d = Dungeon::new(pools, Box::new(MemoryRooms::new()), 32, 1).unwrap();
        assert!(matches!(
            d.load_next_room(),
            Err(DungeonError::Room(RoomError::Missing { .. }))
        ));
    }

    #[test]
    fn test_first_load_after_reset_snaps_camera() {
        let mut d = dungeon(1, 4);
        d.load_next_room().unwrap();
        d.load_next_room().unwrap();
        assert!(d.transitioning);

        d.reset();
        assert_eq!(d.current_room().width, 0);
        assert_eq!(d.rooms_visited, 0);
        assert!(d.used_identifiers().is_empty());

        d.load_next_room().unwrap();
        assert!(!d.transitioning);
        assert_eq!(d.camera_pos, d.current_room().center());
        assert_eq!(d.rooms_visited, 1);
    }

    #[test]
    fn test_camera_eases_then_snaps() {
        let mut d = dungeon(1, 2);
        d.camera_pos = Vec2::ZERO;
        d.camera_target = Vec2::new(100.0, 0.0);
        d.transitioning = true;

        d.update(0.1);
        assert!((d.camera_pos.x - 50.0).abs() < 1e-3);
        assert!(d.transitioning);

        d.update(0.09);
        assert!((d.camera_pos.x - 95.0).abs() < 1e-3);

        d.update(0.01);
        assert_eq!(d.camera_pos, d.camera_target);
        assert!(!d.transitioning);
    }
}
