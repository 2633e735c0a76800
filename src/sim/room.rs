//! Tile grid for a single room
//!
//! Rooms are authored as plain text, one row per line:
//! - `.` floor
//! - `N`, `S`, `E`, `O` doors (north, south, east, west)
//! - anything else is wall
//!
//! Grid coordinates are `(column, row)`; world coordinates are grid-local
//! pixels shifted by `world_offset`.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Returned by [`TileGrid::get_door_position`] when the room has no such door
pub const DOOR_NOT_FOUND: Vec2 = Vec2::new(-1.0, -1.0);

/// Errors raised while reading or parsing a room
#[derive(Debug, Error)]
pub enum RoomError {
    /// Room text is empty or has an empty / space-prefixed line
    #[error("malformed room `{id}`: {reason}")]
    Malformed { id: String, reason: &'static str },

    /// The room source has nothing under this identifier
    #[error("room `{id}` not found")]
    Missing { id: String },

    /// Filesystem read failure
    #[error("I/O error reading room: {0}")]
    Io(#[from] std::io::Error),
}

/// One grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Wall = 0,
    Floor = 1,
    DoorNorth = 2,
    DoorSouth = 3,
    DoorEast = 4,
    /// Written as `O` (ouest) in room files
    DoorWest = 5,
}

impl Tile {
    pub fn from_char(c: char) -> Self {
        match c {
            '.' => Tile::Floor,
            'N' => Tile::DoorNorth,
            'S' => Tile::DoorSouth,
            'E' => Tile::DoorEast,
            'O' => Tile::DoorWest,
            _ => Tile::Wall,
        }
    }

    #[inline]
    pub fn is_passable(self) -> bool {
        self != Tile::Wall
    }

    #[inline]
    pub fn is_door(self) -> bool {
        matches!(
            self,
            Tile::DoorNorth | Tile::DoorSouth | Tile::DoorEast | Tile::DoorWest
        )
    }

    /// The door a player arrives through after leaving by `self`
    pub fn opposite_door(self) -> Option<Tile> {
        match self {
            Tile::DoorNorth => Some(Tile::DoorSouth),
            Tile::DoorSouth => Some(Tile::DoorNorth),
            Tile::DoorEast => Some(Tile::DoorWest),
            Tile::DoorWest => Some(Tile::DoorEast),
            _ => None,
        }
    }
}

/// A rectangular room of tiles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileGrid {
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
    /// Row-major, always `width * height` long
    tiles: Vec<Tile>,
    pub world_offset: Vec2,
}

impl TileGrid {
    /// An all-wall grid
    pub fn new(width: i32, height: i32, tile_size: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            tile_size,
            tiles: vec![Tile::Wall; (width * height) as usize],
            world_offset: Vec2::ZERO,
        }
    }

    /// Parse raw room file contents
    pub fn parse(id: &str, text: &str, tile_size: i32) -> Result<Self, RoomError> {
        let lines: Vec<&str> = text.lines().collect();
        Self::load_from_text(id, &lines, tile_size)
    }

    /// Build a grid from room lines.
    ///
    /// Width comes from the first line only. Shorter rows leave their tail as
    /// wall, longer rows have their excess dropped.
    pub fn load_from_text<S: AsRef<str>>(
        id: &str,
        lines: &[S],
        tile_size: i32,
    ) -> Result<Self, RoomError> {
        if lines.is_empty() {
            return Err(RoomError::Malformed {
                id: id.to_string(),
                reason: "empty file",
            });
        }
        for line in lines {
            let line = line.as_ref();
            if line.is_empty() || line.starts_with(' ') {
                return Err(RoomError::Malformed {
                    id: id.to_string(),
                    reason: "empty or space-prefixed line",
                });
            }
        }

        let height = lines.len() as i32;
        let width = lines[0].as_ref().chars().count() as i32;
        let mut grid = Self::new(width, height, tile_size);

        for (y, line) in lines.iter().enumerate() {
            for (x, c) in line.as_ref().chars().enumerate() {
                grid.set_tile(x as i32, y as i32, Tile::from_char(c));
            }
        }

        Ok(grid)
    }

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    /// Tile at `(x, y)`; anything outside the grid is wall
    pub fn get_tile(&self, x: i32, y: i32) -> Tile {
        if !self.in_bounds(x, y) {
            return Tile::Wall;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    /// Out-of-bounds writes are ignored
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if !self.in_bounds(x, y) {
            return;
        }
        let idx = (y * self.width + x) as usize;
        self.tiles[idx] = tile;
    }

    /// Grid cell containing a world position
    pub fn cell_at(&self, pos: Vec2) -> (i32, i32) {
        let local = pos - self.world_offset;
        let ts = self.tile_size as f32;
        ((local.x / ts).floor() as i32, (local.y / ts).floor() as i32)
    }

    /// Tile under a world position
    pub fn tile_at(&self, pos: Vec2) -> Tile {
        let (x, y) = self.cell_at(pos);
        self.get_tile(x, y)
    }

    /// Approximate circle-vs-grid test.
    ///
    /// Samples only the four corners of the circle's bounding square, so a
    /// circle can slip through a diagonal gap or be rejected next to a
    /// one-tile wall it does not actually touch.
    pub fn is_walkable(&self, pos: Vec2, radius: f32) -> bool {
        let local = pos - self.world_offset;
        let ts = self.tile_size as f32;
        let left = ((local.x - radius) / ts).floor() as i32;
        let right = ((local.x + radius) / ts).floor() as i32;
        let top = ((local.y - radius) / ts).floor() as i32;
        let bottom = ((local.y + radius) / ts).floor() as i32;

        if !self.in_bounds(left, top) || !self.in_bounds(right, bottom) {
            return false;
        }

        [
            self.get_tile(left, top),
            self.get_tile(right, top),
            self.get_tile(left, bottom),
            self.get_tile(right, bottom),
        ]
        .into_iter()
        .all(Tile::is_passable)
    }

    /// World-space center of a cell
    #[inline]
    pub fn cell_center(&self, x: i32, y: i32) -> Vec2 {
        let ts = self.tile_size as f32;
        self.world_offset + Vec2::new((x as f32 + 0.5) * ts, (y as f32 + 0.5) * ts)
    }

    /// World-space center of the whole grid
    pub fn center(&self) -> Vec2 {
        let ts = self.tile_size as f32;
        self.world_offset + Vec2::new(self.width as f32 * ts * 0.5, self.height as f32 * ts * 0.5)
    }

    /// Pixel size of the room
    pub fn pixel_size(&self) -> Vec2 {
        let ts = self.tile_size as f32;
        Vec2::new(self.width as f32 * ts, self.height as f32 * ts)
    }

    /// Center of the first passable tile in row-major order, else the grid center
    pub fn get_spawn(&self) -> Vec2 {
        self.cells()
            .find(|&(x, y)| self.get_tile(x, y).is_passable())
            .map(|(x, y)| self.cell_center(x, y))
            .unwrap_or_else(|| self.center())
    }

    /// Center of the first `door` tile, nudged one tile into the room.
    ///
    /// Returns [`DOOR_NOT_FOUND`] when the room has no such door; callers
    /// must check before using the result.
    pub fn get_door_position(&self, door: Tile) -> Vec2 {
        let Some((x, y)) = self.cells().find(|&(x, y)| self.get_tile(x, y) == door) else {
            return DOOR_NOT_FOUND;
        };

        let ts = self.tile_size as f32;
        let nudge = match door {
            Tile::DoorNorth => Vec2::new(0.0, ts),
            Tile::DoorSouth => Vec2::new(0.0, -ts),
            Tile::DoorEast => Vec2::new(-ts, 0.0),
            Tile::DoorWest => Vec2::new(ts, 0.0),
            _ => Vec2::ZERO,
        };
        self.cell_center(x, y) + nudge
    }

    /// Row-major cell coordinates
    fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| (x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ROOM: &str = "\
##N##
#...#
O...E
#...#
##S##";

    fn floor_room(w: usize, h: usize, tile_size: i32) -> TileGrid {
        let lines: Vec<String> = (0..h).map(|_| ".".repeat(w)).collect();
        TileGrid::load_from_text("floor", &lines, tile_size).unwrap()
    }

    #[test]
    fn test_parse_dimensions_match_source() {
        let grid = TileGrid::parse("room", ROOM, 32).unwrap();
        assert_eq!(grid.height, ROOM.lines().count() as i32);
        assert_eq!(grid.width, ROOM.lines().next().unwrap().len() as i32);
        assert_eq!(grid.tiles.len(), (grid.width * grid.height) as usize);
    }

    #[test]
    fn test_parse_tile_legend() {
        let grid = TileGrid::parse("room", ROOM, 32).unwrap();
        assert_eq!(grid.get_tile(0, 0), Tile::Wall);
        assert_eq!(grid.get_tile(2, 0), Tile::DoorNorth);
        assert_eq!(grid.get_tile(2, 4), Tile::DoorSouth);
        assert_eq!(grid.get_tile(4, 2), Tile::DoorEast);
        assert_eq!(grid.get_tile(0, 2), Tile::DoorWest);
        assert_eq!(grid.get_tile(1, 1), Tile::Floor);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TileGrid::load_from_text("a", &empty, 32),
            Err(RoomError::Malformed { .. })
        ));
        assert!(TileGrid::load_from_text("b", &["...", "", "..."], 32).is_err());
        assert!(TileGrid::load_from_text("c", &["...", " ..", "..."], 32).is_err());
        assert!(TileGrid::parse("d", "", 32).is_err());
    }

    #[test]
    fn test_ragged_rows() {
        let grid = TileGrid::load_from_text("ragged", &["...", ".", "....."], 32).unwrap();
        assert_eq!(grid.width, 3);
        assert_eq!(grid.get_tile(0, 1), Tile::Floor);
        // Short row leaves wall
        assert_eq!(grid.get_tile(1, 1), Tile::Wall);
        // Long row excess never written
        assert_eq!(grid.get_tile(2, 2), Tile::Floor);
        assert_eq!(grid.get_tile(3, 2), Tile::Wall);
    }

    #[test]
    fn test_walkable_center_and_far_away() {
        let grid = floor_room(3, 3, 32);
        let center = Vec2::splat(48.0);
        assert!(grid.is_walkable(center, 5.0));
        assert!(!grid.is_walkable(center + Vec2::new(1000.0, 0.0), 5.0));
    }

    #[test]
    fn test_walkable_respects_world_offset() {
        let mut grid = floor_room(3, 3, 32);
        grid.world_offset = Vec2::new(100.0, 200.0);
        assert!(grid.is_walkable(Vec2::new(148.0, 248.0), 5.0));
        assert!(!grid.is_walkable(Vec2::splat(48.0), 5.0));
    }

    #[test]
    fn test_walkable_blocked_by_wall_corner() {
        let grid = TileGrid::load_from_text("w", &["...", ".#.", "..."], 32).unwrap();
        // Bounding square corner lands in the wall cell
        assert!(!grid.is_walkable(Vec2::new(30.0, 30.0), 5.0));
        assert!(grid.is_walkable(Vec2::new(16.0, 16.0), 5.0));
    }

    #[test]
    fn test_spawn_is_first_passable() {
        let grid = TileGrid::parse("room", ROOM, 32).unwrap();
        // First passable in row-major order is the north door at (2, 0)
        assert_eq!(grid.get_spawn(), Vec2::new(80.0, 16.0));

        let walls = TileGrid::new(4, 2, 10);
        assert_eq!(walls.get_spawn(), Vec2::new(20.0, 10.0));
    }

    #[test]
    fn test_door_positions_nudged_inward() {
        let grid = TileGrid::parse("room", ROOM, 32).unwrap();
        assert_eq!(grid.get_door_position(Tile::DoorNorth), Vec2::new(80.0, 48.0));
        assert_eq!(grid.get_door_position(Tile::DoorSouth), Vec2::new(80.0, 112.0));
        assert_eq!(grid.get_door_position(Tile::DoorEast), Vec2::new(112.0, 80.0));
        assert_eq!(grid.get_door_position(Tile::DoorWest), Vec2::new(48.0, 80.0));
    }

    #[test]
    fn test_missing_door_returns_sentinel() {
        let grid = floor_room(3, 3, 32);
        assert_eq!(grid.get_door_position(Tile::DoorNorth), DOOR_NOT_FOUND);
    }

    #[test]
    fn test_opposite_doors() {
        assert_eq!(Tile::DoorNorth.opposite_door(), Some(Tile::DoorSouth));
        assert_eq!(Tile::DoorEast.opposite_door(), Some(Tile::DoorWest));
        assert_eq!(Tile::DoorWest.opposite_door(), Some(Tile::DoorEast));
        assert_eq!(Tile::Floor.opposite_door(), None);
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_is_wall(x in -50i32..50, y in -50i32..50) {
            let grid = floor_room(5, 4, 16);
            prop_assume!(!grid.in_bounds(x, y));
            prop_assert_eq!(grid.get_tile(x, y), Tile::Wall);
        }

        #[test]
        fn prop_all_floor_interior_is_walkable(
            fx in 0.0f32..1.0,
            fy in 0.0f32..1.0,
            radius in 0.5f32..20.0,
        ) {
            let grid = floor_room(6, 6, 32);
            let size = grid.pixel_size();
            // Keep the whole bounding square strictly inside the room
            let span = size - Vec2::splat(2.0 * radius + 0.02);
            let pos = Vec2::splat(radius + 0.01) + Vec2::new(fx * span.x, fy * span.y);
            prop_assert!(grid.is_walkable(pos, radius));
        }
    }
}
