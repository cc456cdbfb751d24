//! The read-only map contract the pathfinding engine depends on.

use crate::agent::{Faction, PathfindingSkill};
use crate::direction::Direction;
use crate::geom::Point;
use crate::object::ObjectKind;

/// Movement-point cost of one step along a road.
pub const ROAD_PENALTY: u32 = 75;

/// Baseline movement-point cost of one step over easy terrain.
pub const DEFAULT_GROUND_PENALTY: u32 = 100;

/// Read-only tile/map queries consumed by the pathfinders.
///
/// Tiles are addressed by row-major index on a `width x height` grid; `-1`
/// is never a valid index. Implementors own all terrain, fog, ownership and
/// guard data; the engine only ever reads through this interface.
pub trait WorldMap {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    /// Movement-point cost of entering the tile over its terrain, already
    /// adjusted for the given pathfinding skill.
    fn ground_penalty(&self, index: i32, skill: PathfindingSkill) -> u32;

    fn is_road(&self, index: i32) -> bool;
    fn is_water(&self, index: i32) -> bool;

    /// The object occupying the tile.
    fn object(&self, index: i32) -> ObjectKind;

    /// Static terrain/object passability of the step `from -> to` in the
    /// given direction (cliffs, river mouths, object footprints).
    fn is_passable(&self, from: i32, to: i32, direction: Direction) -> bool;

    /// Whether the tile is hidden by fog of war for the given faction.
    fn is_fogged(&self, index: i32, faction: Faction) -> bool;

    /// Literal game legality: may a human-controlled hero of this faction
    /// currently enter the tile (foreign garrisons and similar rules).
    fn is_accessible_for_player(&self, index: i32, faction: Faction) -> bool;

    /// Whether an agent of this faction may legally end its movement on the
    /// tile.
    fn can_occupy(&self, index: i32, faction: Faction) -> bool;

    /// Strength of the hostile force guarding the tile, `0.0` when unguarded.
    fn guard_strength(&self, index: i32) -> f64;

    /// Non-strength AI blockers, e.g. an allied hero standing on the tile.
    fn is_tile_blocked_for_ai(&self, index: i32, faction: Faction) -> bool;

    // -----------------------------------------------------------------------
    // Provided index helpers
    // -----------------------------------------------------------------------

    /// Total number of tiles.
    #[inline]
    fn tile_count(&self) -> usize {
        (self.width().max(0) as usize) * (self.height().max(0) as usize)
    }

    #[inline]
    fn is_valid_index(&self, index: i32) -> bool {
        index >= 0 && (index as usize) < self.tile_count()
    }

    /// Convert a point to a tile index. Returns `None` when out of bounds.
    #[inline]
    fn index_of(&self, p: Point) -> Option<i32> {
        if p.x < 0 || p.x >= self.width() || p.y < 0 || p.y >= self.height() {
            return None;
        }
        Some(p.y * self.width() + p.x)
    }

    /// Convert a tile index back to a point.
    #[inline]
    fn point_of(&self, index: i32) -> Point {
        Point::new(index % self.width(), index / self.width())
    }

    /// The neighbor tile in the given direction, `None` at grid edges.
    #[inline]
    fn neighbor(&self, index: i32, direction: Direction) -> Option<i32> {
        let (dx, dy) = direction.delta();
        self.index_of(self.point_of(index).shift(dx, dy))
    }
}
