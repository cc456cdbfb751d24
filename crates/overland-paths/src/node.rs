//! Per-tile search nodes.

use overland_core::ObjectKind;

/// Sentinel cost of a tile that was never relaxed (unreachable).
pub const COST_UNREACHABLE: u32 = u32::MAX;

/// One entry of the pathfinder's node cache.
#[derive(Clone, Debug)]
pub struct WorldNode {
    /// Cheapest known movement-point cost from the start tile.
    pub cost: u32,
    /// Predecessor tile index, `-1` when none.
    pub from: i32,
    /// Object occupying the tile, captured at relaxation time.
    pub object: ObjectKind,
    /// Movement points the agent keeps immediately after arriving here.
    pub remaining_move_points: u32,
}

impl Default for WorldNode {
    fn default() -> Self {
        Self {
            cost: COST_UNREACHABLE,
            from: -1,
            object: ObjectKind::None,
            remaining_move_points: 0,
        }
    }
}

impl WorldNode {
    /// Return the node to its never-relaxed state.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_unreachable() {
        let node = WorldNode::default();
        assert_eq!(node.cost, COST_UNREACHABLE);
        assert_eq!(node.from, -1);
        assert_eq!(node.object, ObjectKind::None);
        assert_eq!(node.remaining_move_points, 0);
    }

    #[test]
    fn reset_clears_relaxed_state() {
        let mut node = WorldNode {
            cost: 300,
            from: 17,
            object: ObjectKind::Castle,
            remaining_move_points: 450,
        };
        node.reset();
        assert_eq!(node.cost, COST_UNREACHABLE);
        assert_eq!(node.from, -1);
    }
}
