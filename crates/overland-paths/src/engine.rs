//! The shared exploration engine: node cache, offset table and the
//! frontier-driven relaxation loop.

use std::collections::VecDeque;

use overland_core::{Direction, ObjectKind, PathfindingSkill, Point, ROAD_PENALTY, Step, WorldMap};

use crate::node::{COST_UNREACHABLE, WorldNode};

/// Traversal rules injected into [`NodeCache::process_world_map`].
///
/// An implementation decides which tiles the exploration may pass through
/// and what each step costs; the engine owns the frontier and the cache.
pub trait TraversalPolicy {
    /// Tile the exploration starts from.
    fn start(&self) -> i32;

    /// Movement points remaining in the current turn at the start tile.
    fn start_move_points(&self) -> u32;

    /// Maximum per-turn movement points. `0` disables the last-move and
    /// turn-boundary rules (hypothetical, non-agent evaluations).
    fn max_move_points(&self) -> u32;

    /// Movement-point cost of the step `src -> dst`, or
    /// [`COST_UNREACHABLE`] when the step is not allowed.
    fn movement_penalty<W: WorldMap>(
        &self,
        world: &W,
        cache: &NodeCache,
        src: i32,
        dst: i32,
        direction: Direction,
    ) -> u32;

    /// Expand `current`: decide whether its neighbors (and any special
    /// transitions) join the frontier.
    fn process_current_node<W: WorldMap>(
        &self,
        world: &W,
        cache: &mut NodeCache,
        frontier: &mut VecDeque<i32>,
        current: i32,
    );
}

/// Turn-boundary movement-point arithmetic.
///
/// Spending `cost` from `current` points draws from the next turn's `max`
/// allowance when the current turn cannot cover it, and never goes negative.
#[inline]
pub fn subtract_move_points(current: u32, cost: u32, max: u32) -> u32 {
    if cost <= current {
        current - cost
    } else {
        max.saturating_sub(cost - current)
    }
}

/// Shared step-cost rule used by both traversal policies.
///
/// Road-to-road steps cost [`ROAD_PENALTY`]; anything else costs the
/// destination's skill-adjusted ground penalty, 50% more on diagonals.
/// With `max_move_points > 0` the last-move rule applies: an agent holding
/// at least one movement point may always finish its turn with a single
/// adjacent move, paying exactly what remains.
pub(crate) fn base_movement_penalty<W: WorldMap>(
    world: &W,
    cache: &NodeCache,
    src: i32,
    dst: i32,
    direction: Direction,
    skill: PathfindingSkill,
    max_move_points: u32,
) -> u32 {
    if !world.is_passable(src, dst, direction) {
        return COST_UNREACHABLE;
    }
    let mut penalty = if world.is_road(src) && world.is_road(dst) {
        ROAD_PENALTY
    } else {
        world.ground_penalty(dst, skill)
    };
    if penalty == COST_UNREACHABLE {
        return COST_UNREACHABLE;
    }
    if direction.is_diagonal() {
        penalty = penalty.saturating_mul(3) / 2;
    }
    if max_move_points > 0 {
        let remaining = cache.remaining_move_points(src);
        if remaining > 0 && remaining < penalty {
            return remaining;
        }
    }
    penalty
}

/// Dense per-tile node cache plus the precomputed neighbor-offset table.
///
/// One instance serves one agent; the node array is cleared rather than
/// reallocated between recomputations, so repeated re-evaluations incur no
/// allocations once the world size has settled.
pub struct NodeCache {
    nodes: Vec<WorldNode>,
    offsets: [i32; 8],
    width: i32,
    height: i32,
}

impl Default for NodeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeCache {
    /// Create an empty cache; it sizes itself on first use.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            offsets: [0; 8],
            width: 0,
            height: 0,
        }
    }

    /// Resize the cache and rebuild the offset table if the world
    /// dimensions diverged from the cached ones. Returns whether a rebuild
    /// happened; a rebuild wipes every node.
    pub fn check_world_size<W: WorldMap>(&mut self, world: &W) -> bool {
        let width = world.width();
        let height = world.height();
        if width == self.width && height == self.height {
            return false;
        }
        log::debug!("world resized to {width}x{height} — rebuilding node cache");
        self.width = width;
        self.height = height;
        for (slot, direction) in self.offsets.iter_mut().zip(Direction::ALL) {
            *slot = direction.offset(width);
        }
        self.nodes.clear();
        self.nodes.resize_with(world.tile_count(), WorldNode::default);
        true
    }

    /// Wipe every node back to the never-relaxed state.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset();
        }
    }

    /// The node for a tile, `None` when the index is out of range.
    #[inline]
    pub fn node(&self, index: i32) -> Option<&WorldNode> {
        if index < 0 {
            return None;
        }
        self.nodes.get(index as usize)
    }

    /// Cached movement-point cost to `target`, [`COST_UNREACHABLE`] when
    /// the tile was never relaxed or the index is invalid.
    #[inline]
    pub fn distance(&self, target: i32) -> u32 {
        self.node(target).map_or(COST_UNREACHABLE, |n| n.cost)
    }

    /// Movement points left on arrival at `index` (0 when never relaxed).
    #[inline]
    pub fn remaining_move_points(&self, index: i32) -> u32 {
        self.node(index).map_or(0, |n| n.remaining_move_points)
    }

    /// Run one full recomputation for the given policy.
    ///
    /// Clears the cache, seeds the frontier with the policy's start tile at
    /// cost zero, then expands frontier tiles in FIFO order until none
    /// remain. This is a label-correcting relaxation: a tile may re-enter
    /// the frontier when its cost improves, and since penalties are
    /// non-negative and costs only decrease, the loop terminates.
    pub fn process_world_map<W: WorldMap, P: TraversalPolicy>(&mut self, world: &W, policy: &P) {
        self.check_world_size(world);
        self.reset();

        let start = policy.start();
        if !world.is_valid_index(start) {
            return;
        }
        {
            let node = &mut self.nodes[start as usize];
            node.cost = 0;
            node.from = -1;
            node.object = world.object(start);
            node.remaining_move_points = policy.start_move_points();
        }

        let mut frontier = VecDeque::new();
        frontier.push_back(start);
        while let Some(current) = frontier.pop_front() {
            policy.process_current_node(world, self, &mut frontier, current);
        }
    }

    /// Relax the up-to-8 neighbors of `current`, re-enqueueing every
    /// neighbor whose cost strictly improved.
    pub fn check_adjacent_nodes<W: WorldMap, P: TraversalPolicy>(
        &mut self,
        world: &W,
        policy: &P,
        frontier: &mut VecDeque<i32>,
        current: i32,
    ) {
        let current_cost = self.nodes[current as usize].cost;
        let src_remaining = self.nodes[current as usize].remaining_move_points;
        let x = current % self.width;

        for (offset, direction) in self.offsets.into_iter().zip(Direction::ALL) {
            // Clip at the vertical edges so rows do not wrap.
            let nx = x + direction.delta().0;
            if nx < 0 || nx >= self.width {
                continue;
            }
            let next = current + offset;
            if next < 0 || next as usize >= self.nodes.len() {
                continue;
            }

            let penalty = policy.movement_penalty(world, self, current, next, direction);
            if penalty == COST_UNREACHABLE {
                continue;
            }
            let candidate = current_cost.saturating_add(penalty);
            let node = &mut self.nodes[next as usize];
            if candidate < node.cost {
                node.cost = candidate;
                node.from = current;
                node.object = world.object(next);
                node.remaining_move_points =
                    subtract_move_points(src_remaining, penalty, policy.max_move_points());
                frontier.push_back(next);
            }
        }
    }

    /// Relax `dest` through a non-adjacent transition (a teleport) from
    /// `from` at the given step cost. Returns whether the node improved.
    pub(crate) fn relax_transition(
        &mut self,
        dest: i32,
        from: i32,
        cost: u32,
        remaining_after: u32,
        object: ObjectKind,
    ) -> bool {
        if dest < 0 || dest as usize >= self.nodes.len() {
            return false;
        }
        let candidate = self.nodes[from as usize].cost.saturating_add(cost);
        let node = &mut self.nodes[dest as usize];
        if candidate >= node.cost {
            return false;
        }
        node.cost = candidate;
        node.from = from;
        node.object = object;
        node.remaining_move_points = remaining_after;
        true
    }

    /// Reconstruct the route to `target` by walking predecessor links.
    ///
    /// Empty when `target` is unreachable, invalid, or the start tile
    /// itself. Per-step penalties are recovered from cost differences, so
    /// the route's total penalty always equals the cached cost.
    pub fn reconstruct_path(&self, target: i32) -> Vec<Step> {
        let Some(end) = self.node(target) else {
            return Vec::new();
        };
        if end.cost == COST_UNREACHABLE {
            return Vec::new();
        }

        let mut steps = Vec::new();
        let mut to = target;
        while let Some(node) = self.node(to) {
            if node.from < 0 {
                break;
            }
            let from = node.from;
            steps.push(Step {
                from,
                to,
                direction: Direction::between(self.point_of(from), self.point_of(to)),
                penalty: node.cost - self.nodes[from as usize].cost,
            });
            to = from;
        }
        steps.reverse();
        steps
    }

    #[inline]
    fn point_of(&self, index: i32) -> Point {
        Point::new(index % self.width, index / self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtract_within_current_turn() {
        assert_eq!(subtract_move_points(10, 4, 10), 6);
        assert_eq!(subtract_move_points(5, 5, 10), 0);
    }

    #[test]
    fn subtract_across_turn_boundary() {
        // Spend the rest of this turn, draw the overflow from the next one.
        assert_eq!(subtract_move_points(3, 5, 10), 8);
        assert_eq!(subtract_move_points(0, 4, 10), 6);
    }

    #[test]
    fn subtract_never_goes_negative() {
        assert_eq!(subtract_move_points(2, 50, 10), 0);
        assert_eq!(subtract_move_points(0, 0, 0), 0);
    }

    #[test]
    fn empty_cache_queries_are_sentinels() {
        let cache = NodeCache::new();
        assert_eq!(cache.distance(0), COST_UNREACHABLE);
        assert_eq!(cache.distance(-1), COST_UNREACHABLE);
        assert!(cache.node(5).is_none());
        assert!(cache.reconstruct_path(3).is_empty());
    }
}
