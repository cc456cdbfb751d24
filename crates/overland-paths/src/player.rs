//! Pathfinding under human-player legality rules.

use std::collections::VecDeque;

use overland_core::{Agent, Direction, Faction, PathfindingSkill, Step, WorldMap};

use crate::engine::{NodeCache, TraversalPolicy, base_movement_penalty};

/// Agent attributes that can invalidate the cached search.
///
/// Any of these can change while the hero stays on the same tile, so they
/// are compared by value against the live agent on every re-evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
struct HeroSnapshot {
    start: i32,
    faction: Faction,
    move_points: u32,
    max_move_points: u32,
    skill: PathfindingSkill,
}

impl HeroSnapshot {
    fn capture(hero: &impl Agent) -> Self {
        Self {
            start: hero.position(),
            faction: hero.faction(),
            move_points: hero.move_points(),
            max_move_points: hero.max_move_points(),
            skill: hero.pathfinding_skill(),
        }
    }
}

/// Player legality rules plugged into the exploration engine.
struct PlayerRules<'a> {
    snap: &'a HeroSnapshot,
}

impl TraversalPolicy for PlayerRules<'_> {
    fn start(&self) -> i32 {
        self.snap.start
    }

    fn start_move_points(&self) -> u32 {
        self.snap.move_points
    }

    fn max_move_points(&self) -> u32 {
        self.snap.max_move_points
    }

    fn movement_penalty<W: WorldMap>(
        &self,
        world: &W,
        cache: &NodeCache,
        src: i32,
        dst: i32,
        direction: Direction,
    ) -> u32 {
        base_movement_penalty(
            world,
            cache,
            src,
            dst,
            direction,
            self.snap.skill,
            self.snap.max_move_points,
        )
    }

    fn process_current_node<W: WorldMap>(
        &self,
        world: &W,
        cache: &mut NodeCache,
        frontier: &mut VecDeque<i32>,
        current: i32,
    ) {
        if current != self.snap.start {
            // Exploration never continues through fog, tiles the player may
            // not enter, or objects that end movement on arrival; such
            // tiles keep their recorded cost as route endpoints.
            if world.is_fogged(current, self.snap.faction)
                || !world.is_accessible_for_player(current, self.snap.faction)
                || world.object(current).is_action()
            {
                return;
            }
        }
        cache.check_adjacent_nodes(world, self, frontier, current);
    }
}

/// Pathfinder applying literal game-legality rules for a human-controlled
/// hero.
#[derive(Default)]
pub struct PlayerPathfinder {
    cache: NodeCache,
    snapshot: Option<HeroSnapshot>,
}

impl PlayerPathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the cached search and agent snapshot.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.snapshot = None;
    }

    /// Resize the cache if the world dimensions changed; a resize
    /// invalidates the snapshot so the next re-evaluation recomputes.
    pub fn check_world_size<W: WorldMap>(&mut self, world: &W) -> bool {
        let resized = self.cache.check_world_size(world);
        if resized {
            self.snapshot = None;
        }
        resized
    }

    /// Recompute the reachability cache if the hero's tracked attributes
    /// diverged from the snapshot (or no cache exists yet). Returns whether
    /// a recompute ran.
    pub fn re_evaluate_if_needed<W: WorldMap, A: Agent>(&mut self, world: &W, hero: &A) -> bool {
        self.check_world_size(world);
        let snap = HeroSnapshot::capture(hero);
        if self.snapshot.as_ref() == Some(&snap) {
            return false;
        }
        let rules = PlayerRules { snap: &snap };
        self.cache.process_world_map(world, &rules);
        self.snapshot = Some(snap);
        true
    }

    /// Route from the hero's tile to `target`, in forward order. Empty when
    /// `target` is unreachable or is the start tile itself.
    pub fn build_path(&self, target: i32) -> Vec<Step> {
        self.cache.reconstruct_path(target)
    }

    /// Cached movement-point cost to `target`.
    #[inline]
    pub fn distance(&self, target: i32) -> u32 {
        self.cache.distance(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::COST_UNREACHABLE;
    use crate::testworld::{MockHero, MockWorld};
    use overland_core::{ObjectKind, path_penalty};

    #[test]
    fn uniform_grid_neighbor_distances() {
        // 3x3 grid, cost 1 per step, start at the center: every neighbor is
        // one step away (diagonals too: 1 * 3 / 2 == 1), the center is zero.
        let world = MockWorld::uniform(3, 3, 1);
        let hero = MockHero {
            position: 4,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        assert!(finder.re_evaluate_if_needed(&world, &hero));

        assert_eq!(finder.distance(4), 0);
        for index in [0, 1, 2, 3, 5, 6, 7, 8] {
            assert_eq!(finder.distance(index), 1, "tile {index}");
        }
    }

    #[test]
    fn re_evaluation_is_idempotent() {
        let world = MockWorld::uniform(5, 5, 100);
        let hero = MockHero {
            position: 12,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        assert!(finder.re_evaluate_if_needed(&world, &hero));
        assert!(!finder.re_evaluate_if_needed(&world, &hero));

        // Any tracked attribute change triggers exactly one recompute.
        let moved = MockHero {
            move_points: hero.move_points - 100,
            ..hero
        };
        assert!(finder.re_evaluate_if_needed(&world, &moved));
        assert!(!finder.re_evaluate_if_needed(&world, &moved));
    }

    #[test]
    fn path_to_start_is_empty_and_costs_zero() {
        let world = MockWorld::uniform(5, 5, 100);
        let hero = MockHero {
            position: 12,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&world, &hero);
        assert!(finder.build_path(12).is_empty());
        assert_eq!(finder.distance(12), 0);
    }

    #[test]
    fn cumulative_cost_equals_path_penalty_sum() {
        let mut world = MockWorld::uniform(6, 6, 100);
        // Rough patches to make the optimum non-trivial.
        world.tile_mut(8).ground = 200;
        world.tile_mut(15).ground = 175;
        world.tile_mut(22).ground = 250;
        let hero = MockHero {
            position: 0,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&world, &hero);

        for target in 0..36 {
            let cost = finder.distance(target);
            if cost == COST_UNREACHABLE || target == 0 {
                continue;
            }
            let path = finder.build_path(target);
            assert!(!path.is_empty());
            assert_eq!(path_penalty(&path), cost, "tile {target}");
            // The chain is contiguous and starts at the hero.
            assert_eq!(path[0].from, 0);
            assert_eq!(path.last().unwrap().to, target);
            for pair in path.windows(2) {
                assert_eq!(pair[0].to, pair[1].from);
            }
        }
    }

    #[test]
    fn impassable_tiles_stay_unreachable() {
        let mut world = MockWorld::uniform(3, 3, 100);
        // Wall off the right column.
        for index in [2, 5, 8] {
            world.tile_mut(index).passable = false;
        }
        let hero = MockHero {
            position: 0,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&world, &hero);
        for index in [2, 5, 8] {
            assert_eq!(finder.distance(index), COST_UNREACHABLE);
            assert!(finder.build_path(index).is_empty());
        }
    }

    #[test]
    fn fog_blocks_expansion_but_not_arrival() {
        let mut world = MockWorld::uniform(1, 4, 100);
        world.tile_mut(1).fogged = true;
        let hero = MockHero {
            position: 0,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&world, &hero);
        // The fogged tile can be entered but exploration stops there.
        assert_eq!(finder.distance(1), 100);
        assert_eq!(finder.distance(2), COST_UNREACHABLE);
        assert_eq!(finder.distance(3), COST_UNREACHABLE);
    }

    #[test]
    fn action_objects_are_route_endpoints() {
        let mut world = MockWorld::uniform(1, 4, 100);
        world.tile_mut(1).object = ObjectKind::Castle;
        let hero = MockHero {
            position: 0,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&world, &hero);
        assert_eq!(finder.distance(1), 100);
        // Movement ends on the castle; nothing beyond it is reachable.
        assert_eq!(finder.distance(2), COST_UNREACHABLE);
    }

    #[test]
    fn last_move_rule_spends_the_rest_of_the_turn() {
        // One movement point left: the first step costs exactly that point,
        // later steps price in the turn-boundary arithmetic.
        let world = MockWorld::uniform(1, 3, 100);
        let hero = MockHero {
            position: 0,
            move_points: 1,
            max_move_points: 1000,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&world, &hero);
        assert_eq!(finder.distance(1), 1);
        // Arriving at tile 1 leaves a fresh turn's budget minus the overdraft.
        let path = finder.build_path(2);
        assert_eq!(path.len(), 2);
        assert_eq!(path[0].penalty, 1);
        assert_eq!(path[1].penalty, 100);
    }

    #[test]
    fn world_resize_rebuilds_without_stale_costs() {
        let small = MockWorld::uniform(10, 10, 100);
        let hero = MockHero {
            position: 0,
            ..MockHero::default()
        };
        let mut finder = PlayerPathfinder::new();
        finder.re_evaluate_if_needed(&small, &hero);
        let old_corner = finder.distance(99);
        assert_ne!(old_corner, COST_UNREACHABLE);

        // Same hero on a 20x20 world: the resize alone must invalidate.
        let big = MockWorld::uniform(20, 20, 100);
        assert!(finder.re_evaluate_if_needed(&big, &hero));
        // Tile 399 did not exist before; it must be reachable now, and the
        // old corner's cost must reflect the new geometry, not the old one.
        assert_ne!(finder.distance(399), COST_UNREACHABLE);
        assert_ne!(finder.distance(99), old_corner);
    }
}
