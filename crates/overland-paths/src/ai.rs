//! Risk-weighted pathfinding for AI-controlled agents.
//!
//! The AI policy diverges from player legality in a few ways: tiles guarded
//! by a weaker force are passable, water is crossed only with a boat,
//! teleport spells shortcut the walk, and a set of higher-level queries
//! (fog discovery, stuck-hero nudging, route inspection) is layered on top
//! of the shared node cache.

use std::collections::{HashSet, VecDeque};

use overland_core::{
    Agent, Direction, Faction, IndexObject, ObjectKind, PathfindingSkill, Point, Step, WorldMap,
    chebyshev,
};

use crate::engine::{NodeCache, TraversalPolicy, base_movement_penalty};
use crate::node::COST_UNREACHABLE;

/// Movement points consumed by one Dimension Door cast.
const DIMENSION_DOOR_MOVE_COST: u32 = 225;

/// AI agent attributes that can invalidate the cached search.
///
/// Everything here can change without the hero moving (a battle fought, a
/// spell learned, a castle hired away), so all of it is diffed by value.
#[derive(Clone, Debug, PartialEq)]
struct AiSnapshot {
    start: i32,
    faction: Faction,
    move_points: u32,
    max_move_points: u32,
    skill: PathfindingSkill,
    army_strength: f64,
    spell_points: u32,
    inventory_full: bool,
    town_gate_target: Option<i32>,
    town_portal_targets: Vec<i32>,
}

impl AiSnapshot {
    fn capture(hero: &impl Agent) -> Self {
        Self {
            start: hero.position(),
            faction: hero.faction(),
            move_points: hero.move_points(),
            max_move_points: hero.max_move_points(),
            skill: hero.pathfinding_skill(),
            army_strength: hero.army_strength(),
            spell_points: hero.spell_points(),
            inventory_full: hero.is_inventory_full(),
            town_gate_target: hero.town_gate_target(),
            town_portal_targets: hero.town_portal_targets(),
        }
    }

    /// Snapshot for a hypothetical, non-agent position (a garrison, a
    /// monster): no movement budget, no spells, no inventory.
    fn hypothetical(
        start: i32,
        faction: Faction,
        army_strength: f64,
        skill: PathfindingSkill,
    ) -> Self {
        Self {
            start,
            faction,
            move_points: 0,
            max_move_points: 0,
            skill,
            army_strength,
            spell_points: 0,
            inventory_full: false,
            town_gate_target: None,
            town_portal_targets: Vec::new(),
        }
    }
}

/// AI traversal rules plugged into the exploration engine.
struct AiRules<'a> {
    snap: &'a AiSnapshot,
    advantage: f64,
    teleport_seeds: &'a [i32],
}

impl AiRules<'_> {
    /// Guarded tiles open up when the agent is strong enough; exact
    /// equality passes.
    fn passes_guard(&self, guard_strength: f64) -> bool {
        guard_strength <= 0.0 || self.snap.army_strength >= guard_strength * self.advantage
    }
}

impl TraversalPolicy for AiRules<'_> {
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
        let penalty = base_movement_penalty(
            world,
            cache,
            src,
            dst,
            direction,
            self.snap.skill,
            self.snap.max_move_points,
        );
        if penalty == COST_UNREACHABLE {
            return COST_UNREACHABLE;
        }
        // A full bag makes artifact tiles unpickable, hence unenterable.
        if self.snap.inventory_full && world.object(dst) == ObjectKind::Artifact {
            return COST_UNREACHABLE;
        }
        let src_water = world.is_water(src);
        let dst_water = world.is_water(dst);
        if src_water == dst_water {
            return penalty;
        }
        if !src_water && world.object(dst) != ObjectKind::Boat {
            // No boat to board: the AI does not walk into open water.
            return COST_UNREACHABLE;
        }
        // Embarking or disembarking consumes the rest of the turn.
        if self.snap.max_move_points > 0 {
            penalty.saturating_add(cache.remaining_move_points(src))
        } else {
            penalty
        }
    }

    fn process_current_node<W: WorldMap>(
        &self,
        world: &W,
        cache: &mut NodeCache,
        frontier: &mut VecDeque<i32>,
        current: i32,
    ) {
        let is_start = current == self.snap.start;
        if is_start {
            // Teleport destinations join the frontier alongside ordinary
            // neighbors; casting consumes whatever is left of this turn.
            for &dest in self.teleport_seeds {
                if dest != current
                    && world.is_valid_index(dest)
                    && world.can_occupy(dest, self.snap.faction)
                    && cache.relax_transition(
                        dest,
                        current,
                        self.snap.move_points,
                        0,
                        world.object(dest),
                    )
                {
                    frontier.push_back(dest);
                }
            }
        } else if !self.teleport_seeds.contains(&current) {
            if !self.passes_guard(world.guard_strength(current)) {
                // Too strong: the tile keeps its recorded cost and object
                // but exploration dead-ends here.
                return;
            }
            if world.is_tile_blocked_for_ai(current, self.snap.faction) {
                return;
            }
            if world.object(current).is_action() {
                return;
            }
        }
        cache.check_adjacent_nodes(world, self, frontier, current);
    }
}

/// A reachable tile bordering fog, chosen by
/// [`AiPathfinder::get_fog_discovery_tile`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FogDiscovery {
    pub index: i32,
    /// Whether moving there pushes the explored border out (some fogged
    /// neighbor is terrain the agent could continue into), as opposed to
    /// merely revealing tiles it cannot enter.
    pub territory_expansion: bool,
}

/// Pathfinder applying risk-weighted traversal rules for AI-controlled
/// agents.
pub struct AiPathfinder {
    cache: NodeCache,
    snapshot: Option<AiSnapshot>,
    teleport_seeds: Vec<i32>,
    min_army_strength_advantage: f64,
    spell_points_reserve_ratio: f64,
}

impl AiPathfinder {
    /// `min_army_strength_advantage` is the agent-to-guard strength ratio
    /// required to treat a guarded tile as passable.
    pub fn new(min_army_strength_advantage: f64) -> Self {
        Self {
            cache: NodeCache::new(),
            snapshot: None,
            teleport_seeds: Vec::new(),
            min_army_strength_advantage,
            spell_points_reserve_ratio: 0.5,
        }
    }

    /// Drop the cached search, snapshot and teleport seeds.
    pub fn reset(&mut self) {
        self.cache.reset();
        self.snapshot = None;
        self.teleport_seeds.clear();
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

    /// Recompute the reachability cache if any tracked hero attribute
    /// diverged from the snapshot. Returns whether a recompute ran.
    pub fn re_evaluate_if_needed<W: WorldMap, A: Agent>(&mut self, world: &W, hero: &A) -> bool {
        self.check_world_size(world);
        let snap = AiSnapshot::capture(hero);
        if self.snapshot.as_ref() == Some(&snap) {
            return false;
        }
        self.teleport_seeds = usable_teleport_targets(hero, self.spell_points_reserve_ratio);
        self.recompute(world, snap);
        true
    }

    /// Evaluate a hypothetical, non-agent position (e.g. "if a garrison
    /// stood here"). Returns whether a recompute ran.
    pub fn re_evaluate_if_needed_at<W: WorldMap>(
        &mut self,
        world: &W,
        start: i32,
        faction: Faction,
        army_strength: f64,
        skill: PathfindingSkill,
    ) -> bool {
        self.check_world_size(world);
        let snap = AiSnapshot::hypothetical(start, faction, army_strength, skill);
        if self.snapshot.as_ref() == Some(&snap) {
            return false;
        }
        self.teleport_seeds.clear();
        self.recompute(world, snap);
        true
    }

    fn recompute<W: WorldMap>(&mut self, world: &W, snap: AiSnapshot) {
        let rules = AiRules {
            snap: &snap,
            advantage: self.min_army_strength_advantage,
            teleport_seeds: &self.teleport_seeds,
        };
        self.cache.process_world_map(world, &rules);
        self.snapshot = Some(snap);
    }

    /// Cached movement-point cost to `target`.
    #[inline]
    pub fn distance(&self, target: i32) -> u32 {
        self.cache.distance(target)
    }

    /// One-off hypothetical evaluation: the distance from `start` to
    /// `target` for an army of the given strength, for ranking candidate
    /// targets. The agent-bound cache is rebuilt on the next agent
    /// re-evaluation, since the snapshot no longer matches.
    pub fn get_distance<W: WorldMap>(
        &mut self,
        world: &W,
        start: i32,
        target: i32,
        faction: Faction,
        army_strength: f64,
        skill: PathfindingSkill,
    ) -> u32 {
        self.re_evaluate_if_needed_at(world, start, faction, army_strength, skill);
        self.cache.distance(target)
    }

    /// Route to `target`, retargeted to the nearest reachable tile adjacent
    /// to it when the target itself cannot be stopped on.
    ///
    /// In planning mode a retargeted route keeps a final virtual step onto
    /// the caller's requested tile, so cost estimates still cover touching
    /// the object; committed routes end on the tile actually stepped on.
    pub fn build_path<W: WorldMap>(
        &self,
        world: &W,
        target: i32,
        is_planning_mode: bool,
    ) -> Vec<Step> {
        let actual = if self.cache.distance(target) != COST_UNREACHABLE {
            target
        } else {
            match self.nearest_reachable_adjacent(world, target) {
                Some(index) => index,
                None => return Vec::new(),
            }
        };
        let mut steps = self.cache.reconstruct_path(actual);
        if is_planning_mode && actual != target {
            let skill = self
                .snapshot
                .as_ref()
                .map_or(PathfindingSkill::Expert, |s| s.skill);
            if let Some(direction) = Direction::between(world.point_of(actual), world.point_of(target))
            {
                steps.push(Step {
                    from: actual,
                    to: target,
                    direction: Some(direction),
                    penalty: world.ground_penalty(target, skill),
                });
            }
        }
        steps
    }

    /// The distinct notable objects along the cached route to `target`,
    /// in encounter order; `check_adjacent` also inspects the tiles around
    /// each step of the route.
    pub fn get_objects_on_the_way<W: WorldMap>(
        &self,
        world: &W,
        target: i32,
        check_adjacent: bool,
    ) -> Vec<IndexObject> {
        let actual = if self.cache.distance(target) != COST_UNREACHABLE {
            target
        } else {
            match self.nearest_reachable_adjacent(world, target) {
                Some(index) => index,
                None => return Vec::new(),
            }
        };

        let start = self.snapshot.as_ref().map_or(-1, |s| s.start);
        let mut seen = HashSet::new();
        let mut objects = Vec::new();
        let mut collect = |index: i32, object: ObjectKind| {
            if index != start && !object.is_none() && seen.insert(index) {
                objects.push(IndexObject { index, object });
            }
        };

        for step in self.cache.reconstruct_path(actual) {
            if let Some(node) = self.cache.node(step.to) {
                collect(step.to, node.object);
            }
            if check_adjacent {
                for direction in Direction::ALL {
                    if let Some(near) = world.neighbor(step.to, direction) {
                        collect(near, world.object(near));
                    }
                }
            }
        }
        objects
    }

    /// Pick the nearest reachable tile that borders fog for the hero's
    /// faction and can be stopped on. `None` when the map holds no such
    /// tile.
    pub fn get_fog_discovery_tile<W: WorldMap, A: Agent>(
        &mut self,
        world: &W,
        hero: &A,
    ) -> Option<FogDiscovery> {
        self.re_evaluate_if_needed(world, hero);
        let faction = hero.faction();
        let start = hero.position();

        let mut best: Option<(u32, FogDiscovery)> = None;
        for index in 0..world.tile_count() as i32 {
            let cost = self.cache.distance(index);
            if cost == COST_UNREACHABLE || index == start {
                continue;
            }
            if !world.can_occupy(index, faction) {
                continue;
            }
            let mut borders_fog = false;
            let mut expansion = false;
            for direction in Direction::ALL {
                let Some(near) = world.neighbor(index, direction) else {
                    continue;
                };
                if !world.is_fogged(near, faction) {
                    continue;
                }
                borders_fog = true;
                if world.is_passable(index, near, direction) {
                    expansion = true;
                    break;
                }
            }
            if !borders_fog {
                continue;
            }
            if best.as_ref().is_none_or(|(c, _)| cost < *c) {
                best = Some((
                    cost,
                    FogDiscovery {
                        index,
                        territory_expansion: expansion,
                    },
                ));
            }
        }
        best.map(|(_, discovery)| discovery)
    }

    /// The cheapest adjacent tile the hero could step aside to, for
    /// breaking deadlocks where one hero physically blocks another's only
    /// route. `None` when the hero is boxed in.
    pub fn get_nearest_tile_to_move<W: WorldMap, A: Agent>(
        &self,
        world: &W,
        hero: &A,
    ) -> Option<i32> {
        let position = hero.position();
        let faction = hero.faction();
        let skill = hero.pathfinding_skill();

        let mut best: Option<(u32, i32)> = None;
        for direction in Direction::ALL {
            let Some(near) = world.neighbor(position, direction) else {
                continue;
            };
            if !world.is_passable(position, near, direction)
                || world.object(near) == ObjectKind::Hero
                || world.is_tile_blocked_for_ai(near, faction)
                || !world.can_occupy(near, faction)
            {
                continue;
            }
            let mut penalty = world.ground_penalty(near, skill);
            if penalty == COST_UNREACHABLE {
                continue;
            }
            if direction.is_diagonal() {
                penalty = penalty.saturating_mul(3) / 2;
            }
            if best.is_none_or(|(p, _)| penalty < p) {
                best = Some((penalty, near));
            }
        }
        best.map(|(_, index)| index)
    }

    /// Whether the hero stands where it could be obstructing someone
    /// else's route: a choke point with two or fewer passable exits.
    pub fn is_hero_possibly_blocking_way<W: WorldMap, A: Agent>(world: &W, hero: &A) -> bool {
        let position = hero.position();
        let mut exits = 0;
        for direction in Direction::ALL {
            if let Some(near) = world.neighbor(position, direction) {
                if world.is_passable(position, near, direction) {
                    exits += 1;
                }
            }
        }
        exits <= 2
    }

    /// Route to `target` made of Dimension Door jumps, bounded by the spell
    /// points left after the reserve and by this turn's movement points.
    /// Empty when the spell is unknown or the target cannot be reached this
    /// way.
    pub fn get_dimension_door_path<W: WorldMap, A: Agent>(
        &self,
        world: &W,
        hero: &A,
        target: i32,
    ) -> Vec<Step> {
        let Some(spell_cost) = hero.dimension_door_cost() else {
            return Vec::new();
        };
        let range = hero.dimension_door_range();
        if range <= 0 || !world.is_valid_index(target) {
            return Vec::new();
        }

        let faction = hero.faction();
        let reserve = (hero.max_spell_points() as f64 * self.spell_points_reserve_ratio) as u32;
        let budget = hero.spell_points().saturating_sub(reserve);
        let mut casts = if spell_cost == 0 {
            u32::MAX
        } else {
            budget / spell_cost
        };
        let mut move_points = hero.move_points();
        let mut current = hero.position();
        let mut steps = Vec::new();

        while current != target {
            if casts == 0 || move_points < DIMENSION_DOOR_MOVE_COST {
                return Vec::new();
            }
            let from = world.point_of(current);
            let to = world.point_of(target);
            let landing = if chebyshev(from, to) <= range {
                if !self.can_teleport_to(world, faction, target) {
                    return Vec::new();
                }
                target
            } else {
                match self.dimension_door_landing(world, faction, from, to, range) {
                    Some(index) => index,
                    None => return Vec::new(),
                }
            };
            steps.push(Step {
                from: current,
                to: landing,
                direction: None,
                penalty: DIMENSION_DOOR_MOVE_COST,
            });
            current = landing;
            casts -= 1;
            move_points -= DIMENSION_DOOR_MOVE_COST;
        }
        steps
    }

    pub fn min_army_strength_advantage(&self) -> f64 {
        self.min_army_strength_advantage
    }

    /// Changing the coefficient invalidates the cache: guard passability
    /// decisions depend on it.
    pub fn set_min_army_strength_advantage(&mut self, advantage: f64) {
        if self.min_army_strength_advantage == advantage {
            return;
        }
        self.min_army_strength_advantage = advantage;
        self.reset();
    }

    pub fn spell_points_reserve_ratio(&self) -> f64 {
        self.spell_points_reserve_ratio
    }

    /// Changing the ratio invalidates the cache: teleport seeding depends
    /// on the points left after the reserve.
    pub fn set_spell_points_reserve_ratio(&mut self, ratio: f64) {
        if self.spell_points_reserve_ratio == ratio {
            return;
        }
        self.spell_points_reserve_ratio = ratio;
        self.reset();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn nearest_reachable_adjacent<W: WorldMap>(&self, world: &W, target: i32) -> Option<i32> {
        if !world.is_valid_index(target) {
            return None;
        }
        let mut best: Option<(u32, i32)> = None;
        for direction in Direction::ALL {
            let Some(near) = world.neighbor(target, direction) else {
                continue;
            };
            let cost = self.cache.distance(near);
            if cost == COST_UNREACHABLE {
                continue;
            }
            if best.is_none_or(|(c, _)| cost < c) {
                best = Some((cost, near));
            }
        }
        best.map(|(_, index)| index)
    }

    fn can_teleport_to<W: WorldMap>(&self, world: &W, faction: Faction, index: i32) -> bool {
        world.is_valid_index(index)
            && !world.is_fogged(index, faction)
            && !world.is_water(index)
            && world.can_occupy(index, faction)
            && world.guard_strength(index) <= 0.0
    }

    /// Longest landable jump from `from` toward `to`, shrinking the jump
    /// until a valid landing tile is found.
    fn dimension_door_landing<W: WorldMap>(
        &self,
        world: &W,
        faction: Faction,
        from: Point,
        to: Point,
        range: i32,
    ) -> Option<i32> {
        for len in (1..=range).rev() {
            let dx = (to.x - from.x).clamp(-len, len);
            let dy = (to.y - from.y).clamp(-len, len);
            if dx == 0 && dy == 0 {
                return None;
            }
            let Some(index) = world.index_of(from.shift(dx, dy)) else {
                continue;
            };
            if self.can_teleport_to(world, faction, index) {
                return Some(index);
            }
        }
        None
    }
}

/// Teleport destinations the agent can actually afford after keeping the
/// spell-point reserve.
fn usable_teleport_targets(hero: &impl Agent, reserve_ratio: f64) -> Vec<i32> {
    let reserve = (hero.max_spell_points() as f64 * reserve_ratio) as u32;
    let available = hero.spell_points().saturating_sub(reserve);

    let mut targets = Vec::new();
    if let (Some(cost), Some(dest)) = (hero.town_gate_cost(), hero.town_gate_target()) {
        if cost <= available {
            targets.push(dest);
        }
    }
    if let Some(cost) = hero.town_portal_cost() {
        if cost <= available {
            targets.extend(hero.town_portal_targets());
        }
    }
    targets.sort_unstable();
    targets.dedup();
    targets
}
