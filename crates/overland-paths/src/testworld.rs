//! Shared mock world and agent for the pathfinder tests.

use overland_core::{
    Agent, DEFAULT_GROUND_PENALTY, Direction, Faction, ObjectKind, PathfindingSkill, WorldMap,
};

/// One tile of the mock world; fields mirror the [`WorldMap`] queries.
pub(crate) struct MockTile {
    pub ground: u32,
    pub road: bool,
    pub water: bool,
    pub passable: bool,
    pub object: ObjectKind,
    pub guard: f64,
    pub fogged: bool,
    pub accessible: bool,
    pub blocked_for_ai: bool,
}

impl Default for MockTile {
    fn default() -> Self {
        Self {
            ground: DEFAULT_GROUND_PENALTY,
            road: false,
            water: false,
            passable: true,
            object: ObjectKind::None,
            guard: 0.0,
            fogged: false,
            accessible: true,
            blocked_for_ai: false,
        }
    }
}

pub(crate) struct MockWorld {
    width: i32,
    height: i32,
    tiles: Vec<MockTile>,
}

impl MockWorld {
    pub fn new(width: i32, height: i32) -> Self {
        let mut tiles = Vec::new();
        tiles.resize_with((width * height) as usize, MockTile::default);
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn uniform(width: i32, height: i32, ground: u32) -> Self {
        let mut world = Self::new(width, height);
        for tile in &mut world.tiles {
            tile.ground = ground;
        }
        world
    }

    pub fn tile_mut(&mut self, index: i32) -> &mut MockTile {
        &mut self.tiles[index as usize]
    }
}

impl WorldMap for MockWorld {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn ground_penalty(&self, index: i32, _skill: PathfindingSkill) -> u32 {
        self.tiles[index as usize].ground
    }

    fn is_road(&self, index: i32) -> bool {
        self.tiles[index as usize].road
    }

    fn is_water(&self, index: i32) -> bool {
        self.tiles[index as usize].water
    }

    fn object(&self, index: i32) -> ObjectKind {
        self.tiles[index as usize].object
    }

    fn is_passable(&self, _from: i32, to: i32, _direction: Direction) -> bool {
        self.tiles[to as usize].passable
    }

    fn is_fogged(&self, index: i32, _faction: Faction) -> bool {
        self.tiles[index as usize].fogged
    }

    fn is_accessible_for_player(&self, index: i32, _faction: Faction) -> bool {
        self.tiles[index as usize].accessible
    }

    fn can_occupy(&self, index: i32, _faction: Faction) -> bool {
        self.tiles[index as usize].passable
    }

    fn guard_strength(&self, index: i32) -> f64 {
        self.tiles[index as usize].guard
    }

    fn is_tile_blocked_for_ai(&self, index: i32, _faction: Faction) -> bool {
        self.tiles[index as usize].blocked_for_ai
    }
}

/// A hero with every attribute spelled out, for snapshot-diff tests.
#[derive(Clone)]
pub(crate) struct MockHero {
    pub position: i32,
    pub faction: Faction,
    pub move_points: u32,
    pub max_move_points: u32,
    pub skill: PathfindingSkill,
    pub army_strength: f64,
    pub spell_points: u32,
    pub max_spell_points: u32,
    pub inventory_full: bool,
    pub dimension_door_cost: Option<u32>,
    pub dimension_door_range: i32,
    pub town_gate_cost: Option<u32>,
    pub town_gate_target: Option<i32>,
    pub town_portal_cost: Option<u32>,
    pub town_portal_targets: Vec<i32>,
}

impl Default for MockHero {
    fn default() -> Self {
        Self {
            position: 0,
            faction: Faction(1),
            move_points: 1000,
            max_move_points: 1000,
            skill: PathfindingSkill::Expert,
            army_strength: 0.0,
            spell_points: 0,
            max_spell_points: 0,
            inventory_full: false,
            dimension_door_cost: None,
            dimension_door_range: 0,
            town_gate_cost: None,
            town_gate_target: None,
            town_portal_cost: None,
            town_portal_targets: Vec::new(),
        }
    }
}

impl Agent for MockHero {
    fn position(&self) -> i32 {
        self.position
    }

    fn faction(&self) -> Faction {
        self.faction
    }

    fn move_points(&self) -> u32 {
        self.move_points
    }

    fn max_move_points(&self) -> u32 {
        self.max_move_points
    }

    fn pathfinding_skill(&self) -> PathfindingSkill {
        self.skill
    }

    fn army_strength(&self) -> f64 {
        self.army_strength
    }

    fn spell_points(&self) -> u32 {
        self.spell_points
    }

    fn max_spell_points(&self) -> u32 {
        self.max_spell_points
    }

    fn is_inventory_full(&self) -> bool {
        self.inventory_full
    }

    fn dimension_door_cost(&self) -> Option<u32> {
        self.dimension_door_cost
    }

    fn dimension_door_range(&self) -> i32 {
        self.dimension_door_range
    }

    fn town_gate_cost(&self) -> Option<u32> {
        self.town_gate_cost
    }

    fn town_portal_cost(&self) -> Option<u32> {
        self.town_portal_cost
    }

    fn town_gate_target(&self) -> Option<i32> {
        self.town_gate_target
    }

    fn town_portal_targets(&self) -> Vec<i32> {
        self.town_portal_targets.clone()
    }
}
