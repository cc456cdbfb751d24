//! Agent identity and the hero query contract.

/// Owner of a map entity.
///
/// `NEUTRAL` marks unowned entities such as wandering monsters. Alliance and
/// hostility resolution between factions belongs to the world, not to this
/// crate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Faction(pub u8);

impl Faction {
    /// The unowned faction.
    pub const NEUTRAL: Self = Self(0);
}

/// Pathfinding skill level of an agent.
///
/// Higher levels reduce rough-terrain penalties; the reduction itself is
/// applied by the world's `ground_penalty`, which owns the terrain data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathfindingSkill {
    None,
    Basic,
    Advanced,
    #[default]
    Expert,
}

/// Read-only view of a hero-like movable entity.
///
/// The pathfinders only ever copy primitive values out of this interface;
/// they never retain a reference to the agent between calls.
pub trait Agent {
    /// Tile the agent currently occupies.
    fn position(&self) -> i32;
    fn faction(&self) -> Faction;
    /// Movement points left in the current turn.
    fn move_points(&self) -> u32;
    /// Movement points the agent regains at the start of each turn.
    fn max_move_points(&self) -> u32;
    fn pathfinding_skill(&self) -> PathfindingSkill;
    /// Total strength of the agent's army, for guard comparisons.
    fn army_strength(&self) -> f64;
    fn spell_points(&self) -> u32;
    fn max_spell_points(&self) -> u32;
    /// Whether the agent cannot pick up any more artifacts.
    fn is_inventory_full(&self) -> bool;
    /// Spell-point cost of one Dimension Door cast, `None` when unknown.
    fn dimension_door_cost(&self) -> Option<u32>;
    /// Maximum Dimension Door jump distance, in tiles.
    fn dimension_door_range(&self) -> i32;
    /// Spell-point cost of Town Gate, `None` when unknown.
    fn town_gate_cost(&self) -> Option<u32>;
    /// Spell-point cost of Town Portal, `None` when unknown.
    fn town_portal_cost(&self) -> Option<u32>;
    /// Destination tile of the Town Gate spell (nearest friendly castle).
    fn town_gate_target(&self) -> Option<i32>;
    /// Destination tiles of the Town Portal spell.
    fn town_portal_targets(&self) -> Vec<i32>;
}
