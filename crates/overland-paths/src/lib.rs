//! Movement-range and route computation for the overland adventure map.
//!
//! This crate computes reachable destinations, least-cost routes and
//! per-tile movement costs for turn-based agents on a rectangular tile
//! grid, honoring movement-point budgets that carry over between turns,
//! terrain- and direction-dependent penalties, and mode-specific
//! passability rules:
//!
//! | Type | Rules |
//! |---|---|
//! | [`PlayerPathfinder`] | literal game legality for human-controlled heroes |
//! | [`AiPathfinder`] | risk-weighted traversal: guard bypass by army strength, boat use, fog discovery, teleport spells |
//!
//! Both policies share one exploration engine ([`NodeCache`]) through the
//! [`TraversalPolicy`] trait. A full-map relaxation runs only when the
//! cached agent snapshot diverges from the agent's live state; every path
//! and distance query afterwards is served in O(1) from the cache.

mod ai;
mod engine;
mod node;
mod player;
#[cfg(test)]
mod testworld;

pub use ai::{AiPathfinder, FogDiscovery};
pub use engine::{NodeCache, TraversalPolicy, subtract_move_points};
pub use node::{COST_UNREACHABLE, WorldNode};
pub use player::PlayerPathfinder;
