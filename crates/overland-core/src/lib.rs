//! **overland-core** — foundational types for the overland pathfinding engine.
//!
//! This crate provides the types shared across the *overland* workspace:
//! geometry primitives, the 8-way direction set, agent identity (faction,
//! pathfinding skill), map objects, the route representation, and the narrow
//! read-only contracts ([`WorldMap`], [`Agent`]) through which the engine
//! queries the rest of the game.

pub mod agent;
pub mod direction;
pub mod geom;
pub mod object;
pub mod route;
pub mod world;

pub use agent::{Agent, Faction, PathfindingSkill};
pub use direction::Direction;
pub use geom::{Point, chebyshev, manhattan};
pub use object::{IndexObject, ObjectKind};
pub use route::{Step, path_penalty};
pub use world::{DEFAULT_GROUND_PENALTY, ROAD_PENALTY, WorldMap};
