//! Map objects as seen by the pathfinding engine.

/// The kind of object occupying a map tile.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectKind {
    #[default]
    None,
    Hero,
    Monster,
    Castle,
    Boat,
    Treasure,
    Resource,
    Artifact,
    Mine,
    Sawmill,
    Shrine,
    Sign,
    Stones,
    Trees,
    Other,
}

impl ObjectKind {
    /// Whether stepping onto the object triggers an interaction and ends
    /// the agent's movement for this route.
    #[inline]
    pub const fn is_action(self) -> bool {
        matches!(
            self,
            ObjectKind::Hero
                | ObjectKind::Monster
                | ObjectKind::Castle
                | ObjectKind::Boat
                | ObjectKind::Mine
                | ObjectKind::Sawmill
                | ObjectKind::Shrine
        )
    }

    /// Whether the object is consumable loot picked up in passing.
    #[inline]
    pub const fn is_pickup(self) -> bool {
        matches!(
            self,
            ObjectKind::Treasure | ObjectKind::Resource | ObjectKind::Artifact
        )
    }

    #[inline]
    pub const fn is_none(self) -> bool {
        matches!(self, ObjectKind::None)
    }
}

/// A notable object encountered along a route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexObject {
    pub index: i32,
    pub object: ObjectKind,
}
