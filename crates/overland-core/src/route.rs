//! Route representation produced by the pathfinders.

use crate::direction::Direction;

/// One move of a computed route.
///
/// `direction` is `Some` for ordinary adjacent moves and `None` for teleport
/// jumps (Dimension Door, Town Gate, Town Portal), whose endpoints are not
/// grid-adjacent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    pub from: i32,
    pub to: i32,
    pub direction: Option<Direction>,
    /// Movement-point cost of this step.
    pub penalty: u32,
}

/// Total movement-point penalty of an already-built route.
pub fn path_penalty(path: &[Step]) -> u32 {
    path.iter()
        .fold(0u32, |sum, step| sum.saturating_add(step.penalty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalty_sums_over_steps() {
        let path = [
            Step {
                from: 0,
                to: 1,
                direction: Some(Direction::Right),
                penalty: 100,
            },
            Step {
                from: 1,
                to: 12,
                direction: Some(Direction::BottomRight),
                penalty: 150,
            },
            Step {
                from: 12,
                to: 40,
                direction: None,
                penalty: 225,
            },
        ];
        assert_eq!(path_penalty(&path), 475);
        assert_eq!(path_penalty(&[]), 0);
    }
}
