use thiserror::Error;

use crate::types::Pos;

/// Every way a generation or trace call can fail. None of these are retried
/// internally and no partial dungeon is ever returned alongside them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DungeonError {
    /// Rejected before any grid is allocated.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Corridor or room growth found no rectangle that respects the grid
    /// margin and joins the structure it grows from.
    #[error("could not place structure #{structure_id} after {attempts} attempts")]
    PlacementExhausted { structure_id: u32, attempts: u32 },

    /// Wall relaxation was still changing cells when the pass cap was reached.
    #[error("wall classification did not settle within {passes} passes")]
    ClassificationNonTermination { passes: u32 },

    /// A corner walk ran into empty space or off the grid before reaching
    /// another corner.
    #[error("boundary trace left the wall outline at x={}, y={}", .at.x, .at.y)]
    OpenBoundary { at: Pos },
}

impl DungeonError {
    pub(crate) fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_failing_quantity() {
        let exhausted = DungeonError::PlacementExhausted { structure_id: 4, attempts: 256 };
        assert_eq!(exhausted.to_string(), "could not place structure #4 after 256 attempts");

        let open = DungeonError::OpenBoundary { at: Pos { y: 3, x: 9 } };
        assert_eq!(open.to_string(), "boundary trace left the wall outline at x=9, y=3");
    }
}
