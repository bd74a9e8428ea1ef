#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that detects the win condition and requests stage advance.
//!
//! The goal check runs after movement inside the frame, so a final step onto
//! the goal cell is detected in the same frame it happens. The world
//! re-validates the condition before committing the transition, which keeps
//! a stale or duplicated request harmless.

use maze_arcade_core::{CellCoord, Command, Event};

/// Pure system that emits [`Command::AdvanceStage`] when the stage is won.
#[derive(Debug, Default)]
pub struct Progression;

impl Progression {
    /// Creates a new progression system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes events and world queries to emit the stage-advance request.
    pub fn handle(
        &self,
        events: &[Event],
        player_cell: CellCoord,
        goal_cell: CellCoord,
        coins_remaining: u32,
        out: &mut Vec<Command>,
    ) {
        let moved = events
            .iter()
            .any(|event| matches!(event, Event::PlayerMoved { .. }));
        if !moved {
            return;
        }

        if coins_remaining == 0 && player_cell == goal_cell {
            out.push(Command::AdvanceStage);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved_event() -> Vec<Event> {
        vec![Event::PlayerMoved {
            from: CellCoord::new(18, 19),
            to: CellCoord::new(19, 19),
        }]
    }

    #[test]
    fn requests_advance_when_goal_reached_with_no_coins() {
        let progression = Progression::new();
        let mut out = Vec::new();

        progression.handle(
            &moved_event(),
            CellCoord::new(19, 19),
            CellCoord::new(19, 19),
            0,
            &mut out,
        );

        assert_eq!(out, vec![Command::AdvanceStage]);
    }

    #[test]
    fn remaining_coins_block_the_advance() {
        let progression = Progression::new();
        let mut out = Vec::new();

        progression.handle(
            &moved_event(),
            CellCoord::new(19, 19),
            CellCoord::new(19, 19),
            3,
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn standing_off_the_goal_blocks_the_advance() {
        let progression = Progression::new();
        let mut out = Vec::new();

        progression.handle(
            &moved_event(),
            CellCoord::new(4, 7),
            CellCoord::new(19, 19),
            0,
            &mut out,
        );

        assert!(out.is_empty());
    }

    #[test]
    fn no_movement_means_no_request() {
        let progression = Progression::new();
        let mut out = Vec::new();

        progression.handle(
            &[],
            CellCoord::new(19, 19),
            CellCoord::new(19, 19),
            0,
            &mut out,
        );

        assert!(out.is_empty());
    }
}
