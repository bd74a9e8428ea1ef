#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that composes the HUD model for presentation sinks.

use maze_arcade_world::{query, World};

/// Read-only HUD content derived from world state.
///
/// The HUD is a pure sink: adapters render it but nothing feeds back into the
/// simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudModel {
    /// One-based stage counter.
    pub stage: u32,
    /// Coins still uncollected on the board.
    pub coins_remaining: u32,
    /// Lives remaining in the session.
    pub lives: u8,
    /// Score of the most recently completed stage, in whole seconds.
    pub last_score: Option<u64>,
    /// Whether audio output is currently muted.
    pub muted: bool,
}

impl HudModel {
    /// Single status line in the arcade's canonical format.
    #[must_use]
    pub fn line(&self) -> String {
        let sound = if self.muted { "OFF" } else { "ON" };
        match self.last_score {
            Some(score) => format!(
                "Stage: {}  Coins left: {}  Lives: {}  Score: {}s  Sound: {} (M)",
                self.stage, self.coins_remaining, self.lives, score, sound
            ),
            None => format!(
                "Stage: {}  Coins left: {}  Lives: {}  Sound: {} (M)",
                self.stage, self.coins_remaining, self.lives, sound
            ),
        }
    }
}

/// Produces HUD data required by presentation adapters.
#[derive(Debug, Default)]
pub struct Hud;

impl Hud {
    /// Derives the HUD model from the current world state.
    #[must_use]
    pub fn compose(&self, world: &World, muted: bool) -> HudModel {
        let stage = query::stage(world);
        let player = query::player(world);
        HudModel {
            stage: stage.number.get(),
            coins_remaining: query::coins_remaining(world),
            lives: player.lives.get(),
            last_score: stage.last_score,
            muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Hud, HudModel};
    use maze_arcade_world::World;

    #[test]
    fn composes_from_a_fresh_world() {
        let world = World::with_seed(1);
        let model = Hud.compose(&world, false);

        assert_eq!(model.stage, 1);
        assert_eq!(model.lives, 3);
        assert_eq!(model.coins_remaining, 10);
        assert_eq!(model.last_score, None);
        assert!(!model.muted);
    }

    #[test]
    fn line_omits_the_score_until_a_stage_is_complete() {
        let model = HudModel {
            stage: 1,
            coins_remaining: 10,
            lives: 3,
            last_score: None,
            muted: false,
        };
        assert_eq!(
            model.line(),
            "Stage: 1  Coins left: 10  Lives: 3  Sound: ON (M)"
        );
    }

    #[test]
    fn line_reports_score_and_mute_state() {
        let model = HudModel {
            stage: 3,
            coins_remaining: 2,
            lives: 1,
            last_score: Some(42),
            muted: true,
        };
        assert_eq!(
            model.line(),
            "Stage: 3  Coins left: 2  Lives: 1  Score: 42s  Sound: OFF (M)"
        );
    }
}
