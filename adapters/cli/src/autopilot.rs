//! Scripted input source that drives headless sessions.

use glam::Vec2;
use maze_arcade_core::{Direction, Heading};
use maze_arcade_rendering::FrameInput;
use maze_arcade_world::{query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Deflection the autopilot applies when it drives through the stick path.
const STICK_STRENGTH: f32 = 0.9;

/// Deterministic wanderer that feeds the session plausible frame input.
///
/// It holds a direction for a handful of frames, re-targets among the open
/// walls of the player's cell, fires occasionally, and alternates between
/// the keyboard and the analog-stick input paths so both are exercised.
#[derive(Debug)]
pub(crate) struct Autopilot {
    rng: ChaCha8Rng,
    held: Option<Direction>,
    frames_until_retarget: u32,
}

impl Autopilot {
    pub(crate) fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: None,
            frames_until_retarget: 0,
        }
    }

    pub(crate) fn frame_input(&mut self, world: &World) -> FrameInput {
        if self.frames_until_retarget == 0 {
            let player = query::player(world);
            let open = query::wall_view(world).open_directions(player.cell);
            self.held = if open.is_empty() {
                None
            } else {
                Some(open[self.rng.gen_range(0..open.len())])
            };
            self.frames_until_retarget = self.rng.gen_range(4..18);
        } else {
            self.frames_until_retarget -= 1;
        }

        let mut input = FrameInput {
            shoot: self.rng.gen_ratio(1, 40),
            ..FrameInput::default()
        };

        if let Some(direction) = self.held {
            if self.rng.gen_ratio(1, 4) {
                let heading = Heading::from_direction(direction);
                input.stick = Some(Vec2::new(
                    f32::from(heading.dx()) * STICK_STRENGTH,
                    f32::from(heading.dy()) * STICK_STRENGTH,
                ));
            } else {
                match direction {
                    Direction::North => input.up = true,
                    Direction::South => input.down = true,
                    Direction::West => input.left = true,
                    Direction::East => input.right = true,
                }
            }
        }

        input
    }
}
