#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns movement intents into player commands.
//!
//! The system owns the movement cadence: a step command is emitted only after
//! the cooldown for the intent's strength has elapsed, and the cooldown
//! restarts when the world confirms a successful move. Wall-blocked attempts
//! leave the cadence untouched, so the player keeps probing a wall every
//! frame without being slowed down once a passable direction is pressed.

use std::time::Duration;

use maze_arcade_core::{BulletSource, Command, Direction, Event, Heading, InputIntent};

/// Intents at or above this magnitude use the discrete-press cadence.
const FULL_STRENGTH: f32 = 1.0;

/// Configuration parameters required to construct the control system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    discrete_cooldown: Duration,
    analog_cooldown: Duration,
}

impl Config {
    /// Creates a new configuration from the two cadence intervals.
    #[must_use]
    pub const fn new(discrete_cooldown: Duration, analog_cooldown: Duration) -> Self {
        Self {
            discrete_cooldown,
            analog_cooldown,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            discrete_cooldown: Duration::from_millis(100),
            analog_cooldown: Duration::from_millis(120),
        }
    }
}

/// Pure system that emits movement and firing commands from input intents.
#[derive(Debug)]
pub struct PlayerControl {
    config: Config,
    since_last_move: Duration,
    last_aim: Direction,
}

impl PlayerControl {
    /// Creates a new control system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        // Start past both cooldowns so the very first intent acts at once.
        let warmed_up = config.discrete_cooldown.max(config.analog_cooldown);
        Self {
            config,
            since_last_move: warmed_up,
            last_aim: Direction::South,
        }
    }

    /// Consumes world events and the frame's distilled input to emit commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        intent: Option<InputIntent>,
        shoot: bool,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.since_last_move = self.since_last_move.saturating_add(*dt);
                }
                Event::PlayerMoved { .. } => {
                    self.since_last_move = Duration::ZERO;
                }
                _ => {}
            }
        }

        if let Some(intent) = intent {
            let cooldown = if intent.magnitude >= FULL_STRENGTH {
                self.config.discrete_cooldown
            } else {
                self.config.analog_cooldown
            };
            if self.since_last_move >= cooldown {
                self.last_aim = intent.direction;
                out.push(Command::MovePlayer {
                    direction: intent.direction,
                });
            }
        }

        if shoot {
            out.push(Command::FireBullet {
                source: BulletSource::Player,
                heading: Heading::from_direction(self.last_aim),
            });
        }
    }
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
