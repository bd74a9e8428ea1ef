#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting falling blocks.

use std::time::Duration;

use maze_arcade_core::{Command, Event, TetrominoKind};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_millis(1500),
            rng_seed: 0x0b10_c5ee_d000_0001,
        }
    }
}

/// Pure system that deterministically emits block spawn commands.
#[derive(Debug)]
pub struct BlockSpawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng_state: u64,
}

impl BlockSpawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and the board width to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], columns: u32, out: &mut Vec<Command>) {
        if self.spawn_interval.is_zero() || columns == 0 {
            return;
        }

        for event in events {
            // A stage restart invalidates any partially accrued interval.
            if matches!(event, Event::StageStarted { .. }) {
                self.accumulator = Duration::ZERO;
            }
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let spawn_attempts = self.resolve_spawn_attempts();

        for _ in 0..spawn_attempts {
            let shape = self.select_shape();
            let Some(column) = self.select_column(shape, columns) else {
                continue;
            };
            out.push(Command::SpawnBlock { shape, column });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> usize {
        if self.spawn_interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= self.spawn_interval {
            self.accumulator -= self.spawn_interval;
            attempts += 1;
        }
        attempts
    }

    fn select_shape(&mut self) -> TetrominoKind {
        let value = self.advance_rng();
        TetrominoKind::ALL[(value % TetrominoKind::ALL.len() as u64) as usize]
    }

    /// Leftmost spawn column such that the whole shape fits the board.
    fn select_column(&mut self, shape: TetrominoKind, columns: u32) -> Option<u32> {
        let slots = columns.checked_sub(shape.width())?.saturating_add(1);
        let value = self.advance_rng();
        Some((value % u64::from(slots)) as u32)
    }

    fn advance_rng(&mut self) -> u64 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        self.rng_state
    }
}

impl Default for BlockSpawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
