#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy behavior system for shooters and pathfinders.
//!
//! Both policies run off the same per-enemy readiness flag exposed by the
//! world: shooters fire along an aim heading derived from the player's
//! position, pathfinders take one uniformly random step through an open wall.
//! Dispatch is an exhaustive match over [`EnemyKind`], so adding a variant
//! fails to compile until both policies are considered.

use maze_arcade_core::{
    BulletSource, Command, Direction, EnemyKind, EnemySnapshot, EnemyView, Event, Heading,
    PlayerSnapshot, WallGridView,
};

const RNG_MULTIPLIER: u64 = 6_364_136_223_846_793_005;
const RNG_INCREMENT: u64 = 1;

/// Configuration parameters required to construct the enemy system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided random seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that emits enemy fire and step commands each tick.
#[derive(Debug)]
pub struct EnemyAi {
    rng_state: u64,
}

impl EnemyAi {
    /// Creates a new enemy system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng_state: config.rng_seed,
        }
    }

    /// Consumes events and immutable views to emit enemy commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        walls: WallGridView<'_>,
        player: &PlayerSnapshot,
        out: &mut Vec<Command>,
    ) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemies.iter() {
            if !enemy.ready_for_action {
                continue;
            }

            match enemy.kind {
                EnemyKind::Shooter => {
                    let heading = self.shooter_heading(enemy, player);
                    out.push(Command::FireBullet {
                        source: BulletSource::Shooter(enemy.id),
                        heading,
                    });
                }
                EnemyKind::Pathfinder => {
                    let open = walls.open_directions(enemy.cell);
                    if open.is_empty() {
                        continue;
                    }
                    let direction = open[self.next_index(open.len())];
                    out.push(Command::StepEnemy {
                        enemy: enemy.id,
                        direction,
                    });
                }
            }
        }
    }

    /// Aim along the axis of the greater offset to the player.
    ///
    /// Equal non-zero offsets fire diagonally using both signs. An exact
    /// overlap falls back to the player's last movement heading, and a zero
    /// fallback degenerates to a uniformly random cardinal direction.
    fn shooter_heading(&mut self, enemy: &EnemySnapshot, player: &PlayerSnapshot) -> Heading {
        let delta_column = i64::from(player.cell.column()) - i64::from(enemy.cell.column());
        let delta_row = i64::from(player.cell.row()) - i64::from(enemy.cell.row());

        if delta_column.abs() > delta_row.abs() {
            return Heading::new(sign(delta_column), 0);
        }
        if delta_row.abs() > delta_column.abs() {
            return Heading::new(0, sign(delta_row));
        }

        let diagonal = Heading::new(sign(delta_column), sign(delta_row));
        if !diagonal.is_zero() {
            return diagonal;
        }

        if !player.last_move.is_zero() {
            return player.last_move;
        }

        let direction = Direction::CARDINAL[self.next_index(Direction::CARDINAL.len())];
        Heading::from_direction(direction)
    }

    fn next_index(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0, "next_index requires a non-zero bound");
        self.rng_state = self
            .rng_state
            .wrapping_mul(RNG_MULTIPLIER)
            .wrapping_add(RNG_INCREMENT);
        (self.rng_state % bound as u64) as usize
    }
}

fn sign(value: i64) -> i8 {
    match value.cmp(&0) {
        std::cmp::Ordering::Greater => 1,
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
    }
}
