//! Bounded-retry random placement of coins and enemies at stage start.

use maze_arcade_core::{CellCoord, EnemyId, EnemyKind, Rgb, StageNumber};

use crate::rng::SplitMix64;

const COIN_LIMIT: usize = 10;
const COIN_DENSITY: f64 = 0.05;
const COIN_ATTEMPT_FACTOR: usize = 20;
const ENEMY_ATTEMPT_FACTOR: usize = 50;
const SPAWN_CLEARANCE: u32 = 5;

const SHOOTER_COLOR: Rgb = Rgb::new(0xff, 0x00, 0xff);
const PATHFINDER_COLOR: Rgb = Rgb::new(0x22, 0x8b, 0x22);

/// Enemies of each kind scheduled for the provided stage.
pub(crate) fn enemy_count_for(stage: StageNumber) -> usize {
    let scaled = 5 + stage.get().saturating_sub(1) as usize;
    scaled.max(5)
}

/// Coins scheduled for a board of the provided dimensions.
pub(crate) fn coin_count_for(columns: u32, rows: u32) -> usize {
    let cells = u64::from(columns) * u64::from(rows);
    let by_density = (cells as f64 * COIN_DENSITY).floor() as usize;
    COIN_LIMIT.min(by_density)
}

/// Scatters coins over the board, avoiding the start and goal cells.
///
/// The retry budget bounds the loop; exhausting it yields fewer coins than
/// requested, which callers accept silently.
pub(crate) fn scatter_coins(
    columns: u32,
    rows: u32,
    goal: CellCoord,
    rng: &mut SplitMix64,
) -> Vec<CellCoord> {
    let desired = coin_count_for(columns, rows);
    let mut coins: Vec<CellCoord> = Vec::with_capacity(desired);
    let mut attempts = 0;

    while coins.len() < desired && attempts < desired * COIN_ATTEMPT_FACTOR {
        attempts += 1;
        let cell = random_cell(columns, rows, rng);
        if cell == CellCoord::new(0, 0) || cell == goal {
            continue;
        }
        if coins.contains(&cell) {
            continue;
        }
        coins.push(cell);
    }

    coins
}

pub(crate) struct EnemySeed {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) cell: CellCoord,
    pub(crate) color: Rgb,
}

/// Scatters stationary shooters, keeping clear of the player's current cell.
pub(crate) fn scatter_shooters(
    columns: u32,
    rows: u32,
    goal: CellCoord,
    player: CellCoord,
    stage: StageNumber,
    next_id: &mut u32,
    rng: &mut SplitMix64,
) -> Vec<EnemySeed> {
    let desired = enemy_count_for(stage);
    let mut seeds: Vec<EnemySeed> = Vec::with_capacity(desired);
    let mut attempts = 0;

    while seeds.len() < desired && attempts < desired * ENEMY_ATTEMPT_FACTOR {
        attempts += 1;
        let cell = random_cell(columns, rows, rng);
        if cell == CellCoord::new(0, 0) || cell == goal {
            continue;
        }
        if cell.manhattan_distance(player) < SPAWN_CLEARANCE {
            continue;
        }
        seeds.push(EnemySeed {
            id: allocate_id(next_id),
            kind: EnemyKind::Shooter,
            cell,
            color: SHOOTER_COLOR,
        });
    }

    seeds
}

/// Scatters pathfinders, keeping clear of both the start and the goal.
pub(crate) fn scatter_pathfinders(
    columns: u32,
    rows: u32,
    goal: CellCoord,
    stage: StageNumber,
    next_id: &mut u32,
    rng: &mut SplitMix64,
) -> Vec<EnemySeed> {
    let desired = enemy_count_for(stage);
    let start = CellCoord::new(0, 0);
    let mut seeds: Vec<EnemySeed> = Vec::with_capacity(desired);
    let mut attempts = 0;

    while seeds.len() < desired && attempts < desired * ENEMY_ATTEMPT_FACTOR {
        attempts += 1;
        let cell = random_cell(columns, rows, rng);
        if cell.manhattan_distance(start) < SPAWN_CLEARANCE
            || cell.manhattan_distance(goal) < SPAWN_CLEARANCE
        {
            continue;
        }
        seeds.push(EnemySeed {
            id: allocate_id(next_id),
            kind: EnemyKind::Pathfinder,
            cell,
            color: PATHFINDER_COLOR,
        });
    }

    seeds
}

fn allocate_id(next_id: &mut u32) -> EnemyId {
    let id = EnemyId::new(*next_id);
    *next_id = next_id.saturating_add(1);
    id
}

fn random_cell(columns: u32, rows: u32, rng: &mut SplitMix64) -> CellCoord {
    let column = rng.next_index(columns.max(1) as usize) as u32;
    let row = rng.next_index(rows.max(1) as usize) as u32;
    CellCoord::new(column, row)
}
