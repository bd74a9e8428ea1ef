#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Maze Arcade.
//!
//! The world owns the maze, the player, and every transient entity. Adapters
//! and systems never mutate it directly: all changes flow through [`apply`],
//! which executes one [`Command`] at a time and reports the resulting
//! [`Event`] values. Collection removal always runs as a copy-then-filter or
//! collect-then-remove pass so hit detection never skips elements.

mod maze;
mod rng;
mod scatter;

use std::time::Duration;

use maze_arcade_core::{
    BlockId, BulletId, BulletOwner, BulletSource, CellCoord, Command, Direction, EnemyId,
    EnemyKind, Event, Heading, HitCause, Lives, PixelPoint, Rgb, StageNumber, TetrominoKind,
    ViewportSize, WELCOME_BANNER,
};

use crate::maze::MazeGrid;
use crate::rng::{stage_seed, SplitMix64};
use crate::scatter::{scatter_coins, scatter_pathfinders, scatter_shooters};

const SESSION_SEED: u64 = 0x51c3_9a6f_00b4_d7e2;

const DEFAULT_COLUMNS: u32 = 20;
const DEFAULT_ROWS: u32 = 20;
const DEFAULT_VIEWPORT: ViewportSize = ViewportSize::new(960.0, 960.0);

const MIN_DIMENSION: u32 = 2;
const MAX_DIMENSION: u32 = 80;
const STAGE_GROWTH: u32 = 5;

const SHOOTER_FIRE_QUANTUM: Duration = Duration::from_millis(1200);
const PATHFINDER_STEP_QUANTUM: Duration = Duration::from_millis(400);

/// Bullet travel speed in pixel units per second (5 px per 60 fps frame).
const BULLET_SPEED: f32 = 300.0;
/// Block descent speed in pixel units per second (2 px per 60 fps frame).
const BLOCK_FALL_SPEED: f32 = 120.0;
/// Bullet-to-enemy kill radius as a fraction of the cell size.
const ENEMY_HIT_RADIUS: f32 = 0.5;

/// Describes the discrete board layout of the active stage.
#[derive(Clone, Copy, Debug)]
pub struct Board {
    columns: u32,
    rows: u32,
    cell_size: f32,
}

impl Board {
    const fn new(columns: u32, rows: u32, cell_size: f32) -> Self {
        Self {
            columns,
            rows,
            cell_size,
        }
    }

    /// Number of columns contained in the board.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the board.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square cell expressed in pixel units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Total width of the board measured in pixel units.
    #[must_use]
    pub fn pixel_width(&self) -> f32 {
        self.columns as f32 * self.cell_size
    }

    /// Total height of the board measured in pixel units.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        self.rows as f32 * self.cell_size
    }

    /// Pixel-space center of the provided cell.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> PixelPoint {
        PixelPoint::new(
            cell.column() as f32 * self.cell_size + self.cell_size * 0.5,
            cell.row() as f32 * self.cell_size + self.cell_size * 0.5,
        )
    }
}

/// Represents the authoritative Maze Arcade world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    board: Board,
    viewport: ViewportSize,
    maze: MazeGrid,
    player: Player,
    goal: CellCoord,
    coins: Vec<CellCoord>,
    bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    blocks: Vec<Block>,
    trail: TrailMask,
    stage: StageNumber,
    stage_clock: Duration,
    last_score: Option<u64>,
    session_seed: u64,
    next_bullet_id: u32,
    next_block_id: u32,
}

impl World {
    /// Creates a new Maze Arcade world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(SESSION_SEED)
    }

    /// Creates a new world whose generation derives from the provided seed.
    #[must_use]
    pub fn with_seed(session_seed: u64) -> Self {
        let cell_size = DEFAULT_VIEWPORT.cell_size_for(DEFAULT_COLUMNS, DEFAULT_ROWS);
        let mut world = Self {
            banner: WELCOME_BANNER,
            board: Board::new(DEFAULT_COLUMNS, DEFAULT_ROWS, cell_size),
            viewport: DEFAULT_VIEWPORT,
            maze: MazeGrid::empty(),
            player: Player::at_start(),
            goal: CellCoord::new(DEFAULT_COLUMNS - 1, DEFAULT_ROWS - 1),
            coins: Vec::new(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            blocks: Vec::new(),
            trail: TrailMask::default(),
            stage: StageNumber::FIRST,
            stage_clock: Duration::ZERO,
            last_score: None,
            session_seed,
            next_bullet_id: 0,
            next_block_id: 0,
        };
        let mut discarded = Vec::new();
        world.init_stage(&mut discarded);
        world
    }

    /// Rebuilds the maze and every per-stage entity for the active stage.
    fn init_stage(&mut self, out_events: &mut Vec<Event>) {
        let columns = self.board.columns();
        let rows = self.board.rows();
        let mut rng = SplitMix64::new(stage_seed(self.session_seed, self.stage.get()));

        self.maze = MazeGrid::carve(columns, rows, &mut rng);
        self.goal = CellCoord::new(columns.saturating_sub(1), rows.saturating_sub(1));
        self.player.cell = CellCoord::new(0, 0);
        self.player.lives = Lives::INITIAL;
        self.trail.reset(columns, rows);
        self.trail.mark(self.player.cell);
        self.bullets.clear();
        self.blocks.clear();
        self.stage_clock = Duration::ZERO;

        self.coins = scatter_coins(columns, rows, self.goal, &mut rng);

        let mut next_enemy_id = 0;
        let mut enemies: Vec<Enemy> = Vec::new();
        for seed in scatter_shooters(
            columns,
            rows,
            self.goal,
            self.player.cell,
            self.stage,
            &mut next_enemy_id,
            &mut rng,
        ) {
            enemies.push(Enemy::from_seed(seed, Duration::ZERO));
        }
        // Pathfinders start with a full quantum so their first poll acts
        // immediately; shooters wait out a whole interval before firing.
        for seed in scatter_pathfinders(
            columns,
            rows,
            self.goal,
            self.stage,
            &mut next_enemy_id,
            &mut rng,
        ) {
            enemies.push(Enemy::from_seed(seed, PATHFINDER_STEP_QUANTUM));
        }
        self.enemies = enemies;

        out_events.push(Event::StageStarted {
            stage: self.stage,
            columns,
            rows,
        });
    }

    /// Applies the hit effect: one life lost, player recalled to the origin,
    /// trail and transient projectiles wiped. Enemies are left untouched.
    fn player_hit(&mut self, cause: HitCause, out_events: &mut Vec<Event>) {
        self.player.lives = self.player.lives.lose_one();
        self.player.cell = CellCoord::new(0, 0);
        self.trail.clear();
        self.trail.mark(self.player.cell);
        self.bullets.clear();
        self.blocks.clear();
        out_events.push(Event::PlayerHit {
            cause,
            lives: self.player.lives,
        });
    }

    fn handle_move_player(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        // The attempted direction becomes the aim direction even when the
        // step is rejected by a wall.
        self.player.last_aim = direction;

        let Some(walls) = self.maze.walls(self.player.cell) else {
            return;
        };
        if !walls.is_open(direction) {
            out_events.push(Event::MovementBlocked { direction });
            return;
        }
        let Some(next) =
            self.player
                .cell
                .neighbor(direction, self.board.columns(), self.board.rows())
        else {
            out_events.push(Event::MovementBlocked { direction });
            return;
        };

        let from = self.player.cell;
        self.player.cell = next;
        self.player.last_move = Heading::from_direction(direction);
        self.trail.mark(next);
        out_events.push(Event::PlayerMoved { from, to: next });

        if let Some(index) = self.coins.iter().position(|coin| *coin == next) {
            let _ = self.coins.remove(index);
            out_events.push(Event::CoinCollected {
                cell: next,
                remaining: self.coins.len() as u32,
            });
        }
    }

    fn handle_fire_bullet(
        &mut self,
        source: BulletSource,
        heading: Heading,
        out_events: &mut Vec<Event>,
    ) {
        let origin = match source {
            BulletSource::Player => self.board.cell_center(self.player.cell),
            BulletSource::Shooter(enemy_id) => {
                let Some(enemy) = self
                    .enemies
                    .iter_mut()
                    .find(|enemy| enemy.id == enemy_id && enemy.kind == EnemyKind::Shooter)
                else {
                    return;
                };
                // The interval restarts whenever the shooter takes its turn,
                // even when the aim resolves to nothing.
                enemy.accumulator = Duration::ZERO;
                self.board.cell_center(enemy.cell)
            }
        };

        if heading.is_zero() {
            return;
        }

        let id = BulletId::new(self.next_bullet_id);
        self.next_bullet_id = self.next_bullet_id.wrapping_add(1);
        let owner = source.owner();
        self.bullets.push(Bullet {
            id,
            owner,
            position: origin,
            heading,
        });
        out_events.push(Event::BulletFired {
            bullet: id,
            owner,
            origin,
            heading,
        });
    }

    fn handle_step_enemy(
        &mut self,
        enemy_id: EnemyId,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self
            .enemies
            .iter()
            .position(|enemy| enemy.id == enemy_id && enemy.kind == EnemyKind::Pathfinder)
        else {
            return;
        };

        // The cooldown restarts on every attempt, moved or not.
        self.enemies[index].accumulator = Duration::ZERO;

        let from = self.enemies[index].cell;
        let Some(walls) = self.maze.walls(from) else {
            return;
        };
        if !walls.is_open(direction) {
            return;
        }
        let Some(next) = from.neighbor(direction, self.board.columns(), self.board.rows()) else {
            return;
        };

        self.enemies[index].cell = next;
        out_events.push(Event::EnemyStepped {
            enemy: enemy_id,
            from,
            to: next,
        });
    }

    fn handle_spawn_block(
        &mut self,
        shape: TetrominoKind,
        column: u32,
        out_events: &mut Vec<Event>,
    ) {
        if column.saturating_add(shape.width()) > self.board.columns() {
            return;
        }

        let id = BlockId::new(self.next_block_id);
        self.next_block_id = self.next_block_id.wrapping_add(1);
        self.blocks.push(Block {
            id,
            shape,
            column,
            offset_y: -(shape.height() as f32) * self.board.cell_size(),
        });
        out_events.push(Event::BlockSpawned {
            block: id,
            shape,
            column,
        });
    }

    fn handle_advance_stage(&mut self, out_events: &mut Vec<Event>) {
        if self.player.cell != self.goal || !self.coins.is_empty() {
            return;
        }

        let score = self.stage_clock.as_secs();
        self.last_score = Some(score);
        out_events.push(Event::StageCompleted {
            stage: self.stage,
            score_seconds: score,
        });

        self.stage = self.stage.next();
        let columns = (self.board.columns() + STAGE_GROWTH).min(MAX_DIMENSION);
        let rows = (self.board.rows() + STAGE_GROWTH).min(MAX_DIMENSION);
        let cell_size = self.viewport.cell_size_for(columns, rows);
        self.board = Board::new(columns, rows, cell_size);
        self.init_stage(out_events);
    }

    fn update_blocks(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let descent = BLOCK_FALL_SPEED * dt.as_secs_f32();
        for block in &mut self.blocks {
            block.offset_y += descent;
        }

        let bottom = self.board.pixel_height();
        let expired: Vec<BlockId> = self
            .blocks
            .iter()
            .filter(|block| block.offset_y > bottom)
            .map(|block| block.id)
            .collect();
        if !expired.is_empty() {
            self.blocks.retain(|block| !expired.contains(&block.id));
            for block in expired {
                out_events.push(Event::BlockExpired { block });
            }
        }

        let cell_size = self.board.cell_size();
        let player_x = self.player.cell.column() as f32 * cell_size;
        let player_y = self.player.cell.row() as f32 * cell_size;
        let hit = self
            .blocks
            .iter()
            .rev()
            .any(|block| block.overlaps_cell_rect(player_x, player_y, cell_size));
        if hit {
            self.player_hit(HitCause::FallingBlock, out_events);
        }
    }

    fn resolve_pathfinder_contact(&mut self, out_events: &mut Vec<Event>) {
        let pathfinders: Vec<EnemyId> = self
            .enemies
            .iter()
            .filter(|enemy| enemy.kind == EnemyKind::Pathfinder)
            .map(|enemy| enemy.id)
            .collect();

        // Contact re-triggers on every tick the overlap persists; an earlier
        // hit in the same pass recalls the player, so later enemies compare
        // against the updated cell.
        for enemy_id in pathfinders {
            let overlapping = self
                .enemies
                .iter()
                .find(|enemy| enemy.id == enemy_id)
                .map_or(false, |enemy| enemy.cell == self.player.cell);
            if overlapping {
                self.player_hit(HitCause::EnemyContact, out_events);
            }
        }
    }

    fn update_bullets(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let step = BULLET_SPEED * dt.as_secs_f32();
        for bullet in &mut self.bullets {
            bullet.position.x += f32::from(bullet.heading.dx()) * step;
            bullet.position.y += f32::from(bullet.heading.dy()) * step;
        }

        let width = self.board.pixel_width();
        let height = self.board.pixel_height();
        let cell_size = self.board.cell_size();

        let drained: Vec<Bullet> = std::mem::take(&mut self.bullets);
        let mut survivors: Vec<Bullet> = Vec::with_capacity(drained.len());
        let mut destroyed: Vec<EnemyId> = Vec::new();
        let mut hit_cause: Option<HitCause> = None;

        for bullet in drained {
            let position = bullet.position;
            if position.x < 0.0 || position.y < 0.0 || position.x > width || position.y > height {
                out_events.push(Event::BulletExpired { bullet: bullet.id });
                continue;
            }

            match bullet.owner {
                BulletOwner::Enemy => {
                    if nearest_cell(position, cell_size) == Some(self.player.cell) {
                        hit_cause = Some(HitCause::EnemyBullet);
                        break;
                    }
                    survivors.push(bullet);
                }
                BulletOwner::Player => {
                    match self.first_enemy_in_radius(position, cell_size, &destroyed) {
                        Some((enemy, kind)) => {
                            destroyed.push(enemy);
                            out_events.push(Event::EnemyDestroyed {
                                enemy,
                                kind,
                                bullet: bullet.id,
                            });
                        }
                        None => survivors.push(bullet),
                    }
                }
            }
        }

        if !destroyed.is_empty() {
            self.enemies.retain(|enemy| !destroyed.contains(&enemy.id));
        }

        match hit_cause {
            // The hit wipes every bullet, including unprocessed survivors.
            Some(cause) => self.player_hit(cause, out_events),
            None => self.bullets = survivors,
        }
    }

    /// First living enemy within kill radius, shooters checked before
    /// pathfinders, skipping enemies already consumed by this pass.
    fn first_enemy_in_radius(
        &self,
        position: PixelPoint,
        cell_size: f32,
        destroyed: &[EnemyId],
    ) -> Option<(EnemyId, EnemyKind)> {
        let radius = cell_size * ENEMY_HIT_RADIUS;
        for kind in [EnemyKind::Shooter, EnemyKind::Pathfinder] {
            for enemy in self.enemies.iter().filter(|enemy| enemy.kind == kind) {
                if destroyed.contains(&enemy.id) {
                    continue;
                }
                if position.distance_to(self.board.cell_center(enemy.cell)) < radius {
                    return Some((enemy.id, enemy.kind));
                }
            }
        }
        None
    }

    fn advance_enemy_timers(&mut self, dt: Duration) {
        for enemy in &mut self.enemies {
            enemy.accumulator = enemy.accumulator.saturating_add(dt);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBoard {
            columns,
            rows,
            viewport,
        } => {
            let columns = columns.clamp(MIN_DIMENSION, MAX_DIMENSION);
            let rows = rows.clamp(MIN_DIMENSION, MAX_DIMENSION);
            world.viewport = viewport;
            world.board = Board::new(columns, rows, viewport.cell_size_for(columns, rows));
            world.stage = StageNumber::FIRST;
            world.last_score = None;
            world.player = Player::at_start();
            world.init_stage(out_events);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            world.stage_clock = world.stage_clock.saturating_add(dt);
            world.update_blocks(dt, out_events);
            world.resolve_pathfinder_contact(out_events);
            world.update_bullets(dt, out_events);
            world.advance_enemy_timers(dt);
        }
        Command::MovePlayer { direction } => world.handle_move_player(direction, out_events),
        Command::FireBullet { source, heading } => {
            world.handle_fire_bullet(source, heading, out_events)
        }
        Command::StepEnemy { enemy, direction } => {
            world.handle_step_enemy(enemy, direction, out_events)
        }
        Command::SpawnBlock { shape, column } => {
            world.handle_spawn_block(shape, column, out_events)
        }
        Command::AdvanceStage => world.handle_advance_stage(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use maze_arcade_core::{
        BlockSnapshot, BlockView, BulletSnapshot, BulletView, CellCoord, EnemySnapshot, EnemyView,
        PlayerSnapshot, StageSnapshot, WallGridView,
    };

    use super::{Board, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the board layout of the active stage.
    #[must_use]
    pub fn board(world: &World) -> &Board {
        &world.board
    }

    /// Exposes a read-only view of the maze wall grid.
    #[must_use]
    pub fn wall_view(world: &World) -> WallGridView<'_> {
        world.maze.view()
    }

    /// Captures the player's current state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.cell,
            lives: world.player.lives,
            last_move: world.player.last_move,
            last_aim: world.player.last_aim,
        }
    }

    /// Cell the goal occupies for the active stage.
    #[must_use]
    pub fn goal_cell(world: &World) -> CellCoord {
        world.goal
    }

    /// Cells still holding uncollected coins.
    #[must_use]
    pub fn coins(world: &World) -> &[CellCoord] {
        &world.coins
    }

    /// Number of coins still uncollected on the board.
    #[must_use]
    pub fn coins_remaining(world: &World) -> u32 {
        world.coins.len() as u32
    }

    /// Captures a read-only view of the enemies inhabiting the maze.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                cell: enemy.cell,
                color: enemy.color,
                ready_for_action: enemy.ready_for_action(),
                accumulated: enemy.accumulator,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the bullets in flight.
    #[must_use]
    pub fn bullet_view(world: &World) -> BulletView {
        let snapshots: Vec<BulletSnapshot> = world
            .bullets
            .iter()
            .map(|bullet| BulletSnapshot {
                id: bullet.id,
                owner: bullet.owner,
                position: bullet.position,
                heading: bullet.heading,
            })
            .collect();
        BulletView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the falling blocks.
    #[must_use]
    pub fn block_view(world: &World) -> BlockView {
        let snapshots: Vec<BlockSnapshot> = world
            .blocks
            .iter()
            .map(|block| BlockSnapshot {
                id: block.id,
                shape: block.shape,
                column: block.column,
                offset_y: block.offset_y,
            })
            .collect();
        BlockView::from_snapshots(snapshots)
    }

    /// Cells the player visited since the last reset, for trail rendering.
    #[must_use]
    pub fn trail_cells(world: &World) -> Vec<CellCoord> {
        world.trail.marked_cells()
    }

    /// Captures the stage counters and board sizing of the active stage.
    #[must_use]
    pub fn stage(world: &World) -> StageSnapshot {
        StageSnapshot {
            number: world.stage,
            columns: world.board.columns(),
            rows: world.board.rows(),
            cell_size: world.board.cell_size(),
            elapsed: world.stage_clock,
            last_score: world.last_score,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Player {
    cell: CellCoord,
    lives: Lives,
    last_move: Heading,
    last_aim: Direction,
}

impl Player {
    fn at_start() -> Self {
        Self {
            cell: CellCoord::new(0, 0),
            lives: Lives::INITIAL,
            last_move: Heading::new(0, 1),
            last_aim: Direction::South,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    cell: CellCoord,
    color: Rgb,
    accumulator: Duration,
}

impl Enemy {
    fn from_seed(seed: scatter::EnemySeed, accumulator: Duration) -> Self {
        Self {
            id: seed.id,
            kind: seed.kind,
            cell: seed.cell,
            color: seed.color,
            accumulator,
        }
    }

    fn quantum(&self) -> Duration {
        match self.kind {
            EnemyKind::Shooter => SHOOTER_FIRE_QUANTUM,
            EnemyKind::Pathfinder => PATHFINDER_STEP_QUANTUM,
        }
    }

    fn ready_for_action(&self) -> bool {
        self.accumulator >= self.quantum()
    }
}

#[derive(Clone, Copy, Debug)]
struct Bullet {
    id: BulletId,
    owner: BulletOwner,
    position: PixelPoint,
    heading: Heading,
}

#[derive(Clone, Copy, Debug)]
struct Block {
    id: BlockId,
    shape: TetrominoKind,
    column: u32,
    offset_y: f32,
}

impl Block {
    /// Axis-aligned overlap test between the shape's occupied sub-cells and
    /// one cell-sized rectangle.
    fn overlaps_cell_rect(&self, rect_x: f32, rect_y: f32, cell_size: f32) -> bool {
        let base_x = self.column as f32 * cell_size;
        for (row_index, row) in self.shape.mask().iter().enumerate() {
            for (column_index, occupied) in row.iter().enumerate() {
                if !occupied {
                    continue;
                }
                let x = base_x + column_index as f32 * cell_size;
                let y = self.offset_y + row_index as f32 * cell_size;
                if rect_x < x + cell_size
                    && rect_x + cell_size > x
                    && rect_y < y + cell_size
                    && rect_y + cell_size > y
                {
                    return true;
                }
            }
        }
        false
    }
}

#[derive(Clone, Debug, Default)]
struct TrailMask {
    columns: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl TrailMask {
    fn reset(&mut self, columns: u32, rows: u32) {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.columns = columns;
        self.rows = rows;
        self.cells = vec![false; capacity];
    }

    fn clear(&mut self) {
        self.cells.fill(false);
    }

    fn mark(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = true;
        }
    }

    fn marked_cells(&self) -> Vec<CellCoord> {
        let mut marked = Vec::new();
        for row in 0..self.rows {
            for column in 0..self.columns {
                let cell = CellCoord::new(column, row);
                if self.index(cell).map_or(false, |index| self.cells[index]) {
                    marked.push(cell);
                }
            }
        }
        marked
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

fn nearest_cell(position: PixelPoint, cell_size: f32) -> Option<CellCoord> {
    if cell_size <= 0.0 || position.x < 0.0 || position.y < 0.0 {
        return None;
    }
    let column = (position.x / cell_size).floor();
    let row = (position.y / cell_size).floor();
    Some(CellCoord::new(column as u32, row as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticked(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn open_direction_from_start(world: &World) -> Direction {
        let view = query::wall_view(world);
        view.open_directions(CellCoord::new(0, 0))
            .first()
            .copied()
            .expect("start cell of a connected maze has an open direction")
    }

    #[test]
    fn configure_board_starts_the_first_stage() {
        let mut world = World::with_seed(11);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ConfigureBoard {
                columns: 20,
                rows: 20,
                viewport: ViewportSize::new(1000.0, 1000.0),
            },
            &mut events,
        );

        assert!(matches!(
            events.first(),
            Some(Event::StageStarted { columns: 20, rows: 20, .. })
        ));
        let stage = query::stage(&world);
        assert_eq!(stage.number, StageNumber::FIRST);
        assert_eq!(query::player(&world).cell, CellCoord::new(0, 0));
        assert_eq!(query::player(&world).lives, Lives::INITIAL);
        assert_eq!(query::coins_remaining(&world), 10);
        assert_eq!(query::enemy_view(&world).into_vec().len(), 10);
    }

    #[test]
    fn generation_is_deterministic_for_the_same_seed() {
        let first = World::with_seed(0xbeef);
        let second = World::with_seed(0xbeef);

        assert_eq!(query::coins(&first), query::coins(&second));
        let first_enemies = query::enemy_view(&first).into_vec();
        let second_enemies = query::enemy_view(&second).into_vec();
        assert_eq!(first_enemies, second_enemies);
        for row in 0..20 {
            for column in 0..20 {
                let cell = CellCoord::new(column, row);
                assert_eq!(
                    query::wall_view(&first).walls(cell),
                    query::wall_view(&second).walls(cell)
                );
            }
        }
    }

    #[test]
    fn walled_movement_is_rejected_without_state_change() {
        let mut world = World::with_seed(5);
        let mut events = Vec::new();

        // The outer perimeter guarantees a wall to the north of the start.
        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::North,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::MovementBlocked {
                direction: Direction::North
            }]
        );
        assert_eq!(query::player(&world).cell, CellCoord::new(0, 0));
    }

    #[test]
    fn blocked_attempts_still_update_the_aim_direction() {
        let mut world = World::with_seed(5);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MovePlayer {
                direction: Direction::North,
            },
            &mut events,
        );

        assert_eq!(query::player(&world).last_aim, Direction::North);
        assert_eq!(query::player(&world).last_move, Heading::new(0, 1));
    }

    #[test]
    fn open_movement_advances_and_marks_the_trail() {
        let mut world = World::with_seed(21);
        let direction = open_direction_from_start(&world);
        let mut events = Vec::new();

        apply(&mut world, Command::MovePlayer { direction }, &mut events);

        let expected = CellCoord::new(0, 0)
            .neighbor(direction, 20, 20)
            .expect("open direction has a neighbor");
        assert_eq!(query::player(&world).cell, expected);
        assert_eq!(
            query::player(&world).last_move,
            Heading::from_direction(direction)
        );
        assert!(query::trail_cells(&world).contains(&expected));
        assert!(events.contains(&Event::PlayerMoved {
            from: CellCoord::new(0, 0),
            to: expected
        }));
    }

    #[test]
    fn coins_are_collected_exactly_once() {
        let mut world = World::with_seed(21);
        let direction = open_direction_from_start(&world);
        let target = CellCoord::new(0, 0)
            .neighbor(direction, 20, 20)
            .expect("neighbor");
        world.coins = vec![target];

        let mut events = Vec::new();
        apply(&mut world, Command::MovePlayer { direction }, &mut events);
        assert!(events.contains(&Event::CoinCollected {
            cell: target,
            remaining: 0
        }));
        assert_eq!(query::coins_remaining(&world), 0);

        // Walking back onto the same cell collects nothing further.
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::MovePlayer {
                direction: direction.opposite(),
            },
            &mut events,
        );
        apply(&mut world, Command::MovePlayer { direction }, &mut events);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::CoinCollected { .. })));
    }

    #[test]
    fn pathfinder_contact_hits_on_every_tick_of_overlap() {
        let mut world = World::with_seed(9);
        world.enemies = vec![Enemy {
            id: EnemyId::new(0),
            kind: EnemyKind::Pathfinder,
            cell: CellCoord::new(0, 0),
            color: Rgb::new(0x22, 0x8b, 0x22),
            accumulator: Duration::ZERO,
        }];

        let events = ticked(&mut world, 16);
        assert!(events.contains(&Event::PlayerHit {
            cause: HitCause::EnemyContact,
            lives: Lives::new(2)
        }));

        // The enemy still camps the origin, so the next tick hits again.
        let events = ticked(&mut world, 16);
        assert!(events.contains(&Event::PlayerHit {
            cause: HitCause::EnemyContact,
            lives: Lives::new(1)
        }));
        assert_eq!(query::enemy_view(&world).into_vec().len(), 1);
    }

    #[test]
    fn player_hit_resets_transient_state_but_not_enemies() {
        let mut world = World::with_seed(17);
        world.enemies = vec![
            Enemy {
                id: EnemyId::new(0),
                kind: EnemyKind::Shooter,
                cell: CellCoord::new(7, 7),
                color: Rgb::new(0xff, 0x00, 0xff),
                accumulator: Duration::ZERO,
            },
            Enemy {
                id: EnemyId::new(1),
                kind: EnemyKind::Pathfinder,
                cell: CellCoord::new(0, 0),
                color: Rgb::new(0x22, 0x8b, 0x22),
                accumulator: Duration::ZERO,
            },
        ];
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBlock {
                shape: TetrominoKind::I,
                column: 3,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::FireBullet {
                source: BulletSource::Player,
                heading: Heading::new(1, 0),
            },
            &mut events,
        );

        let events = ticked(&mut world, 16);

        assert!(events.contains(&Event::PlayerHit {
            cause: HitCause::EnemyContact,
            lives: Lives::new(2)
        }));
        assert_eq!(query::player(&world).cell, CellCoord::new(0, 0));
        assert!(query::bullet_view(&world).into_vec().is_empty());
        assert!(query::block_view(&world).into_vec().is_empty());
        assert_eq!(query::enemy_view(&world).into_vec().len(), 2);
        assert_eq!(query::trail_cells(&world), vec![CellCoord::new(0, 0)]);
    }

    #[test]
    fn player_bullet_removes_the_first_shooter_in_range() {
        let mut world = World::with_seed(33);
        world.player.cell = CellCoord::new(2, 2);
        world.enemies = vec![Enemy {
            id: EnemyId::new(0),
            kind: EnemyKind::Shooter,
            cell: CellCoord::new(4, 2),
            color: Rgb::new(0xff, 0x00, 0xff),
            accumulator: Duration::ZERO,
        }];
        world.coins.clear();
        let lives_before = query::player(&world).lives;

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireBullet {
                source: BulletSource::Player,
                heading: Heading::new(1, 0),
            },
            &mut events,
        );
        assert_eq!(query::bullet_view(&world).into_vec().len(), 1);

        // Two 100 ms ticks cover the two-cell gap at bullet speed.
        let mut all_events = ticked(&mut world, 100);
        all_events.extend(ticked(&mut world, 100));

        assert!(all_events.contains(&Event::EnemyDestroyed {
            enemy: EnemyId::new(0),
            kind: EnemyKind::Shooter,
            bullet: BulletId::new(0),
        }));
        assert!(query::enemy_view(&world).into_vec().is_empty());
        assert!(query::bullet_view(&world).into_vec().is_empty());
        assert_eq!(query::player(&world).lives, lives_before);
        assert_eq!(query::player(&world).cell, CellCoord::new(2, 2));
    }

    #[test]
    fn enemy_bullet_reaching_the_player_cell_hits() {
        let mut world = World::with_seed(41);
        world.enemies = vec![Enemy {
            id: EnemyId::new(0),
            kind: EnemyKind::Shooter,
            cell: CellCoord::new(0, 3),
            color: Rgb::new(0xff, 0x00, 0xff),
            accumulator: Duration::ZERO,
        }];

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireBullet {
                source: BulletSource::Shooter(EnemyId::new(0)),
                heading: Heading::new(0, -1),
            },
            &mut events,
        );

        let mut hit = false;
        for _ in 0..20 {
            let events = ticked(&mut world, 100);
            if events.contains(&Event::PlayerHit {
                cause: HitCause::EnemyBullet,
                lives: Lives::new(2),
            }) {
                hit = true;
                break;
            }
        }

        assert!(hit, "enemy bullet should reach the player cell");
        assert!(query::bullet_view(&world).into_vec().is_empty());
        assert_eq!(query::enemy_view(&world).into_vec().len(), 1);
    }

    #[test]
    fn shooter_fire_resets_the_interval_even_with_zero_heading() {
        let mut world = World::with_seed(3);
        world.enemies = vec![Enemy {
            id: EnemyId::new(0),
            kind: EnemyKind::Shooter,
            cell: CellCoord::new(9, 9),
            color: Rgb::new(0xff, 0x00, 0xff),
            accumulator: SHOOTER_FIRE_QUANTUM,
        }];

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FireBullet {
                source: BulletSource::Shooter(EnemyId::new(0)),
                heading: Heading::ZERO,
            },
            &mut events,
        );

        assert!(events.is_empty());
        assert!(query::bullet_view(&world).into_vec().is_empty());
        let snapshot = query::enemy_view(&world).into_vec()[0];
        assert_eq!(snapshot.accumulated, Duration::ZERO);
    }

    #[test]
    fn blocks_fall_expire_and_hit() {
        let mut world = World::with_seed(29);
        world.enemies.clear();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBlock {
                shape: TetrominoKind::O,
                column: 0,
            },
            &mut events,
        );
        assert!(matches!(events.first(), Some(Event::BlockSpawned { .. })));

        // The shape spawns two cells above the board and reaches the player
        // row after descending roughly that far.
        let mut hit = false;
        for _ in 0..40 {
            let events = ticked(&mut world, 100);
            if events
                .iter()
                .any(|event| matches!(event, Event::PlayerHit { cause: HitCause::FallingBlock, .. }))
            {
                hit = true;
                break;
            }
        }
        assert!(hit, "falling block should overlap the player cell");
        assert!(query::block_view(&world).into_vec().is_empty());

        // A block spawned away from the player just scrolls out the bottom.
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBlock {
                shape: TetrominoKind::I,
                column: 10,
            },
            &mut events,
        );
        let mut expired = false;
        for _ in 0..200 {
            let events = ticked(&mut world, 100);
            if events
                .iter()
                .any(|event| matches!(event, Event::BlockExpired { .. }))
            {
                expired = true;
                break;
            }
        }
        assert!(expired, "block should expire past the bottom edge");
        assert!(query::block_view(&world).into_vec().is_empty());
    }

    #[test]
    fn block_spawns_that_overflow_the_board_are_ignored() {
        let mut world = World::with_seed(2);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBlock {
                shape: TetrominoKind::I,
                column: 18,
            },
            &mut events,
        );
        assert!(events.is_empty());
        assert!(query::block_view(&world).into_vec().is_empty());
    }

    #[test]
    fn stage_advances_only_with_goal_and_empty_coins() {
        let mut world = World::with_seed(55);
        let mut events = Vec::new();

        // Coins remain, so the request is ignored.
        world.player.cell = world.goal;
        apply(&mut world, Command::AdvanceStage, &mut events);
        assert!(events.is_empty());
        assert_eq!(query::stage(&world).number, StageNumber::FIRST);

        world.coins.clear();
        let _ = ticked(&mut world, 3_000);
        world.player.cell = world.goal;
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceStage, &mut events);

        assert!(events.contains(&Event::StageCompleted {
            stage: StageNumber::FIRST,
            score_seconds: 3,
        }));
        assert!(matches!(
            events.last(),
            Some(Event::StageStarted { columns: 25, rows: 25, .. })
        ));
        let stage = query::stage(&world);
        assert_eq!(stage.number, StageNumber::new(2));
        assert_eq!(stage.columns, 25);
        assert_eq!(stage.rows, 25);
        assert_eq!(stage.last_score, Some(3));
        assert_eq!(query::player(&world).cell, CellCoord::new(0, 0));
        assert_eq!(query::enemy_view(&world).into_vec().len(), 12);
    }

    #[test]
    fn stage_growth_caps_at_the_maximum_dimension() {
        let mut world = World::with_seed(8);
        world.board = Board::new(78, 78, 10.0);
        world.goal = world.player.cell;
        world.coins.clear();

        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceStage, &mut events);
        assert_eq!(query::stage(&world).columns, 80);
        assert_eq!(query::stage(&world).rows, 80);

        world.goal = world.player.cell;
        world.coins.clear();
        let mut events = Vec::new();
        apply(&mut world, Command::AdvanceStage, &mut events);
        assert_eq!(query::stage(&world).columns, 80);
        assert_eq!(query::stage(&world).rows, 80);
    }

    #[test]
    fn pathfinders_start_ready_and_shooters_wait_out_the_interval() {
        let world = World::with_seed(61);
        for enemy in query::enemy_view(&world).into_vec() {
            match enemy.kind {
                EnemyKind::Pathfinder => assert!(enemy.ready_for_action),
                EnemyKind::Shooter => assert!(!enemy.ready_for_action),
            }
        }
    }

    #[test]
    fn step_enemy_moves_only_through_open_walls() {
        let mut world = World::with_seed(71);
        let start = CellCoord::new(5, 5);
        world.enemies = vec![Enemy {
            id: EnemyId::new(0),
            kind: EnemyKind::Pathfinder,
            cell: start,
            color: Rgb::new(0x22, 0x8b, 0x22),
            accumulator: PATHFINDER_STEP_QUANTUM,
        }];

        let view = query::wall_view(&world);
        let open = view
            .open_directions(start)
            .first()
            .copied()
            .expect("connected maze cell has an open direction");
        let closed = Direction::CARDINAL
            .into_iter()
            .find(|direction| !view.is_open(start, *direction));

        if let Some(closed) = closed {
            let mut events = Vec::new();
            apply(
                &mut world,
                Command::StepEnemy {
                    enemy: EnemyId::new(0),
                    direction: closed,
                },
                &mut events,
            );
            assert!(events.is_empty());
            let snapshot = query::enemy_view(&world).into_vec()[0];
            assert_eq!(snapshot.cell, start);
            // A rejected attempt still consumes the cooldown.
            assert_eq!(snapshot.accumulated, Duration::ZERO);
            world.enemies[0].accumulator = PATHFINDER_STEP_QUANTUM;
        }

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepEnemy {
                enemy: EnemyId::new(0),
                direction: open,
            },
            &mut events,
        );
        let expected = start.neighbor(open, 20, 20).expect("open neighbor");
        assert!(events.contains(&Event::EnemyStepped {
            enemy: EnemyId::new(0),
            from: start,
            to: expected,
        }));
    }
}
