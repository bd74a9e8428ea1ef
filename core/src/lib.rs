#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Arcade engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Maze Arcade.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Configures the board dimensions and restarts the session at stage one.
    ConfigureBoard {
        /// Number of maze columns laid out in the grid.
        columns: u32,
        /// Number of maze rows laid out in the grid.
        rows: u32,
        /// Viewport the board must fit into when sizing cells.
        viewport: ViewportSize,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player advance a single step in the given direction.
    MovePlayer {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests creation of a bullet through the shared firing contract.
    FireBullet {
        /// Entity responsible for the shot.
        source: BulletSource,
        /// Travel heading of the bullet; a zero heading is ignored.
        heading: Heading,
    },
    /// Requests that a pathfinder enemy advance one cell.
    StepEnemy {
        /// Identifier of the enemy attempting to move.
        enemy: EnemyId,
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that a falling block enter the board above the visible area.
    SpawnBlock {
        /// Shape of the block to spawn.
        shape: TetrominoKind,
        /// Leftmost column the shape occupies.
        column: u32,
    },
    /// Requests the stage transition once the win condition holds.
    AdvanceStage,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a fresh stage began and the world was rebuilt.
    StageStarted {
        /// Stage that became active.
        stage: StageNumber,
        /// Number of maze columns in the new stage.
        columns: u32,
        /// Number of maze rows in the new stage.
        rows: u32,
    },
    /// Announces that the win condition was met and the stage was scored.
    StageCompleted {
        /// Stage that was completed.
        stage: StageNumber,
        /// Whole elapsed seconds recorded as the stage score.
        score_seconds: u64,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after completing the move.
        to: CellCoord,
    },
    /// Reports that a movement attempt was rejected by a wall.
    MovementBlocked {
        /// Direction of the rejected step.
        direction: Direction,
    },
    /// Confirms that the player collected a coin.
    CoinCollected {
        /// Cell the coin occupied.
        cell: CellCoord,
        /// Number of coins still uncollected on the board.
        remaining: u32,
    },
    /// Confirms that a bullet entered the board.
    BulletFired {
        /// Identifier assigned to the bullet.
        bullet: BulletId,
        /// Collision-rule owner of the bullet.
        owner: BulletOwner,
        /// Spawn position in pixel units.
        origin: PixelPoint,
        /// Travel heading of the bullet.
        heading: Heading,
    },
    /// Reports that a bullet left the board bounds and was discarded.
    BulletExpired {
        /// Identifier of the discarded bullet.
        bullet: BulletId,
    },
    /// Confirms that an enemy advanced between two cells.
    EnemyStepped {
        /// Identifier of the enemy that advanced.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after completing the move.
        to: CellCoord,
    },
    /// Confirms that a player bullet destroyed an enemy.
    EnemyDestroyed {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Behavior variant of the destroyed enemy.
        kind: EnemyKind,
        /// Bullet consumed by the hit.
        bullet: BulletId,
    },
    /// Confirms that a falling block entered the board.
    BlockSpawned {
        /// Identifier assigned to the block.
        block: BlockId,
        /// Shape of the spawned block.
        shape: TetrominoKind,
        /// Leftmost column the shape occupies.
        column: u32,
    },
    /// Reports that a falling block scrolled past the bottom edge.
    BlockExpired {
        /// Identifier of the discarded block.
        block: BlockId,
    },
    /// Reports that the player was hit and the board was partially reset.
    PlayerHit {
        /// What caused the hit.
        cause: HitCause,
        /// Lives remaining after the hit.
        lives: Lives,
    },
}

/// Cardinal movement directions available on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All cardinal directions in carving order: north, east, south, west.
    pub const CARDINAL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Column and row deltas produced by one step in this direction.
    #[must_use]
    pub const fn offsets(self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
        }
    }

    /// Direction pointing back the way this one came.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row)
    }

    /// Bounds-checked neighbor one step away in the provided direction.
    #[must_use]
    pub fn neighbor(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (delta_column, delta_row) = direction.offsets();
        let column = i64::from(self.column) + delta_column;
        let row = i64::from(self.row) + delta_row;
        if column < 0 || row < 0 || column >= i64::from(columns) || row >= i64::from(rows) {
            return None;
        }
        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// Continuous position expressed in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelPoint {
    /// Horizontal position in pixel units.
    pub x: f32,
    /// Vertical position in pixel units.
    pub y: f32,
}

impl PixelPoint {
    /// Creates a new pixel-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two pixel-space points.
    #[must_use]
    pub fn distance_to(self, other: PixelPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Travel heading with per-axis components restricted to `{-1, 0, 1}`.
///
/// Unlike [`Direction`], a heading may be diagonal: shooters firing at a
/// player with equal offsets on both axes emit a bullet along both signs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    dx: i8,
    dy: i8,
}

impl Heading {
    /// Heading with no movement on either axis.
    pub const ZERO: Heading = Heading { dx: 0, dy: 0 };

    /// Creates a heading from per-axis signs, clamping each to `{-1, 0, 1}`.
    #[must_use]
    pub const fn new(dx: i8, dy: i8) -> Self {
        Self {
            dx: clamp_sign(dx),
            dy: clamp_sign(dy),
        }
    }

    /// Cardinal heading equivalent to the provided direction.
    #[must_use]
    pub const fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::North => Heading::new(0, -1),
            Direction::East => Heading::new(1, 0),
            Direction::South => Heading::new(0, 1),
            Direction::West => Heading::new(-1, 0),
        }
    }

    /// Horizontal component of the heading.
    #[must_use]
    pub const fn dx(&self) -> i8 {
        self.dx
    }

    /// Vertical component of the heading.
    #[must_use]
    pub const fn dy(&self) -> i8 {
        self.dy
    }

    /// Reports whether the heading has no movement on either axis.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

const fn clamp_sign(value: i8) -> i8 {
    if value > 0 {
        1
    } else if value < 0 {
        -1
    } else {
        0
    }
}

/// Device-independent movement request distilled from raw frame input.
///
/// Keyboards produce full-strength intents; an analog stick produces intents
/// whose magnitude reflects the dominant-axis deflection after the deadzone.
/// The simulation never learns which device produced the intent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputIntent {
    /// Requested travel direction.
    pub direction: Direction,
    /// Deflection strength in `0.0..=1.0`; discrete presses report `1.0`.
    pub magnitude: f32,
}

impl InputIntent {
    /// Creates a new movement intent.
    #[must_use]
    pub const fn new(direction: Direction, magnitude: f32) -> Self {
        Self {
            direction,
            magnitude,
        }
    }
}

/// Wall flags of a single maze cell, one per cardinal direction.
///
/// Walls stay mutually consistent with neighboring cells: carving clears the
/// facing flags on both sides of a shared edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellWalls {
    north: bool,
    east: bool,
    south: bool,
    west: bool,
}

impl CellWalls {
    /// Creates a cell with all four walls present.
    #[must_use]
    pub const fn solid() -> Self {
        Self {
            north: true,
            east: true,
            south: true,
            west: true,
        }
    }

    /// Reports whether the wall facing the provided direction is present.
    #[must_use]
    pub const fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Reports whether travel in the provided direction is unobstructed.
    #[must_use]
    pub const fn is_open(&self, direction: Direction) -> bool {
        !self.has(direction)
    }

    /// Removes the wall facing the provided direction.
    pub fn clear(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = false,
            Direction::East => self.east = false,
            Direction::South => self.south = false,
            Direction::West => self.west = false,
        }
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a bullet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BulletId(u32);

impl BulletId {
    /// Creates a new bullet identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a falling block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u32);

impl BlockId {
    /// Creates a new block identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based stage counter that scales difficulty across playthroughs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StageNumber(u32);

impl StageNumber {
    /// First stage of a session.
    pub const FIRST: StageNumber = StageNumber(1);

    /// Creates a stage counter with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the counter.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Stage that follows this one.
    #[must_use]
    pub const fn next(&self) -> StageNumber {
        StageNumber(self.0.saturating_add(1))
    }
}

/// Remaining player lives with a saturating floor of zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Lives(u8);

impl Lives {
    /// Lives granted at the start of a session.
    pub const INITIAL: Lives = Lives(3);

    /// Creates a lives counter with the provided value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the counter.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Counter after losing one life, never descending below zero.
    #[must_use]
    pub const fn lose_one(&self) -> Lives {
        Lives(self.0.saturating_sub(1))
    }
}

/// Behavior variants an enemy can be spawned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Stationary enemy that fires bullets toward the player on an interval.
    Shooter,
    /// Mobile enemy that random-walks the maze and damages on contact.
    Pathfinder,
}

/// Classifies a bullet for collision-rule selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletOwner {
    /// Bullet fired by the player; removes enemies.
    Player,
    /// Bullet fired by a shooter enemy; damages the player.
    Enemy,
}

/// Entity a bullet originates from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletSource {
    /// Shot fired by the player from their current cell.
    Player,
    /// Shot fired by the identified shooter enemy from its cell.
    Shooter(EnemyId),
}

impl BulletSource {
    /// Collision-rule owner implied by the source.
    #[must_use]
    pub const fn owner(&self) -> BulletOwner {
        match self {
            BulletSource::Player => BulletOwner::Player,
            BulletSource::Shooter(_) => BulletOwner::Enemy,
        }
    }
}

/// What inflicted a player hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitCause {
    /// An enemy bullet reached the player's cell.
    EnemyBullet,
    /// A falling block overlapped the player's cell.
    FallingBlock,
    /// A pathfinder enemy occupied the player's cell.
    EnemyContact,
}

/// Opaque RGB color applied to enemies and blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// The seven falling-block shapes with their canonical colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TetrominoKind {
    /// Four cells in a single row.
    I,
    /// Two-by-two square.
    O,
    /// Three cells with a center stem.
    T,
    /// Left-leaning zigzag.
    S,
    /// Right-leaning zigzag.
    Z,
    /// Three cells with a leading corner.
    L,
    /// Three cells with a trailing corner.
    J,
}

impl TetrominoKind {
    /// All shapes in spawn-table order.
    pub const ALL: [TetrominoKind; 7] = [
        TetrominoKind::I,
        TetrominoKind::O,
        TetrominoKind::T,
        TetrominoKind::S,
        TetrominoKind::Z,
        TetrominoKind::L,
        TetrominoKind::J,
    ];

    /// Occupancy mask of the shape, row-major, `true` for occupied sub-cells.
    #[must_use]
    pub const fn mask(&self) -> &'static [&'static [bool]] {
        match self {
            TetrominoKind::I => &[&[true, true, true, true]],
            TetrominoKind::O => &[&[true, true], &[true, true]],
            TetrominoKind::T => &[&[false, true, false], &[true, true, true]],
            TetrominoKind::S => &[&[true, true, false], &[false, true, true]],
            TetrominoKind::Z => &[&[false, true, true], &[true, true, false]],
            TetrominoKind::L => &[&[true, false, false], &[true, true, true]],
            TetrominoKind::J => &[&[false, false, true], &[true, true, true]],
        }
    }

    /// Width of the shape measured in whole cells.
    #[must_use]
    pub const fn width(&self) -> u32 {
        match self {
            TetrominoKind::I => 4,
            TetrominoKind::O => 2,
            TetrominoKind::T
            | TetrominoKind::S
            | TetrominoKind::Z
            | TetrominoKind::L
            | TetrominoKind::J => 3,
        }
    }

    /// Height of the shape measured in whole cells.
    #[must_use]
    pub const fn height(&self) -> u32 {
        match self {
            TetrominoKind::I => 1,
            _ => 2,
        }
    }

    /// Canonical color of the shape.
    #[must_use]
    pub const fn color(&self) -> Rgb {
        match self {
            TetrominoKind::I => Rgb::new(0x00, 0xff, 0xff),
            TetrominoKind::O => Rgb::new(0xff, 0xff, 0x00),
            TetrominoKind::T => Rgb::new(0x80, 0x00, 0x80),
            TetrominoKind::S => Rgb::new(0x00, 0xff, 0x00),
            TetrominoKind::Z => Rgb::new(0xff, 0x00, 0x00),
            TetrominoKind::L => Rgb::new(0xff, 0xa5, 0x00),
            TetrominoKind::J => Rgb::new(0x00, 0x00, 0xff),
        }
    }
}

/// Viewport the board must fit into, expressed in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportSize {
    width: f32,
    height: f32,
}

impl ViewportSize {
    /// Creates a new viewport descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the viewport in pixel units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the viewport in pixel units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Largest whole-pixel cell size that fits the given grid in the viewport.
    ///
    /// Mirrors the sizing rule of the arcade layout: the board may use 90% of
    /// the viewport width and 70% of its height.
    #[must_use]
    pub fn cell_size_for(&self, columns: u32, rows: u32) -> f32 {
        if columns == 0 || rows == 0 {
            return 0.0;
        }
        let max_width = self.width * 0.9 / columns as f32;
        let max_height = self.height * 0.7 / rows as f32;
        max_width.min(max_height).floor().max(1.0)
    }
}

/// Read-only view into the dense maze wall grid.
#[derive(Clone, Copy, Debug)]
pub struct WallGridView<'a> {
    cells: &'a [CellWalls],
    columns: u32,
    rows: u32,
}

impl<'a> WallGridView<'a> {
    /// Captures a new wall view backed by the provided row-major cell slice.
    #[must_use]
    pub fn new(cells: &'a [CellWalls], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Returns the wall flags of the provided cell, if it exists.
    #[must_use]
    pub fn walls(&self, cell: CellCoord) -> Option<CellWalls> {
        self.index(cell).and_then(|index| self.cells.get(index)).copied()
    }

    /// Reports whether travel from the cell in the direction is unobstructed.
    ///
    /// Missing cells are treated as blocked so callers can skip the move.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord, direction: Direction) -> bool {
        self.walls(cell)
            .map_or(false, |walls| walls.is_open(direction))
    }

    /// Collects the open cardinal directions leaving the provided cell.
    #[must_use]
    pub fn open_directions(&self, cell: CellCoord) -> Vec<Direction> {
        Direction::CARDINAL
            .into_iter()
            .filter(|direction| {
                self.is_open(cell, *direction)
                    && cell
                        .neighbor(*direction, self.columns, self.rows)
                        .is_some()
            })
            .collect()
    }

    /// Provides the dimensions of the underlying wall grid.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
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

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Grid cell currently occupied by the player.
    pub cell: CellCoord,
    /// Lives remaining in the session.
    pub lives: Lives,
    /// Heading of the last successful move.
    pub last_move: Heading,
    /// Direction of the last attempted move, successful or not.
    pub last_aim: Direction,
}

/// Immutable description of the active stage used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageSnapshot {
    /// One-based stage counter.
    pub number: StageNumber,
    /// Number of maze columns in the active stage.
    pub columns: u32,
    /// Number of maze rows in the active stage.
    pub rows: u32,
    /// Side length of a square cell in pixel units.
    pub cell_size: f32,
    /// Time elapsed since the stage began.
    pub elapsed: Duration,
    /// Score recorded for the most recently completed stage, if any.
    pub last_score: Option<u64>,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Behavior variant of the enemy.
    pub kind: EnemyKind,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Appearance assigned to the enemy.
    pub color: Rgb,
    /// Indicates whether the enemy accrued enough time to act.
    pub ready_for_action: bool,
    /// Duration accumulated toward the next action.
    pub accumulated: Duration,
}

/// Read-only snapshot describing all living enemies on the board.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single bullet's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSnapshot {
    /// Unique identifier assigned to the bullet.
    pub id: BulletId,
    /// Collision-rule owner of the bullet.
    pub owner: BulletOwner,
    /// Continuous position in pixel units.
    pub position: PixelPoint,
    /// Travel heading of the bullet.
    pub heading: Heading,
}

/// Read-only snapshot describing all bullets in flight.
#[derive(Clone, Debug, Default)]
pub struct BulletView {
    snapshots: Vec<BulletSnapshot>,
}

impl BulletView {
    /// Creates a new bullet view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BulletSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured bullet snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BulletSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BulletSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single falling block used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockSnapshot {
    /// Unique identifier assigned to the block.
    pub id: BlockId,
    /// Shape of the block.
    pub shape: TetrominoKind,
    /// Leftmost column the shape occupies.
    pub column: u32,
    /// Vertical pixel offset of the shape's top edge; negative above the board.
    pub offset_y: f32,
}

/// Read-only snapshot describing all falling blocks on the board.
#[derive(Clone, Debug, Default)]
pub struct BlockView {
    snapshots: Vec<BlockSnapshot>,
}

impl BlockView {
    /// Creates a new block view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BlockSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured block snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &BlockSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BlockSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::{
        BulletId, BulletOwner, CellCoord, CellWalls, Direction, EnemyId, EnemyKind, Heading,
        Lives, StageNumber, TetrominoKind, ViewportSize, WallGridView,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn neighbor_respects_grid_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.neighbor(Direction::North, 4, 4), None);
        assert_eq!(corner.neighbor(Direction::West, 4, 4), None);
        assert_eq!(
            corner.neighbor(Direction::East, 4, 4),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(
            corner.neighbor(Direction::South, 4, 4),
            Some(CellCoord::new(0, 1))
        );

        let far_corner = CellCoord::new(3, 3);
        assert_eq!(far_corner.neighbor(Direction::East, 4, 4), None);
        assert_eq!(far_corner.neighbor(Direction::South, 4, 4), None);
    }

    #[test]
    fn heading_clamps_components_to_signs() {
        let heading = Heading::new(5, -3);
        assert_eq!(heading.dx(), 1);
        assert_eq!(heading.dy(), -1);
        assert!(!heading.is_zero());
        assert!(Heading::ZERO.is_zero());
    }

    #[test]
    fn cell_walls_clear_one_side_at_a_time() {
        let mut walls = CellWalls::solid();
        assert!(walls.has(Direction::North));
        walls.clear(Direction::North);
        assert!(walls.is_open(Direction::North));
        assert!(walls.has(Direction::East));
        assert!(walls.has(Direction::South));
        assert!(walls.has(Direction::West));
    }

    #[test]
    fn lives_never_descend_below_zero() {
        let mut lives = Lives::new(1);
        lives = lives.lose_one();
        assert_eq!(lives.get(), 0);
        lives = lives.lose_one();
        assert_eq!(lives.get(), 0);
    }

    #[test]
    fn stage_number_increments_by_one() {
        assert_eq!(StageNumber::FIRST.next(), StageNumber::new(2));
    }

    #[test]
    fn tetromino_masks_are_rectangular() {
        for kind in TetrominoKind::ALL {
            let mask = kind.mask();
            assert!(!mask.is_empty());
            let width = mask[0].len();
            for row in mask {
                assert_eq!(row.len(), width);
            }
            assert_eq!(kind.width() as usize, width);
            assert_eq!(kind.height() as usize, mask.len());
        }
    }

    #[test]
    fn viewport_cell_size_fits_both_axes() {
        let viewport = ViewportSize::new(1000.0, 1000.0);
        let cell = viewport.cell_size_for(20, 20);
        assert_eq!(cell, 35.0);
        assert!(cell * 20.0 <= viewport.width() * 0.9);
        assert!(cell * 20.0 <= viewport.height() * 0.7);
    }

    #[test]
    fn wall_view_reports_missing_cells_as_blocked() {
        let cells = vec![CellWalls::solid(); 4];
        let view = WallGridView::new(&cells, 2, 2);
        assert!(view.walls(CellCoord::new(2, 0)).is_none());
        assert!(!view.is_open(CellCoord::new(2, 0), Direction::North));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        assert_round_trip(&EnemyId::new(42));
    }

    #[test]
    fn bullet_id_round_trips_through_bincode() {
        assert_round_trip(&BulletId::new(7));
    }

    #[test]
    fn enemy_kind_round_trips_through_bincode() {
        assert_round_trip(&EnemyKind::Pathfinder);
    }

    #[test]
    fn bullet_owner_round_trips_through_bincode() {
        assert_round_trip(&BulletOwner::Enemy);
    }

    #[test]
    fn tetromino_kind_round_trips_through_bincode() {
        assert_round_trip(&TetrominoKind::S);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }
}
