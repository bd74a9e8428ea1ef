#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared presentation contracts for Maze Arcade adapters.
//!
//! The simulation core describes one frame as a declarative [`Scene`] plus a
//! batch of [`AudioCue`] values; backends draw and play them however they
//! like. Input travels the other way: backends fill a [`FrameInput`] from
//! whatever device they wrap, and [`FrameInput::intent`] distills it into the
//! device-independent movement intent the core consumes.

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_arcade_core::{
    BulletOwner, CellCoord, Direction, EnemyKind, Event, InputIntent, PixelPoint, Rgb,
    TetrominoKind, WallGridView,
};

/// Minimum normalized stick deflection that registers as input.
const STICK_DEADZONE: f32 = 0.3;

/// Minimum gap between two consecutive movement cues.
const MOVE_CUE_THROTTLE: Duration = Duration::from_millis(120);

/// Key-conflict resolution order: up wins over down, down over left, and so on.
const KEY_PRIORITY: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Converts an entity color supplied by the simulation core.
    #[must_use]
    pub const fn from_entity(color: Rgb) -> Self {
        Self::from_rgb_u8(color.red(), color.green(), color.blue())
    }
}

/// Canvas clear color behind the maze.
pub const BACKGROUND_COLOR: Color = Color::from_rgb_u8(0xff, 0xff, 0xff);
/// Stroke color of maze wall segments.
pub const WALL_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0x00);
/// Fill color of the player marker.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0x00, 0x00, 0xff);
/// Fill color of uncollected coins.
pub const COIN_COLOR: Color = Color::from_rgb_u8(0xff, 0xc8, 0x00);
/// Translucent overlay marking visited trail cells.
pub const TRAIL_COLOR: Color = Color::new(0.39, 0.39, 0.78, 0.2);

/// Fill color of a bullet, selected by its collision-rule owner.
#[must_use]
pub const fn bullet_color(owner: BulletOwner) -> Color {
    match owner {
        BulletOwner::Player => Color::from_rgb_u8(0x00, 0x00, 0xff),
        BulletOwner::Enemy => Color::from_rgb_u8(0xff, 0x00, 0x00),
    }
}

/// Fill color of the goal marker; it arms red once every coin is collected.
#[must_use]
pub const fn goal_color(armed: bool) -> Color {
    if armed {
        Color::from_rgb_u8(0xff, 0x00, 0x00)
    } else {
        Color::from_rgb_u8(0x80, 0x80, 0x80)
    }
}

/// Line segment of a maze wall expressed in pixel units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Start point of the segment.
    pub from: PixelPoint,
    /// End point of the segment.
    pub to: PixelPoint,
}

/// Computes the wall segments a backend should stroke for the provided view.
///
/// Shared walls appear once per adjacent cell, mirroring how the arcade
/// strokes each cell's own edges.
#[must_use]
pub fn wall_segments(view: WallGridView<'_>, cell_size: f32) -> Vec<WallSegment> {
    let (columns, rows) = view.dimensions();
    let mut segments = Vec::new();

    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let Some(walls) = view.walls(cell) else {
                continue;
            };
            let x = column as f32 * cell_size;
            let y = row as f32 * cell_size;
            if walls.has(Direction::North) {
                segments.push(WallSegment {
                    from: PixelPoint::new(x, y),
                    to: PixelPoint::new(x + cell_size, y),
                });
            }
            if walls.has(Direction::East) {
                segments.push(WallSegment {
                    from: PixelPoint::new(x + cell_size, y),
                    to: PixelPoint::new(x + cell_size, y + cell_size),
                });
            }
            if walls.has(Direction::South) {
                segments.push(WallSegment {
                    from: PixelPoint::new(x + cell_size, y + cell_size),
                    to: PixelPoint::new(x, y + cell_size),
                });
            }
            if walls.has(Direction::West) {
                segments.push(WallSegment {
                    from: PixelPoint::new(x, y + cell_size),
                    to: PixelPoint::new(x, y),
                });
            }
        }
    }

    segments
}

/// Describes the board geometry backends lay the scene out on.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BoardPresentation {
    /// Number of maze columns.
    pub columns: u32,
    /// Number of maze rows.
    pub rows: u32,
    /// Side length of a square cell in pixel units.
    pub cell_size: f32,
}

/// Goal marker and its armed state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GoalPresentation {
    /// Cell the goal occupies.
    pub cell: CellCoord,
    /// Whether every coin is collected and the goal accepts the player.
    pub armed: bool,
}

/// Bullet ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletSprite {
    /// Continuous position in pixel units.
    pub position: PixelPoint,
    /// Fill color derived from the bullet owner.
    pub color: Color,
}

/// Enemy ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySprite {
    /// Cell the enemy occupies.
    pub cell: CellCoord,
    /// Behavior variant, which selects the marker shape.
    pub kind: EnemyKind,
    /// Fill color supplied by the simulation.
    pub color: Color,
}

/// Falling block ready for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlockSprite {
    /// Shape whose mask selects the filled sub-cells.
    pub shape: TetrominoKind,
    /// Leftmost column the shape occupies.
    pub column: u32,
    /// Vertical pixel offset of the shape's top edge.
    pub offset_y: f32,
    /// Canonical fill color of the shape.
    pub color: Color,
}

/// Declarative description of one rendered frame.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Board geometry the scene is laid out on.
    pub board: BoardPresentation,
    /// Wall segments to stroke.
    pub walls: Vec<WallSegment>,
    /// Visited cells to tint with the trail overlay.
    pub trail: Vec<CellCoord>,
    /// Cells holding uncollected coins.
    pub coins: Vec<CellCoord>,
    /// Cell the player occupies.
    pub player: CellCoord,
    /// Goal marker, if a stage is active.
    pub goal: Option<GoalPresentation>,
    /// Bullets in flight.
    pub bullets: Vec<BulletSprite>,
    /// Living enemies.
    pub enemies: Vec<EnemySprite>,
    /// Falling blocks.
    pub blocks: Vec<BlockSprite>,
}

impl Scene {
    /// Creates an empty scene with no board geometry or entities.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: BoardPresentation::default(),
            walls: Vec::new(),
            trail: Vec::new(),
            coins: Vec::new(),
            player: CellCoord::new(0, 0),
            goal: None,
            bullets: Vec::new(),
            enemies: Vec::new(),
            blocks: Vec::new(),
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Sink that presents finished scenes to the player.
pub trait RenderBackend {
    /// Presents one frame; failures must not alter simulation state.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}

/// Input snapshot gathered by adapters before updating the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Whether the up key is held this frame.
    pub up: bool,
    /// Whether the down key is held this frame.
    pub down: bool,
    /// Whether the left key is held this frame.
    pub left: bool,
    /// Whether the right key is held this frame.
    pub right: bool,
    /// Normalized analog stick deflection, when a stick is active.
    pub stick: Option<Vec2>,
    /// Whether the shoot trigger fired this frame.
    pub shoot: bool,
    /// Whether the mute toggle fired this frame.
    pub mute_toggle: bool,
}

impl FrameInput {
    /// Distills the raw device state into one movement intent.
    ///
    /// Held keys win over the stick and conflicts resolve in a fixed
    /// priority order (up, down, left, right). Stick deflection below the
    /// deadzone, or with no dominant axis, produces no intent.
    #[must_use]
    pub fn intent(&self) -> Option<InputIntent> {
        for direction in KEY_PRIORITY {
            if self.key_held(direction) {
                return Some(InputIntent::new(direction, 1.0));
            }
        }

        let stick = self.stick?;
        if stick.x.abs() <= STICK_DEADZONE && stick.y.abs() <= STICK_DEADZONE {
            return None;
        }

        if stick.x.abs() > stick.y.abs() {
            let direction = if stick.x > 0.0 {
                Direction::East
            } else {
                Direction::West
            };
            Some(InputIntent::new(direction, stick.x.abs().min(1.0)))
        } else if stick.y.abs() > stick.x.abs() {
            let direction = if stick.y > 0.0 {
                Direction::South
            } else {
                Direction::North
            };
            Some(InputIntent::new(direction, stick.y.abs().min(1.0)))
        } else {
            None
        }
    }

    const fn key_held(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.up,
            Direction::South => self.down,
            Direction::West => self.left,
            Direction::East => self.right,
        }
    }
}

/// Named audio effects the simulation asks the audio sink to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Player stepped into a new cell.
    Move,
    /// A bullet was fired.
    Shoot,
    /// An enemy was destroyed.
    Hit,
    /// A coin was collected.
    Coin,
}

/// Background music control requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicDirective {
    /// Start or resume the looped background track.
    Loop,
    /// Pause the background track.
    Pause,
}

/// Turns world events into rate-limited, mute-aware audio cues.
///
/// Cues are fire-and-forget; the director only decides *whether* a cue
/// should sound. The movement cue is throttled to one per 120 ms.
#[derive(Debug)]
pub struct AudioDirector {
    muted: bool,
    since_move_cue: Duration,
}

impl AudioDirector {
    /// Creates a new director with sound enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            muted: false,
            since_move_cue: MOVE_CUE_THROTTLE,
        }
    }

    /// Reports whether audio output is currently muted.
    #[must_use]
    pub const fn muted(&self) -> bool {
        self.muted
    }

    /// Consumes the frame's events and emits the cues to play.
    ///
    /// Returns a music directive when the mute state flipped this frame.
    pub fn handle(
        &mut self,
        events: &[Event],
        mute_toggle: bool,
        out_cues: &mut Vec<AudioCue>,
    ) -> Option<MusicDirective> {
        let directive = if mute_toggle {
            self.muted = !self.muted;
            Some(if self.muted {
                MusicDirective::Pause
            } else {
                MusicDirective::Loop
            })
        } else {
            None
        };

        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.since_move_cue = self.since_move_cue.saturating_add(*dt);
                }
                Event::PlayerMoved { .. } => {
                    if !self.muted && self.since_move_cue >= MOVE_CUE_THROTTLE {
                        out_cues.push(AudioCue::Move);
                        self.since_move_cue = Duration::ZERO;
                    }
                }
                Event::BulletFired { .. } => {
                    if !self.muted {
                        out_cues.push(AudioCue::Shoot);
                    }
                }
                Event::EnemyDestroyed { .. } => {
                    if !self.muted {
                        out_cues.push(AudioCue::Hit);
                    }
                }
                Event::CoinCollected { .. } => {
                    if !self.muted {
                        out_cues.push(AudioCue::Coin);
                    }
                }
                _ => {}
            }
        }

        directive
    }
}

impl Default for AudioDirector {
    fn default() -> Self {
        Self::new()
    }
}
