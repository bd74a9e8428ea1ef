//! Fixed-order frame loop that wires the pure systems to the world.

use std::time::Duration;

use anyhow::Result as AnyResult;
use maze_arcade_core::{Command, Event, ViewportSize};
use maze_arcade_rendering::{
    bullet_color, wall_segments, AudioCue, AudioDirector, BlockSprite, BoardPresentation,
    BulletSprite, Color, EnemySprite, FrameInput, GoalPresentation, MusicDirective, RenderBackend,
    Scene,
};
use maze_arcade_system_block_spawning::{BlockSpawning, Config as BlockConfig};
use maze_arcade_system_enemy_ai::{Config as EnemyConfig, EnemyAi};
use maze_arcade_system_hud::{Hud, HudModel};
use maze_arcade_system_player_control::{Config as ControlConfig, PlayerControl};
use maze_arcade_system_progression::Progression;
use maze_arcade_world::{self as world, query, World};

use crate::config::Tuning;

/// Stream labels that keep the per-system RNG seeds independent.
const ENEMY_SEED_STREAM: u64 = 0x656e_656d_795f_6169;
const BLOCK_SEED_STREAM: u64 = 0x626c_6f63_6b73_7061;

/// Everything needed to boot a session.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SessionConfig {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) viewport: ViewportSize,
    pub(crate) seed: u64,
    pub(crate) tuning: Tuning,
}

/// Output of a single frame, ready for presentation sinks.
#[derive(Debug)]
pub(crate) struct FrameReport {
    pub(crate) scene: Scene,
    // Consumed by the frame-loop tests; the headless binary renders the HUD
    // via `Session::hud_model` at shutdown instead of per frame.
    #[allow(dead_code)]
    pub(crate) hud: HudModel,
    pub(crate) cues: Vec<AudioCue>,
    pub(crate) music: Option<MusicDirective>,
}

/// One running game session: the world plus its orbiting pure systems.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    control: PlayerControl,
    enemy_ai: EnemyAi,
    block_spawning: BlockSpawning,
    progression: Progression,
    hud: Hud,
    audio: AudioDirector,
    last_events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(config: SessionConfig) -> Self {
        let mut world = World::with_seed(config.seed);
        let mut last_events = Vec::new();
        world::apply(
            &mut world,
            Command::ConfigureBoard {
                columns: config.columns,
                rows: config.rows,
                viewport: config.viewport,
            },
            &mut last_events,
        );

        Self {
            world,
            control: PlayerControl::new(ControlConfig::new(
                config.tuning.move_cooldown(),
                config.tuning.analog_cooldown(),
            )),
            enemy_ai: EnemyAi::new(EnemyConfig::new(config.seed ^ ENEMY_SEED_STREAM)),
            block_spawning: BlockSpawning::new(BlockConfig::new(
                config.tuning.block_interval(),
                config.seed ^ BLOCK_SEED_STREAM,
            )),
            progression: Progression::new(),
            hud: Hud,
            audio: AudioDirector::new(),
            last_events,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn last_events(&self) -> &[Event] {
        &self.last_events
    }

    pub(crate) fn hud_model(&self) -> HudModel {
        self.hud.compose(&self.world, self.audio.muted())
    }

    /// Advances the simulation by one frame in the arcade's fixed order:
    /// block spawning, enemy actions, the tick itself, player movement, then
    /// the goal check, so a same-frame final step is detected immediately.
    pub(crate) fn run_frame(&mut self, dt: Duration, input: FrameInput) -> FrameReport {
        let mut events: Vec<Event> = Vec::new();
        let mut commands: Vec<Command> = Vec::new();

        let columns = query::board(&self.world).columns();
        self.block_spawning
            .handle(&self.last_events, columns, &mut commands);

        {
            let enemies = query::enemy_view(&self.world);
            let player = query::player(&self.world);
            let walls = query::wall_view(&self.world);
            self.enemy_ai
                .handle(&self.last_events, &enemies, walls, &player, &mut commands);
        }

        let mut player_commands: Vec<Command> = Vec::new();
        self.control.handle(
            &self.last_events,
            input.intent(),
            input.shoot,
            &mut player_commands,
        );

        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        for command in player_commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        {
            let player = query::player(&self.world);
            let goal = query::goal_cell(&self.world);
            let coins = query::coins_remaining(&self.world);
            let mut advance: Vec<Command> = Vec::new();
            self.progression
                .handle(&events, player.cell, goal, coins, &mut advance);
            for command in advance {
                world::apply(&mut self.world, command, &mut events);
            }
        }

        let mut cues = Vec::new();
        let music = self.audio.handle(&events, input.mute_toggle, &mut cues);
        let hud = self.hud.compose(&self.world, self.audio.muted());
        let scene = compose_scene(&self.world);

        self.last_events = events;
        FrameReport {
            scene,
            hud,
            cues,
            music,
        }
    }
}

/// Builds the declarative scene a backend would draw for the current state.
pub(crate) fn compose_scene(world: &World) -> Scene {
    let board = query::board(world);
    let cell_size = board.cell_size();

    Scene {
        board: BoardPresentation {
            columns: board.columns(),
            rows: board.rows(),
            cell_size,
        },
        walls: wall_segments(query::wall_view(world), cell_size),
        trail: query::trail_cells(world),
        coins: query::coins(world).to_vec(),
        player: query::player(world).cell,
        goal: Some(GoalPresentation {
            cell: query::goal_cell(world),
            armed: query::coins_remaining(world) == 0,
        }),
        bullets: query::bullet_view(world)
            .into_vec()
            .into_iter()
            .map(|bullet| BulletSprite {
                position: bullet.position,
                color: bullet_color(bullet.owner),
            })
            .collect(),
        enemies: query::enemy_view(world)
            .into_vec()
            .into_iter()
            .map(|enemy| EnemySprite {
                cell: enemy.cell,
                kind: enemy.kind,
                color: Color::from_entity(enemy.color),
            })
            .collect(),
        blocks: query::block_view(world)
            .into_vec()
            .into_iter()
            .map(|block| BlockSprite {
                shape: block.shape,
                column: block.column,
                offset_y: block.offset_y,
                color: Color::from_entity(block.shape.color()),
            })
            .collect(),
    }
}

/// Render sink that counts frames instead of drawing them.
#[derive(Debug, Default)]
pub(crate) struct HeadlessBackend {
    frames_presented: u64,
}

impl HeadlessBackend {
    pub(crate) fn frames_presented(&self) -> u64 {
        self.frames_presented
    }
}

impl RenderBackend for HeadlessBackend {
    fn present(&mut self, scene: &Scene) -> AnyResult<()> {
        self.frames_presented += 1;
        tracing::trace!(
            walls = scene.walls.len(),
            enemies = scene.enemies.len(),
            bullets = scene.bullets.len(),
            blocks = scene.blocks.len(),
            "presented frame"
        );
        Ok(())
    }
}
