#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs headless Maze Arcade sessions.
//!
//! The binary boots a world, wires the pure systems through the fixed-order
//! frame loop, and drives it with a deterministic autopilot. Rendering and
//! audio degrade to structured log lines, which keeps the simulation core
//! fully exercised without a window.

mod autopilot;
mod config;
mod frame;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use maze_arcade_core::{Event, ViewportSize};
use maze_arcade_rendering::RenderBackend;
use maze_arcade_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;
use crate::config::Tuning;
use crate::frame::{HeadlessBackend, Session, SessionConfig};

/// Command-line options of the headless arcade runner.
#[derive(Debug, Parser)]
#[command(name = "maze-arcade", about = "Headless Maze Arcade session runner")]
struct Args {
    /// Number of maze columns for the first stage.
    #[arg(long, default_value_t = 20)]
    columns: u32,
    /// Number of maze rows for the first stage.
    #[arg(long, default_value_t = 20)]
    rows: u32,
    /// Viewport width in pixels used to size cells.
    #[arg(long, default_value_t = 960.0)]
    viewport_width: f32,
    /// Viewport height in pixels used to size cells.
    #[arg(long, default_value_t = 960.0)]
    viewport_height: f32,
    /// Session seed; omit for a random session.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Optional TOML tuning file overriding the timing defaults.
    #[arg(long)]
    tuning: Option<PathBuf>,
}

/// Entry point for the Maze Arcade command-line interface.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let tuning = match &args.tuning {
        Some(path) => Tuning::load(path)
            .with_context(|| format!("loading tuning file {}", path.display()))?,
        None => Tuning::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut session = Session::new(SessionConfig {
        columns: args.columns,
        rows: args.rows,
        viewport: ViewportSize::new(args.viewport_width, args.viewport_height),
        seed,
        tuning,
    });
    let mut autopilot = Autopilot::new(seed);
    let mut backend = HeadlessBackend::default();

    println!("{}", query::welcome_banner(session.world()));
    info!(seed, columns = args.columns, rows = args.rows, "session started");

    let dt = Duration::from_millis(args.tick_ms);
    for _ in 0..args.frames {
        let input = autopilot.frame_input(session.world());
        let report = session.run_frame(dt, input);

        backend
            .present(&report.scene)
            .context("presenting frame to the render sink")?;

        // Audio degrades to logging in the headless adapter; cues never
        // block or alter the simulation.
        for cue in &report.cues {
            debug!(?cue, "audio cue");
        }
        if let Some(directive) = report.music {
            debug!(?directive, "music directive");
        }

        for event in session.last_events() {
            match event {
                Event::StageCompleted {
                    stage,
                    score_seconds,
                } => info!(
                    stage = stage.get(),
                    score_seconds = *score_seconds,
                    "stage completed"
                ),
                Event::PlayerHit { cause, lives } => {
                    warn!(?cause, lives = lives.get(), "player hit")
                }
                _ => {}
            }
        }
    }

    println!("{}", session.hud_model().line());
    info!(
        frames = backend.frames_presented(),
        stage = query::stage(session.world()).number.get(),
        "session finished"
    );
    Ok(())
}
