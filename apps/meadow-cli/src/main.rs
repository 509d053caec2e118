use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use meadow_animation::{AnimationState, BobAnimator, FALLBACK_DELTA, Gait, fixed_timeline};
use meadow_common::Color;
use meadow_render::{DebugTextRenderer, RenderView, Renderer};
use meadow_scene::{MeadowOptions, Scene, ScenePreset};
use meadow_terrain::{GroundSample, HeightField, PlaneSpec};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meadow-cli", about = "CLI tool for meadow terrain and animation")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions and the built-in constants
    Info,
    /// Sample the height field on a square grid
    Terrain {
        /// Lowest coordinate on both axes
        #[arg(long, default_value = "-10", allow_hyphen_values = true)]
        min: f32,
        /// Highest coordinate on both axes
        #[arg(long, default_value = "10", allow_hyphen_values = true)]
        max: f32,
        /// Spacing between samples
        #[arg(long, default_value = "10")]
        step: f32,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Replay the bob animation at a fixed frame rate
    Bob {
        /// Number of frames to step
        #[arg(short, long, default_value = "10")]
        frames: usize,
        /// Frames per second of the replay
        #[arg(long, default_value = "60")]
        fps: f32,
        /// Walking gait instead of idle
        #[arg(long)]
        moving: bool,
        /// Time of the first frame in seconds
        #[arg(long, default_value = "0")]
        start: f32,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Build a scene preset, advance it and dump it as text
    Scene {
        /// Scene preset (cube or meadow)
        #[arg(short, long, default_value_t = ScenePreset::Meadow)]
        preset: ScenePreset,
        /// Frames to advance at 60 fps before dumping
        #[arg(short, long, default_value = "0")]
        frames: usize,
        /// Start the character walking
        #[arg(long)]
        moving: bool,
    },
}

/// One row of the bob replay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct BobFrame {
    frame: usize,
    time: f32,
    gait: Gait,
    phase: f32,
    offset: f32,
}

/// Most samples `terrain` will take along one axis; the grid is this squared.
const MAX_AXIS_SAMPLES: usize = 1_000;

/// Evenly spaced coordinates from `min` to `max` inclusive.
fn axis(min: f32, max: f32, step: f32) -> anyhow::Result<Vec<f32>> {
    if !step.is_finite() || step <= 0.0 {
        bail!("step must be a positive number, got {step}");
    }
    if !min.is_finite() || !max.is_finite() || min > max {
        bail!("invalid range {min}..{max}");
    }
    // Tolerance keeps `max` when (max - min) / step is a whole number.
    let steps = ((max - min) / step + 1e-4).floor();
    if !steps.is_finite() || steps >= MAX_AXIS_SAMPLES as f32 {
        bail!("{min}..{max} with step {step} exceeds {MAX_AXIS_SAMPLES} samples per axis");
    }
    let count = steps as usize + 1;
    Ok((0..count).map(|i| min + i as f32 * step).collect())
}

fn terrain_samples(min: f32, max: f32, step: f32) -> anyhow::Result<Vec<GroundSample>> {
    let coords = axis(min, max, step)?;
    Ok(HeightField::default().sample_grid(&coords, &coords))
}

fn bob_timeline(frames: usize, fps: f32, moving: bool, start: f32) -> Vec<BobFrame> {
    let animator = BobAnimator::default();
    let mut state = AnimationState::default();
    fixed_timeline(start, fps, frames)
        .enumerate()
        .map(|(frame, time)| {
            let offset = animator.step(time, moving, &mut state);
            BobFrame {
                frame,
                time,
                gait: Gait::from_moving(moving),
                phase: state.phase,
                offset,
            }
        })
        .collect()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Info => {
            let field = HeightField::default();
            let animator = BobAnimator::default();
            let plane = PlaneSpec::default();
            println!("meadow-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("terrain: {}", meadow_terrain::crate_info());
            println!("animation: {}", meadow_animation::crate_info());
            println!("scene: {}", meadow_scene::crate_info());
            println!("render: {}", meadow_render::crate_info());
            println!(
                "height field: sin(x*{})*cos(y*{})*{}",
                field.kx, field.ky, field.amplitude
            );
            println!(
                "plane: {}x{} with {}x{} segments",
                plane.width, plane.depth, plane.segments_x, plane.segments_y
            );
            for gait in [Gait::Idle, Gait::Walking] {
                let p = animator.profile(gait);
                println!("{gait:?}: speed={} amplitude={}", p.speed, p.amplitude);
            }
            println!("fallback delta: {FALLBACK_DELTA}s");
            println!("highlight colour: {}", Color::ORANGE.to_hex());
        }
        Commands::Terrain {
            min,
            max,
            step,
            json,
        } => {
            let samples = terrain_samples(min, max, step)?;
            tracing::debug!(count = samples.len(), "terrain sampled");
            if json {
                println!("{}", serde_json::to_string_pretty(&samples)?);
            } else {
                println!("{:>10} {:>10} {:>12}", "x", "y", "elevation");
                for s in &samples {
                    println!("{:>10.3} {:>10.3} {:>12.6}", s.x, s.y, s.elevation);
                }
            }
        }
        Commands::Bob {
            frames,
            fps,
            moving,
            start,
            json,
        } => {
            if !fps.is_finite() || fps <= 0.0 {
                bail!("fps must be positive, got {fps}");
            }
            let timeline = bob_timeline(frames, fps, moving, start);
            if json {
                println!("{}", serde_json::to_string_pretty(&timeline)?);
            } else {
                println!(
                    "{:>6} {:>9} {:>8} {:>10} {:>10}",
                    "frame", "time", "gait", "phase", "offset"
                );
                for f in &timeline {
                    println!(
                        "{:>6} {:>9.4} {:>8} {:>10.5} {:>+10.5}",
                        f.frame,
                        f.time,
                        format!("{:?}", f.gait),
                        f.phase,
                        f.offset
                    );
                }
            }
        }
        Commands::Scene {
            preset,
            frames,
            moving,
        } => {
            let options = MeadowOptions {
                moving,
                ..MeadowOptions::default()
            };
            let mut scene =
                Scene::from_preset(preset, &options).context("failed to build scene")?;
            for t in fixed_timeline(1.0 / 60.0, 60.0, frames) {
                scene.advance(t);
            }
            let view = RenderView::from(*scene.camera());
            print!("{}", DebugTextRenderer::new().render(&scene, &view));
            println!("state hash: {:#018x}", scene.state_hash());
        }
    }

    Ok(())
}
