use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use menagerie_assets::{LoadStatus, ModelData, import_gltf};
use menagerie_behaviors::{Player, PlayerConfig, spawn_showcase};
use menagerie_input::LogicalButton;
use menagerie_kernel::{FrameLoop, LoopConfig};
use menagerie_render::{HeadlessScene, SceneGraph};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "menagerie-cli", about = "Headless host for the menagerie frame loop")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Run the frame loop with scripted input
    Run {
        /// Number of frames to run
        #[arg(short, long, default_value = "120")]
        frames: u64,
        /// Simulated frames per second
        #[arg(long, default_value = "60")]
        fps: f64,
        /// JSON configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Hold a button over a frame range, e.g. `up:10-40`
        #[arg(long = "hold", value_parser = parse_hold)]
        holds: Vec<Hold>,
        /// Print entity state every K frames (0 = only at the end)
        #[arg(long, default_value = "0")]
        report_every: u64,
        /// Line up every model playing its first clip instead of spawning the player
        #[arg(long)]
        showcase: bool,
    },
    /// Print clips and meshes of a glTF file
    InspectModel {
        path: PathBuf,
    },
}

/// A model file to load before the scene starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ModelSource {
    name: String,
    path: PathBuf,
}

/// Models shown by `run --showcase` when the config names no model files.
const SHOWCASE_PLACEHOLDERS: [&str; 4] = ["zebra", "horse", "knight", "phoenix"];

/// Everything `run` reads from its config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct AppConfig {
    #[serde(rename = "loop")]
    frame_loop: LoopConfig,
    player: PlayerConfig,
    /// Empty means the player model is a built-in placeholder.
    models: Vec<ModelSource>,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let Some(path) = path else {
        return Ok(AppConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

/// `button:start-end`: pressed on frame `start`, released on frame `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Hold {
    button: LogicalButton,
    start: u64,
    end: u64,
}

fn parse_hold(s: &str) -> Result<Hold, String> {
    let (button, range) = s
        .split_once(':')
        .ok_or_else(|| format!("expected button:start-end, got {s:?}"))?;
    let button = button.parse::<LogicalButton>().map_err(|e| e.to_string())?;
    let (start, end) = range
        .split_once('-')
        .ok_or_else(|| format!("expected start-end, got {range:?}"))?;
    let start = start
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad start frame: {e}"))?;
    let end = end
        .trim()
        .parse::<u64>()
        .map_err(|e| format!("bad end frame: {e}"))?;
    if end < start {
        return Err(format!("end frame {end} before start frame {start}"));
    }
    Ok(Hold { button, start, end })
}

fn print_entities(frame_loop: &FrameLoop, scene: &HeadlessScene) {
    for entity in frame_loop.entities().iter() {
        let world = scene
            .world_position(entity.node())
            .unwrap_or(entity.transform.position);
        let kinds: Vec<&str> = entity.component_kinds().iter().map(|k| k.name()).collect();
        println!(
            "  {} {:<10} pos=({:.2}, {:.2}, {:.2}) yaw={:.1}° components=[{}]",
            entity.id(),
            entity.name(),
            world.x,
            world.y,
            world.z,
            entity.transform.yaw().to_degrees(),
            kinds.join(", ")
        );
    }
}

fn run(
    frames: u64,
    fps: f64,
    config_path: Option<&Path>,
    holds: &[Hold],
    report_every: u64,
    showcase: bool,
) -> anyhow::Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        bail!("fps must be positive, got {fps}");
    }
    let config = load_config(config_path)?;
    let mut frame_loop = FrameLoop::new(config.frame_loop.clone())?;
    let mut scene = HeadlessScene::new();

    let names: Vec<String> = if config.models.is_empty() {
        let names: Vec<String> = if showcase {
            SHOWCASE_PLACEHOLDERS.iter().map(|n| n.to_string()).collect()
        } else {
            vec![config.player.model.clone()]
        };
        for name in &names {
            frame_loop
                .loader_mut()
                .request(name)
                .complete(ModelData::placeholder(name, &[("Take 001", 1.0)]));
        }
        names
    } else {
        for source in &config.models {
            frame_loop.loader_mut().request_file(&source.name, &source.path);
        }
        config.models.iter().map(|m| m.name.clone()).collect()
    };

    if showcase {
        frame_loop.on_ready(move |library, entities, scene| {
            let models: Vec<_> = names.iter().filter_map(|name| library.get(name)).collect();
            spawn_showcase(&models, entities, scene);
        });
    } else {
        let player = config.player.clone();
        frame_loop.on_ready(move |library, entities, scene| {
            let Some(model) = library.get(&player.model) else {
                tracing::warn!(model = %player.model, "player model not loaded, no player spawned");
                return;
            };
            let root = scene.root();
            let entity = entities.create_entity(scene, root, "player");
            Player::attach(entity, model, scene, player);
        });
    }

    match frame_loop.await_assets(Duration::from_secs(30)) {
        LoadStatus::Ready => {}
        LoadStatus::Failed { failed } => bail!("models failed to load: {}", failed.join(", ")),
        LoadStatus::Loading { loaded, total } => {
            bail!("timed out loading models ({loaded}/{total})")
        }
    }

    println!("Running {frames} frames at {fps} fps");
    for frame in 0..frames {
        for hold in holds {
            let Some(code) = frame_loop.input().code_for(hold.button) else {
                continue;
            };
            if frame == hold.start {
                frame_loop.input_mut().set_from_raw_code(code, true);
            }
            if frame == hold.end {
                frame_loop.input_mut().set_from_raw_code(code, false);
            }
        }

        let report = frame_loop.tick(frame as f64 * 1000.0 / fps, &mut scene);
        if report_every > 0 && (frame + 1) % report_every == 0 {
            println!(
                "frame {} t={:.3}s dt={:.4}s entities={}",
                report.frame,
                report.time,
                report.delta_time,
                report.updated
            );
            print_entities(&frame_loop, &scene);
        }
    }

    let timer = frame_loop.timer();
    println!(
        "Done: frames={} avg_dt={:.2}ms max_dt={:.2}ms entities={}",
        frame_loop.clock().frame(),
        timer.average().as_secs_f64() * 1000.0,
        timer.max().as_secs_f64() * 1000.0,
        frame_loop.entities().len()
    );
    print_entities(&frame_loop, &scene);
    print!("{}", scene.describe());
    Ok(())
}

fn inspect_model(path: &Path) -> anyhow::Result<()> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());
    let model = import_gltf(&name, path)
        .with_context(|| format!("importing {}", path.display()))?;
    println!("Model {} id={:#x} source={}", model.name, model.id.0, model.source);
    println!("Clips ({}):", model.clips.len());
    for clip in &model.clips {
        println!("  {:<24} {:.3}s", clip.name, clip.duration);
    }
    println!("Meshes ({}):", model.meshes.len());
    for mesh in &model.meshes {
        println!("  {mesh}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("menagerie-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", menagerie_common::crate_info());
            println!("input: {}", menagerie_input::crate_info());
            println!("render: {}", menagerie_render::crate_info());
            println!("assets: {}", menagerie_assets::crate_info());
            println!("ecs: {}", menagerie_ecs::crate_info());
            println!("behaviors: {}", menagerie_behaviors::crate_info());
            println!("kernel: {}", menagerie_kernel::crate_info());
        }
        Commands::Run {
            frames,
            fps,
            config,
            holds,
            report_every,
            showcase,
        } => run(frames, fps, config.as_deref(), &holds, report_every, showcase)?,
        Commands::InspectModel { path } => inspect_model(&path)?,
    }

    Ok(())
}
