//! rayloop main entry point.
//!
//! Runs one of the bundled demos on the frame loop driver, either in a
//! raylib window (feature `raylib`) or headless with a fixed dt and a frame
//! limit.
//!
//! # Running
//!
//! ```sh
//! cargo run --features raylib -- --demo mario
//! cargo run -- --demo bouncing-ball --headless --frames 120 --dump-draws
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};
use serde::Serialize;

use rayloop::backend::headless::HeadlessPlatform;
use rayloop::demos::DemoKind;
use rayloop::driver::FrameLoop;
use rayloop::error::EngineError;
use rayloop::platform::Platform;
use rayloop::render::DrawCmd;
use rayloop::resources::audio::AudioThreadFn;
use rayloop::resources::gameconfig::GameConfig;
use rayloop::systems::audio::silent_audio_thread;

const DEFAULT_HEADLESS_FRAMES: u64 = 600;

/// rayloop frame loop driver
#[derive(Parser)]
#[command(version, about = "Runs raylib sample programs on a load/update/draw/unload frame loop.")]
struct Cli {
    /// Demo to run.
    #[arg(long, value_enum, default_value = "starter")]
    demo: DemoKind,

    /// Configuration file (default: ./config.ini).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without a window.
    #[arg(long)]
    headless: bool,

    /// Headless: number of frames to run.
    #[arg(long, value_name = "N")]
    frames: Option<u64>,

    /// Headless: fixed delta time in seconds (default: 1 / target_fps).
    #[arg(long, value_name = "SECONDS")]
    dt: Option<f32>,

    /// Headless: print every frame's draw commands as a JSON line.
    #[arg(long)]
    dump_draws: bool,
}

#[derive(Serialize)]
struct FrameDump<'a> {
    frame: u64,
    commands: &'a [DrawCmd],
}

fn load_config(cli: &Cli) -> GameConfig {
    let mut config = match &cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if config.config_path.exists() {
        if let Err(e) = config.load_from_file() {
            warn!("{}; using defaults", e);
        }
    } else {
        info!(
            "No config file at {}, using defaults",
            config.config_path.display()
        );
    }
    config.title = format!("{} - {}", config.title, cli.demo.title());
    config
}

fn run_session<P: Platform>(
    demo: DemoKind,
    platform: P,
    config: GameConfig,
    audio: AudioThreadFn,
) -> Result<u64, EngineError> {
    let mut session = FrameLoop::new(demo.build(), platform, config);
    if demo.uses_audio() {
        session = session.with_audio(audio);
    }
    let summary = session.run()?;
    Ok(summary.frames)
}

fn run_headless(cli: &Cli, config: GameConfig) -> Result<u64, EngineError> {
    let (w, h) = config.window_size();
    let dt = cli
        .dt
        .unwrap_or(1.0 / config.target_fps.max(1) as f32);
    let mut platform = HeadlessPlatform::new(w as i32, h as i32)
        .with_fixed_dt(dt)
        .with_max_frames(cli.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES))
        .with_recording(false);
    if cli.dump_draws {
        platform = platform.with_sink(Box::new(|frame: u64, commands: &[DrawCmd]| {
            match serde_json::to_string(&FrameDump { frame, commands }) {
                Ok(line) => println!("{}", line),
                Err(e) => warn!("Could not serialize frame {}: {}", frame, e),
            }
        }));
    }
    run_session(cli.demo, platform, config, silent_audio_thread)
}

#[cfg(feature = "raylib")]
fn run_window(cli: &Cli, config: GameConfig) -> Result<u64, EngineError> {
    use rayloop::backend::raylib::RaylibPlatform;
    use rayloop::systems::audio::raylib_audio_thread;

    if cli.dump_draws || cli.frames.is_some() || cli.dt.is_some() {
        warn!("--dump-draws, --frames and --dt only apply to --headless runs");
    }
    let platform = RaylibPlatform::new(&config)?;
    run_session(cli.demo, platform, config, raylib_audio_thread)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli);

    #[cfg(feature = "raylib")]
    let result = if cli.headless {
        run_headless(&cli, config)
    } else {
        run_window(&cli, config)
    };
    #[cfg(not(feature = "raylib"))]
    let result = {
        if !cli.headless {
            warn!("Built without the `raylib` feature, running headless");
        }
        run_headless(&cli, config)
    };

    match result {
        Ok(frames) => info!("Exited cleanly after {} frames", frames),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
