//! Fractured Veil headless runner
//!
//! Loads the room pools, builds the simulation and drives it through the
//! fixed-timestep accumulator with a scripted wandering input. Rendering
//! and input polling live in the frontends.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use glam::Vec2;

use fractured_veil::Settings;
use fractured_veil::consts::*;
use fractured_veil::rooms::{FsRooms, scan_room_dir};
use fractured_veil::sim::{GamePhase, GameState, TickInput, tick};

#[derive(Parser, Debug)]
#[command(name = "fractured-veil", about = "Run the room-crawler simulation headless")]
struct Args {
    /// Directory holding easy/ medium/ hard/ boss/ room files
    #[arg(long, default_value = "assets/rooms")]
    rooms: PathBuf,

    /// JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 30.0)]
    seconds: f32,

    /// RNG seed (overrides the settings file)
    #[arg(long)]
    seed: Option<u64>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    dump: bool,
}

/// Fixed-step driver around the simulation
struct Runner {
    state: GameState,
    accumulator: f32,
    input: TickInput,
}

impl Runner {
    /// Run simulation ticks for one rendered frame
    fn update(&mut self, frame_dt: f32) -> Result<()> {
        let frame_dt = frame_dt.min(0.1);
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, SIM_DT)?;
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.dash = false;
            self.input.attack = false;
            self.input.switch_weapon = false;
            self.input.start = false;
            self.input.pause = false;
            self.input.restart = false;
        }
        Ok(())
    }

    /// Wander in slow circles, swinging and dashing now and then
    fn script_input(&mut self, t: f32, frame: u64) {
        let dir = Vec2::new((t * 0.7).cos(), (t * 1.3).sin());
        self.input.move_dir = dir;
        self.input.aim = dir;
        if frame % 20 == 0 {
            self.input.attack = true;
        }
        if frame % 90 == 0 {
            self.input.dash = true;
        }
        if frame % 600 == 0 {
            self.input.switch_weapon = true;
        }
        match self.state.phase {
            GamePhase::Menu => self.input.start = true,
            GamePhase::GameOver => self.input.restart = true,
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    let pools = scan_room_dir(&args.rooms);
    if pools.is_empty() {
        bail!("no room files found in {}", args.rooms.display());
    }

    let state = GameState::new(&settings, pools, Box::new(FsRooms))
        .with_context(|| format!("loading first room from {}", args.rooms.display()))?;
    log::info!("Fractured Veil (headless) starting...");

    let mut runner = Runner {
        state,
        accumulator: 0.0,
        input: TickInput::default(),
    };

    // Render frames at 60 Hz
    let frame_dt = 1.0 / 60.0;
    let frames = (args.seconds / frame_dt).ceil() as u64;
    for frame in 0..frames {
        let t = frame as f32 * frame_dt;
        runner.script_input(t, frame);
        runner.update(frame_dt)?;
    }

    let state = &runner.state;
    log::info!(
        "Done: phase {:?}, rooms {}, wave {}, score {}, hp {:.0}/{:.0}, time {:.1}s",
        state.phase,
        state.dungeon.rooms_visited,
        state.wave,
        state.score,
        state.player.hp,
        state.player.max_hp,
        state.time_elapsed,
    );

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&state.snapshot())?);
    }

    Ok(())
}
