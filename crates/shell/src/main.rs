//! CLI for driving the jellyfish aquarium simulation without a renderer.

mod commands;
mod scene;
pub mod utils;

use std::path::PathBuf;

use clap::Parser;
use rand::prelude::*;

use commands::Commands;
use scene::SceneConfig;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The path to a JSON or YAML scene file. The default scene is used if omitted.
    #[arg(short('c'), long)]
    scene: Option<PathBuf>,

    /// The random seed to use.
    #[arg(short('s'), long)]
    seed: Option<u64>,

    /// The name of the log-file to use.
    #[arg(short('l'), long, default_value = "jelly-shell.log")]
    log_name: String,

    /// The subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    let (_guard, log_path) = utils::configure_logger(&args.log_name)?;
    ftlog::info!("Log file: {log_path:?}");

    let mut rng = args.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);

    match args.command {
        Commands::Simulate { frames, dt, out } => {
            let scene = match &args.scene {
                Some(path) => {
                    ftlog::info!("Reading scene from {path:?}");
                    SceneConfig::read(path)?
                }
                None => SceneConfig::default(),
            };
            commands::simulate::simulate(&scene, frames, dt, &out, &mut rng)
        }
        Commands::Tentacle {
            frames,
            dt,
            num_segments,
            out,
        } => commands::tentacle::drag_tentacle(frames, dt, num_segments, &out),
        Commands::Grid {
            frames,
            segments,
            samples,
            out,
        } => commands::grid::deform_grid(frames, segments, samples, &out, &mut rng),
    }
}
