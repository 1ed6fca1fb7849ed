//! The commands under the `jelly-shell` CLI.

pub mod grid;
pub mod simulate;
pub mod tentacle;

use std::path::PathBuf;

use clap::Subcommand;

/// The subcommands of `jelly-shell`.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run jellies, fish and shrimp together in a round tank
    Simulate {
        /// The number of frames to run.
        #[arg(short('f'), long, default_value_t = 1000)]
        frames: usize,

        /// The time step of each frame.
        #[arg(short('d'), long, default_value_t = 0.01)]
        dt: f64,

        /// The path to the output CSV file.
        #[arg(short('o'), long, default_value = "simulate.csv")]
        out: PathBuf,
    },
    /// Drag a single tentacle behind a moving anchor
    Tentacle {
        /// The number of frames to run.
        #[arg(short('f'), long, default_value_t = 1000)]
        frames: usize,

        /// The time step of each frame.
        #[arg(short('d'), long, default_value_t = 0.01)]
        dt: f64,

        /// The number of segments in the tentacle.
        #[arg(short('n'), long, default_value_t = 16)]
        num_segments: usize,

        /// The path to the output CSV file.
        #[arg(short('o'), long, default_value = "tentacle.csv")]
        out: PathBuf,
    },
    /// Drive a lattice bell and deform a cloud of mesh vertices with it
    Grid {
        /// The number of frames to run.
        #[arg(short('f'), long, default_value_t = 1000)]
        frames: usize,

        /// The number of lattice segments along each side.
        #[arg(short('n'), long, default_value_t = 8)]
        segments: usize,

        /// The number of random vertices to deform each frame.
        #[arg(short('k'), long, default_value_t = 1000)]
        samples: usize,

        /// The path to the output CSV file.
        #[arg(short('o'), long, default_value = "grid.csv")]
        out: PathBuf,
    },
}
