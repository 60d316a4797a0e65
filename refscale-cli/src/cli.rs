use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use refscale::DEFAULT_MAX_UNITS;

#[derive(Parser)]
#[command(
    name = "refscale",
    about = "Refscale: rescale labeled measures against their largest entry",
    version
)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse an enlistment, optionally rescale it, and print every record
    Scale {
        /// Enlistment file, or `-` for stdin
        input: String,

        /// Measure the reference record is rescaled to (e.g. "1 year")
        #[arg(long)]
        scale: Option<String>,

        /// Maximum number of units per record (0 for no cap)
        #[arg(long, default_value_t = DEFAULT_MAX_UNITS)]
        units: usize,

        /// Directory of unit JSON files (defaults to $REFSCALE_UNITS_DIR, then the bundled units)
        #[arg(long)]
        units_dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the unit registry as JSON
    Units {
        /// Directory of unit JSON files (defaults to $REFSCALE_UNITS_DIR, then the bundled units)
        #[arg(long)]
        units_dir: Option<PathBuf>,
    },
}
