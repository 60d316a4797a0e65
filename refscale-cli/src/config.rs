//! Runtime configuration: where units come from and how loud logging is

use std::env;
use std::path::PathBuf;

use refscale::{EmbeddedRegistry, Result, TreeRegistry, UnitRegistry};
use tracing::debug;

/// Environment variable naming the default unit directory
pub const UNITS_DIR_ENV: &str = "REFSCALE_UNITS_DIR";

/// Unit directory from the flag, falling back to `REFSCALE_UNITS_DIR`
pub fn units_dir(flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or_else(|| {
        env::var_os(UNITS_DIR_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    })
}

/// Registry loaded from the configured directory, or the bundled units
pub fn load_registry(flag: Option<PathBuf>) -> Result<Box<dyn UnitRegistry>> {
    match units_dir(flag) {
        Some(dir) => {
            debug!(dir = %dir.display(), "loading units from directory");
            Ok(Box::new(TreeRegistry::from_dir(dir)?))
        }
        None => Ok(Box::new(EmbeddedRegistry::new()?)),
    }
}

/// Log directive for the number of `-v` flags
pub fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "refscale=warn",
        1 => "refscale=info",
        2 => "refscale=debug",
        _ => "refscale=trace",
    }
}
