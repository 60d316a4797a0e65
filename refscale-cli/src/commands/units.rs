use std::path::PathBuf;

use refscale::Result;

use crate::config;

pub fn run(units_dir: Option<PathBuf>) -> Result<()> {
    let registry = config::load_registry(units_dir)?;
    println!("{}", registry.to_json()?);
    Ok(())
}
