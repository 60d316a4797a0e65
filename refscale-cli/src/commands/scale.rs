use std::io;
use std::path::PathBuf;

use refscale::{Enlistment, RefscaleError, Renderer, Result, UnitRegistry};
use refscale_core::ResultExt;
use serde::Serialize;
use tracing::info;

use crate::config;

/// Reads the enlistment from stdin
pub const STDIN: &str = "-";

pub struct Args {
    pub input: String,
    pub scale: Option<String>,
    pub units: usize,
    pub units_dir: Option<PathBuf>,
    pub json: bool,
}

#[derive(Serialize)]
struct RecordOutput<'a> {
    label: &'a str,
    value: f64,
    text: &'a str,
}

pub fn run(args: Args) -> Result<()> {
    let registry = config::load_registry(args.units_dir)?;
    let enlistment = read_enlistment(&args.input, &*registry)?;

    let enlistment = match &args.scale {
        Some(text) => enlistment.scaled_to(text)?,
        None => enlistment,
    };
    info!(records = enlistment.len(), units = args.units, "rendering enlistment");

    let renderer = Renderer::new(args.units);
    if args.json {
        let texts = renderer.render_values(enlistment.records(), enlistment.group());
        let rows: Vec<RecordOutput> = enlistment
            .records()
            .iter()
            .zip(&texts)
            .map(|(record, text)| RecordOutput {
                label: record.label(),
                value: record.value(),
                text,
            })
            .collect();
        let json = serde_json::to_string_pretty(&rows)
            .map_err(|e| RefscaleError::encode("records", e.to_string()))?;
        println!("{json}");
    } else {
        for line in renderer.render(enlistment.records(), enlistment.group()) {
            println!("{line}");
        }
    }
    Ok(())
}

fn read_enlistment<'g>(input: &str, registry: &'g dyn UnitRegistry) -> Result<Enlistment<'g>> {
    if input == STDIN {
        Enlistment::parse(io::stdin().lock(), registry).context("failed to load enlistment from stdin")
    } else {
        Enlistment::from_path(input, registry)
    }
}
