use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use clap::Args;
use gspice_sch::{Schematic, write_netlist};
use log::info;

#[derive(Args, Debug)]
#[command(about = "Generate a numbered netlist from a schematic snapshot")]
pub struct NetlistArgs {
    /// Schematic snapshot (JSON) to convert
    #[arg(value_name = "SCHEMATIC", value_hint = clap::ValueHint::FilePath)]
    pub schematic: PathBuf,

    /// Output file. Overwritten in full on every run.
    #[arg(short, long, default_value = "output.txt", value_hint = clap::ValueHint::FilePath, conflicts_with = "stdout")]
    pub output: PathBuf,

    /// Print the netlist to stdout instead of writing a file
    #[arg(long = "stdout")]
    pub stdout: bool,
}

pub fn execute(args: NetlistArgs) -> Result<()> {
    let schematic = Schematic::load(&args.schematic)
        .with_context(|| format!("Failed to load schematic {}", args.schematic.display()))?;

    let rows = schematic.generate_netlist();

    // Render into a buffer first so the file write is all-or-nothing.
    let mut buf: Vec<u8> = Vec::new();
    write_netlist(&rows, &mut buf)?;

    if args.stdout {
        std::io::stdout().write_all(&buf)?;
        return Ok(());
    }

    AtomicFile::new(&args.output, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(&buf)?;
            f.flush()
        })
        .map_err(|err| anyhow::anyhow!("Failed to write netlist to {}: {err}", args.output.display()))?;

    info!("wrote {} row(s) to {}", rows.len(), args.output.display());
    Ok(())
}
