use std::path::PathBuf;

use clap::Parser;
use eyre::Result;
use soundcalc_sdk::{
    config::zkvm_from_file,
    presets::{load_all_presets, Preset},
    report::{console_summary, write_reports},
    utils::setup_tracing_with_log_level,
};
use tracing::{info, Level};

/// Round-by-round soundness and proof size estimates for hash-based zkVMs.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bundled zkVM to analyse. Can be repeated.
    #[arg(long, value_enum)]
    preset: Vec<Preset>,

    /// TOML description of a zkVM to analyse. Can be repeated.
    #[arg(long)]
    config: Vec<PathBuf>,

    /// Directory to write markdown reports to. No reports are written if omitted.
    #[arg(long, env = "SOUNDCALC_REPORT_DIR")]
    report_dir: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: Level,
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_tracing_with_log_level(args.log_level);

    let zkvms = if args.preset.is_empty() && args.config.is_empty() {
        load_all_presets()?
    } else {
        let mut zkvms = args
            .preset
            .iter()
            .map(Preset::load)
            .collect::<Result<Vec<_>>>()?;
        for path in &args.config {
            zkvms.push(zkvm_from_file(path)?);
        }
        zkvms
    };

    for zkvm in &zkvms {
        println!("{}", console_summary(zkvm)?);
    }

    if let Some(dir) = &args.report_dir {
        let written = write_reports(&zkvms, dir)?;
        info!(num_reports = written.len(), dir = %dir.display(), "reports written");
    }
    Ok(())
}
