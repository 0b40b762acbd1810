use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use args::{parse_args, xlsx_filename, Args};
use clap::builder::styling::AnsiColor;
use display::write_report;
use env_logger::Builder;
use log::{debug, error, info, warn};
use logging_timer::time;
use rayon::prelude::*;
use trailpace_core::{
    excel::{create_summary_xlsx, write_summary_to_file},
    profile_reader::read_profile_from_file,
    report::{PaceInput, PacingReport},
    solver::SolverParameters,
};

mod args;
mod display;

pub const PROGRAM_NAME: &str = env!("CARGO_PKG_NAME");

#[time]
fn main() -> Result<()> {
    configure_logging();
    info!("Starting {PROGRAM_NAME}");

    let args = parse_args();
    debug!("{:?}", &args);
    if args.force {
        info!("'--force' specified, all existing output files will be overwritten");
    }

    let input = args.pace_input()?;
    let solver = args.solver_parameters();

    // Each file is independent, so they are processed in parallel. The
    // results come back in input order.
    let results: Vec<(PathBuf, Result<PacingReport>)> = args
        .files
        .par_iter()
        .map(|f| (f.clone(), process_file(f, &args, input, &solver)))
        .collect();

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (file, result) in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                error!("{:?}: {e:#}", file);
                failures += 1;
            }
        }
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &reports)?;
        writeln!(out)?;
    } else {
        for report in &reports {
            write_report(&mut out, report, args.terrain)?;
        }
    }

    if failures > 0 {
        bail!("{failures} of {} files could not be processed", args.files.len());
    }

    Ok(())
}

fn process_file(
    file: &Path,
    args: &Args,
    input: PaceInput,
    solver: &SolverParameters,
) -> Result<PacingReport> {
    let profile = read_profile_from_file(file)?;
    let distances = args.checkpoint_distances(profile.total_distance_km());
    let report = PacingReport::build(&profile, input, &distances, solver)
        .with_context(|| format!("Could not estimate a pace for {:?}", file))?;

    if args.xlsx {
        let output_file = xlsx_filename(file);
        if output_file.exists() && !args.force {
            warn!("{:?} already exists, skipping it. Use '--force' to overwrite", output_file);
        } else {
            let workbook = create_summary_xlsx(&report)?;
            write_summary_to_file(&output_file, workbook)?;
        }
    }

    Ok(report)
}

/// Logs go to stderr, coloured by level and tagged with the source location.
/// The filter comes from RUST_LOG.
fn configure_logging() {
    Builder::from_default_env()
        .format(|buf, record| {
            let colour = match record.level() {
                log::Level::Error => AnsiColor::Red,
                log::Level::Warn => AnsiColor::Yellow,
                log::Level::Info => AnsiColor::Green,
                log::Level::Debug => AnsiColor::Blue,
                log::Level::Trace => AnsiColor::Magenta,
            };
            let level_style = buf
                .default_level_style(record.level())
                .fg_color(Some(colour.into()));

            let location = match (record.file(), record.line()) {
                (Some(file), Some(line)) => format!(" {file}:{line}"),
                (Some(file), None) => format!(" {file}"),
                _ => String::new(),
            };

            writeln!(
                buf,
                "[{} {level_style}{}{level_style:#}{location}] {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        })
        .init();
}
