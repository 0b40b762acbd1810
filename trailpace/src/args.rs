use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{value_parser, ArgGroup, Parser};
use trailpace_core::{
    checkpoint::uniform_checkpoint_distances,
    formatting::{parse_pace, parse_target_time},
    model::Km,
    report::PaceInput,
    solver::SolverParameters,
};

/*
 --pace=5:30 FILES                   estimate the time at a flat-ground pace
 --target=6:30 FILES                 solve for the pace that finishes in 6h 30m
 --checkpoints=10,21.1,30 FILES      add checkpoints at these distances (km)
 --uniform=5 FILES                   add 5 evenly spaced checkpoints
 --terrain FILES                     include the terrain runs in the text output
 --json FILES                        print the reports as JSON
 --xlsx FILES                        write a '.pacing.xlsx' next to each file

 FULL SYNTAX
 ===========
 (--pace M:SS | --target H:MM) [-c KM,...] [-u N] [--terrain] [--json] \
   [--xlsx [--force]] [--tolerance MIN] [--max-iterations N] FILES
*/

/// Returns the parsed command line options. Uses the 'wild' crate to do glob
/// expansion on Windows, so that Windows and Linux behave identically.
pub fn parse_args() -> Args {
    Args::parse_from(wild::args())
}

#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
#[command(group(ArgGroup::new("pacing").required(true).args(["pace", "target"])))]
pub struct Args {
    #[arg(
        short,
        long,
        help = "Flat-ground pace to estimate with, as M:SS per km",
        value_parser = parse_pace
    )]
    pub pace: Option<f64>,

    #[arg(
        short,
        long,
        help = "Target finishing time, as H:MM. The required flat-ground pace is solved for.",
        value_parser = parse_target_time
    )]
    pub target: Option<f64>,

    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Comma-separated distances, in km, at which to report checkpoints"
    )]
    pub checkpoints: Vec<f64>,

    #[arg(
        short,
        long,
        help = "Add this many evenly spaced checkpoints between the start and the finish",
        value_parser = value_parser!(u16).range(1..=200)
    )]
    pub uniform: Option<u16>,

    #[arg(long, default_value = "false", help = "Include the terrain runs in the text output")]
    pub terrain: bool,

    #[arg(long, default_value = "false", help = "Print the reports as JSON instead of text")]
    pub json: bool,

    #[arg(
        short = 'x',
        long,
        default_value = "false",
        help = "Write a summary spreadsheet next to each input file, in .pacing.xlsx format"
    )]
    pub xlsx: bool,

    #[arg(
        short,
        long,
        default_value = "false",
        help = "Overwrite output files even if they already exist"
    )]
    pub force: bool,

    #[arg(
        long,
        default_value = "0.5",
        help = "When solving for a target time, stop once the estimate is within this many minutes",
        value_parser = parse_positive
    )]
    pub tolerance: f64,

    #[arg(
        long,
        default_value = "10",
        help = "When solving for a target time, the maximum number of correction steps",
        value_parser = value_parser!(u16).range(1..=1000)
    )]
    pub max_iterations: u16,

    #[arg(required = true, help = "List of JSON profile files to process")]
    pub files: Vec<PathBuf>,
}

impl Args {
    /// How the base pace is chosen. clap guarantees exactly one of the two
    /// options is present.
    pub fn pace_input(&self) -> Result<PaceInput> {
        match (self.pace, self.target) {
            (Some(pace), None) => Ok(PaceInput::Pace(pace)),
            (None, Some(target)) => Ok(PaceInput::TargetMinutes(target)),
            _ => bail!("Exactly one of '--pace' and '--target' must be given"),
        }
    }

    pub fn solver_parameters(&self) -> SolverParameters {
        SolverParameters {
            max_iterations: self.max_iterations as usize,
            tolerance_minutes: self.tolerance,
            ..Default::default()
        }
    }

    /// The explicit checkpoints plus any uniform ones for a route of the
    /// given length. Ordering and duplicates are dealt with by the
    /// checkpoint calculation.
    pub fn checkpoint_distances(&self, total_distance: Km) -> Vec<Km> {
        let mut distances = self.checkpoints.clone();
        if let Some(count) = self.uniform {
            distances.extend(uniform_checkpoint_distances(total_distance, count as usize));
        }
        distances
    }
}

/// The spreadsheet written for an input file, e.g. "route.json" becomes
/// "route.pacing.xlsx".
pub fn xlsx_filename(input_file: &Path) -> PathBuf {
    let mut p = input_file.to_owned();
    p.set_extension("pacing.xlsx");
    p
}

fn parse_positive(s: &str) -> Result<f64, String> {
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(format!("'{s}' is not a positive number")),
    }
}
