use std::io::{self, Write};

use trailpace_core::{
    formatting::{format_clock, format_minutes, format_pace},
    report::{PaceInput, PacingReport},
    terrain::TerrainClass,
};

/// Writes a plain text rendition of a report.
pub fn write_report<W: Write>(w: &mut W, report: &PacingReport, show_terrain: bool) -> io::Result<()> {
    let e = &report.elevation;
    writeln!(w, "{}", report.name)?;
    writeln!(
        w,
        "  {:.2} km, {:.0} m up, {:.0} m down, {:.0}-{:.0} m elevation",
        e.total_distance, e.total_ascent, e.total_descent, e.min_elevation, e.max_elevation
    )?;

    if let PaceInput::TargetMinutes(target) = report.input {
        write!(w, "  Target {}", format_minutes(target))?;
        match &report.solution {
            Some(s) if s.converged => writeln!(w, ", solved in {} iterations", s.iterations)?,
            Some(s) => writeln!(w, ", NOT converged after {} iterations", s.iterations)?,
            None => writeln!(w)?,
        }
    }

    writeln!(
        w,
        "  Pace {}, estimated time {}",
        format_pace(report.base_pace),
        format_minutes(report.estimated_minutes)
    )?;

    writeln!(w)?;
    writeln!(
        w,
        "  {:>7} {:>6}  {:<8} {:>6}  {:<12} {:>8}",
        "Km", "Elev", "Terrain", "Grade", "Pace", "Time"
    )?;
    for cp in &report.checkpoints {
        let grade = cp.grade.map(|g| format!("{g:.1}%")).unwrap_or_default();
        writeln!(
            w,
            "  {:>7.2} {:>6.0}  {:<8} {:>6}  {:<12} {:>8}",
            cp.distance,
            cp.elevation,
            cp.label.to_string(),
            grade,
            format_pace(cp.pace),
            format_clock(cp.total_time)
        )?;
    }

    if show_terrain {
        writeln!(w)?;
        for run in &report.terrain_runs {
            writeln!(
                w,
                "  {:<8} {:>7.2} - {:>7.2} km {:>+6.0} m {:>6.1}%  {:<12} {:>8}",
                run.class.to_string(),
                run.start_distance,
                run.end_distance,
                run.elevation_change,
                run.average_grade,
                format_pace(run.average_pace),
                format_clock(run.estimated_time)
            )?;
        }

        writeln!(w)?;
        for class in [TerrainClass::Ascent, TerrainClass::Descent, TerrainClass::Flat] {
            let totals = report.terrain_summary.get(class);
            writeln!(
                w,
                "  {:<8} {} runs, {:.2} km, {:.0} m, {}",
                class.to_string(),
                totals.runs,
                totals.distance,
                totals.elevation,
                format_minutes(totals.estimated_time)
            )?;
        }
    }

    writeln!(w)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trailpace_core::{
        model::{Profile, ProfilePoint},
        solver::SolverParameters,
    };

    fn render(input: PaceInput, show_terrain: bool) -> String {
        let profile = Profile::with_filename(
            vec![
                ProfilePoint::new(0.0, 100.0),
                ProfilePoint::new(1.0, 150.0),
                ProfilePoint::new(2.0, 100.0),
                ProfilePoint::new(5.0, 100.0),
            ],
            "hills.json",
        );
        let report =
            PacingReport::build(&profile, input, &[1.0], &SolverParameters::default()).unwrap();

        let mut buf = Vec::new();
        write_report(&mut buf, &report, show_terrain).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_write_report_with_pace() {
        let text = render(PaceInput::Pace(5.0), false);
        assert!(text.starts_with("hills.json\n"));
        assert!(text.contains("Pace 5:00 min/km, estimated time 25m"));
        assert!(text.contains("finish"));
        assert!(text.contains("0:05:15"));
        assert!(!text.contains("Target"));
        assert!(!text.contains("runs,"));
    }

    #[test]
    fn test_write_report_with_target_and_terrain() {
        let text = render(PaceInput::TargetMinutes(50.0), true);
        assert!(text.contains("Target 50m, solved in"));
        assert!(text.contains("Ascent"));
        assert!(text.contains("runs,"));
    }
}
