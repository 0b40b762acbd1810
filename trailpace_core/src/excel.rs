use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use logging_timer::time;
use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet};

use crate::{
    formatting::{format_clock, format_minutes, format_pace},
    report::{PaceInput, PacingReport},
    terrain::TerrainClass,
};

/// Builds a workbook with a Summary sheet followed by the Checkpoints,
/// Terrain and Segments detail sheets.
#[time]
pub fn create_summary_xlsx(report: &PacingReport) -> Result<Workbook> {
    let mut workbook = Workbook::new();

    let ws = workbook.add_worksheet();
    ws.set_name("Summary")?;
    write_summary_sheet(ws, report)?;

    let ws = workbook.add_worksheet();
    ws.set_name("Checkpoints")?;
    write_checkpoints_sheet(ws, report)?;

    let ws = workbook.add_worksheet();
    ws.set_name("Terrain")?;
    write_terrain_sheet(ws, report)?;

    let ws = workbook.add_worksheet();
    ws.set_name("Segments")?;
    write_segments_sheet(ws, report)?;

    Ok(workbook)
}

pub fn write_summary_to_file<P: AsRef<Path>>(output_file: P, mut workbook: Workbook) -> Result<()> {
    let output_file = output_file.as_ref();
    workbook
        .save(output_file)
        .with_context(|| format!("Failed to save {:?}", output_file))?;
    let metadata = std::fs::metadata(output_file)?;
    info!("Summary file {:?}, {} Kb", output_file, metadata.len() / 1024);
    Ok(())
}

fn header_format() -> Format {
    Format::new().set_bold().set_align(FormatAlign::Center)
}

fn km_format() -> Format {
    Format::new().set_num_format("0.00")
}

fn metres_format() -> Format {
    Format::new().set_num_format("0")
}

fn write_headers(ws: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let format = header_format();
    for (col, h) in headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, *h, &format)?;
        ws.set_column_width(col as u16, 14)?;
    }
    ws.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_summary_sheet(ws: &mut Worksheet, report: &PacingReport) -> Result<()> {
    let bold = Format::new().set_bold();
    let km = km_format();
    let metres = metres_format();
    ws.set_column_width(0, 24)?;
    ws.set_column_width(1, 16)?;

    let mut row = 0;
    ws.write_string_with_format(row, 0, "Profile", &bold)?;
    ws.write_string(row, 1, &report.name)?;
    row += 1;

    ws.write_string_with_format(row, 0, "Distance (km)", &bold)?;
    ws.write_number_with_format(row, 1, report.elevation.total_distance, &km)?;
    row += 1;
    ws.write_string_with_format(row, 0, "Total ascent (m)", &bold)?;
    ws.write_number_with_format(row, 1, report.elevation.total_ascent, &metres)?;
    row += 1;
    ws.write_string_with_format(row, 0, "Total descent (m)", &bold)?;
    ws.write_number_with_format(row, 1, report.elevation.total_descent, &metres)?;
    row += 1;
    ws.write_string_with_format(row, 0, "Min elevation (m)", &bold)?;
    ws.write_number_with_format(row, 1, report.elevation.min_elevation, &metres)?;
    row += 1;
    ws.write_string_with_format(row, 0, "Max elevation (m)", &bold)?;
    ws.write_number_with_format(row, 1, report.elevation.max_elevation, &metres)?;
    row += 2;

    if let PaceInput::TargetMinutes(target) = report.input {
        ws.write_string_with_format(row, 0, "Target time", &bold)?;
        ws.write_string(row, 1, format_minutes(target))?;
        row += 1;
    }
    if let Some(solution) = &report.solution {
        ws.write_string_with_format(row, 0, "Solver converged", &bold)?;
        ws.write_boolean(row, 1, solution.converged)?;
        row += 1;
    }

    ws.write_string_with_format(row, 0, "Base pace", &bold)?;
    ws.write_string(row, 1, format_pace(report.base_pace))?;
    row += 1;
    ws.write_string_with_format(row, 0, "Estimated time", &bold)?;
    ws.write_string(row, 1, format_minutes(report.estimated_minutes))?;
    row += 2;

    for class in [TerrainClass::Ascent, TerrainClass::Descent, TerrainClass::Flat] {
        let totals = report.terrain_summary.get(class);
        ws.write_string_with_format(row, 0, format!("{class} runs"), &bold)?;
        ws.write_number(row, 1, totals.runs as f64)?;
        row += 1;
        ws.write_string_with_format(row, 0, format!("{class} distance (km)"), &bold)?;
        ws.write_number_with_format(row, 1, totals.distance, &km)?;
        row += 1;
        ws.write_string_with_format(row, 0, format!("{class} time"), &bold)?;
        ws.write_string(row, 1, format_minutes(totals.estimated_time))?;
        row += 1;
    }

    Ok(())
}

fn write_checkpoints_sheet(ws: &mut Worksheet, report: &PacingReport) -> Result<()> {
    write_headers(ws, &["Km", "Elevation (m)", "Terrain", "Grade (%)", "Pace", "Time"])?;
    let km = km_format();
    let metres = metres_format();

    for (idx, cp) in report.checkpoints.iter().enumerate() {
        let row = idx as u32 + 1;
        ws.write_number_with_format(row, 0, cp.distance, &km)?;
        ws.write_number_with_format(row, 1, cp.elevation, &metres)?;
        ws.write_string(row, 2, cp.label.to_string())?;
        if let Some(grade) = cp.grade {
            ws.write_number_with_format(row, 3, grade, &km)?;
        }
        ws.write_string(row, 4, format_pace(cp.pace))?;
        ws.write_string(row, 5, format_clock(cp.total_time))?;
    }

    Ok(())
}

fn write_terrain_sheet(ws: &mut Worksheet, report: &PacingReport) -> Result<()> {
    write_headers(
        ws,
        &[
            "Terrain",
            "Start (km)",
            "End (km)",
            "Distance (km)",
            "Elevation (m)",
            "Grade (%)",
            "Avg Pace",
            "Time",
        ],
    )?;
    let km = km_format();
    let metres = metres_format();

    for (idx, run) in report.terrain_runs.iter().enumerate() {
        let row = idx as u32 + 1;
        ws.write_string(row, 0, run.class.to_string())?;
        ws.write_number_with_format(row, 1, run.start_distance, &km)?;
        ws.write_number_with_format(row, 2, run.end_distance, &km)?;
        ws.write_number_with_format(row, 3, run.distance, &km)?;
        ws.write_number_with_format(row, 4, run.elevation_change, &metres)?;
        ws.write_number_with_format(row, 5, run.average_grade, &km)?;
        ws.write_string(row, 6, format_pace(run.average_pace))?;
        ws.write_string(row, 7, format_clock(run.estimated_time))?;
    }

    Ok(())
}

fn write_segments_sheet(ws: &mut Worksheet, report: &PacingReport) -> Result<()> {
    write_headers(
        ws,
        &["Start (km)", "End (km)", "Elevation (m)", "Grade (%)", "Factor", "Pace", "Minutes"],
    )?;
    let km = km_format();

    for (idx, s) in report.segments.iter().enumerate() {
        let row = idx as u32 + 1;
        ws.write_number_with_format(row, 0, s.start_distance, &km)?;
        ws.write_number_with_format(row, 1, s.end_distance, &km)?;
        ws.write_number_with_format(row, 2, s.elevation_change, &km)?;
        ws.write_number_with_format(row, 3, s.grade, &km)?;
        ws.write_number(row, 4, s.pace_factor)?;
        ws.write_string(row, 5, format_pace(s.pace))?;
        ws.write_number_with_format(row, 6, s.time_minutes, &km)?;
    }

    Ok(())
}
