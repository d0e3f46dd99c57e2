use std::env;
use std::fs;

use anyhow::Context;

use licell_rs::numerics::{SolveSession, SolverProblem};
use licell_rs::parameters::{FormInput, ValidatedParameters};
use licell_rs::physics::cell::var;
use licell_rs::physics::{FIELD_NAMES, N_FIELDS};
use licell_rs::processing::{csv_writer, summary::RunSummary};

/// Grid resolution used by the command-line runner.
const GRID_NODES: usize = 50;

fn main() -> anyhow::Result<()> {
    let form = match env::args().nth(1) {
        Some(path) => FormInput::from_path(&path)
            .with_context(|| format!("reading form input from {path}"))?,
        None => reference_scenario(),
    };

    let set = form.into_parameter_set().context("parsing form fields")?;
    let params = ValidatedParameters::from_set(&set).context("validating parameters")?;

    let problem =
        SolverProblem::build(params.clone(), GRID_NODES).context("building solver problem")?;

    // Kept for reporting; the session consumes the problem itself.
    let layout = problem.layout.clone();
    let positions = problem.physics.grid.positions.clone();
    let problem_echo = problem.clone();

    let session = SolveSession::new(problem).with_logging(true);
    let report = session.run();

    fs::create_dir_all("output/main").context("creating output directory")?;

    // Time series: cell voltage is the solid potential at the cathode
    // collector (the anode collector is ground).
    let mut series: Vec<Vec<f64>> = Vec::with_capacity(report.samples.len());
    for sample in &report.samples {
        let mut full = vec![0.0; layout.len()];
        scatter(&layout, sample, &mut full);
        let voltage = full[layout.index(layout.n_nodes - 1, var::PHI1)];
        let (c_min, c_max) = concentration_range(&layout, &full);
        series.push(vec![sample.time, voltage, c_min, c_max]);
    }
    csv_writer::write_table(
        "output/main/timeseries.csv",
        &["time", "cell_voltage", "c_min", "c_max"],
        &series,
    )?;

    // Final spatial profile, one column per tracked field.
    if let Some(last) = report.samples.last() {
        let mut full = vec![0.0; layout.len()];
        scatter(&layout, last, &mut full);
        let mut rows = Vec::with_capacity(layout.n_nodes);
        for node in 0..layout.n_nodes {
            let mut row = vec![positions[node]];
            for v in 0..N_FIELDS {
                row.push(full[layout.index(node, v)]);
            }
            rows.push(row);
        }
        let headers: Vec<&str> = std::iter::once("x")
            .chain(FIELD_NAMES.iter().copied())
            .collect();
        csv_writer::write_table("output/main/final_profile.csv", &headers, &rows)?;
    }

    let summary = RunSummary::new(&params, &problem_echo, &report);
    summary.write_to_file("output/main/run_summary.txt")?;
    summary.print_to_console();

    if !report.status.is_completed() {
        anyhow::bail!("solve did not complete: see output/main/run_summary.txt");
    }
    Ok(())
}

/// Reassemble a combined state vector from a sample's split halves.
fn scatter(
    layout: &licell_rs::numerics::StateLayout,
    sample: &licell_rs::numerics::Sample,
    full: &mut [f64],
) {
    let mut d = 0;
    let mut a = 0;
    for (i, &is_diff) in layout.differential.iter().enumerate() {
        if is_diff {
            full[i] = sample.differential[d];
            d += 1;
        } else {
            full[i] = sample.algebraic[a];
            a += 1;
        }
    }
}

fn concentration_range(layout: &licell_rs::numerics::StateLayout, full: &[f64]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for node in 0..layout.n_nodes {
        let c = full[layout.index(node, var::C)];
        min = min.min(c);
        max = max.max(c);
    }
    (min, max)
}

/// The scenario the runner executes when no form file is given: one hour of
/// discharge at 10 A/m^2 with the reference geometry and materials.
fn reference_scenario() -> FormInput {
    FormInput {
        simulation_duration: Some("3600".into()),
        current_density: Some("-10".into()),
        use_default_geometry: true,
        ..FormInput::default()
    }
}
