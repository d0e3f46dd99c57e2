use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::numerics::problem::SolverProblem;
use crate::numerics::session::{RunReport, TerminalStatus};
use crate::parameters::{MaterialMode, ValidatedParameters};

/// Human-readable record of one run: problem shape, parameter echo, outcome.
pub struct RunSummary {
    pub n_nodes: usize,
    pub anode_nodes: usize,
    pub separator_nodes: usize,
    pub cathode_nodes: usize,
    pub n_unknowns: usize,
    pub n_differential: usize,
    pub n_algebraic: usize,
    pub bandwidths: (usize, usize),

    pub simulation_duration: f64,
    pub current_density: f64,
    pub total_width: f64,
    pub material_mode: &'static str,

    pub status: String,
    pub steps: usize,
    pub samples: usize,
    pub final_time: f64,
}

impl RunSummary {
    pub fn new(params: &ValidatedParameters, problem: &SolverProblem, report: &RunReport) -> Self {
        let grid = &problem.physics.grid;
        let layout = &problem.layout;
        let status = match &report.status {
            TerminalStatus::Completed => "completed".to_string(),
            TerminalStatus::Failed(e) => format!("failed: {}", e),
            TerminalStatus::Cancelled => "cancelled".to_string(),
        };
        Self {
            n_nodes: grid.n_nodes,
            anode_nodes: grid.sep_node + 1,
            separator_nodes: grid.cath_node - grid.sep_node - 1,
            cathode_nodes: grid.n_nodes - grid.cath_node,
            n_unknowns: layout.len(),
            n_differential: layout.n_differential(),
            n_algebraic: layout.n_algebraic(),
            bandwidths: (layout.lower_bandwidth, layout.upper_bandwidth),
            simulation_duration: params.simulation_duration,
            current_density: params.current_density,
            total_width: params.total_width(),
            material_mode: match params.material_mode {
                MaterialMode::DefaultMaterials => "default table",
                MaterialMode::CustomMaterials => "user supplied",
            },
            status,
            steps: report.steps,
            samples: report.samples.len(),
            final_time: report.final_time,
        }
    }

    fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Cell Simulation Summary ===\n\n");
        out.push_str("Grid:\n");
        out.push_str(&format!(
            "  nodes: {} (anode {}, separator {}, cathode {})\n",
            self.n_nodes, self.anode_nodes, self.separator_nodes, self.cathode_nodes
        ));
        out.push_str(&format!("  cell width: {:.3e} m\n\n", self.total_width));
        out.push_str("Problem:\n");
        out.push_str(&format!(
            "  unknowns: {} ({} differential, {} algebraic)\n",
            self.n_unknowns, self.n_differential, self.n_algebraic
        ));
        out.push_str(&format!(
            "  jacobian half-bandwidths: ({}, {})\n",
            self.bandwidths.0, self.bandwidths.1
        ));
        out.push_str(&format!("  materials: {}\n", self.material_mode));
        out.push_str(&format!(
            "  current density: {:.3} A/m^2, duration: {:.1} s\n\n",
            self.current_density, self.simulation_duration
        ));
        out.push_str("Outcome:\n");
        out.push_str(&format!("  status: {}\n", self.status));
        out.push_str(&format!(
            "  steps: {}, samples: {}, final time: {:.4e} s\n",
            self.steps, self.samples, self.final_time
        ));
        out
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())
    }

    pub fn print_to_console(&self) {
        print!("{}", self.render());
    }
}
