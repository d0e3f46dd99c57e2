//! Mapping from validated parameters to the numeric problem the integrator
//! consumes: state-vector layout, differential/algebraic split, band
//! structure, initial values and the residual evaluator.

use nalgebra::DVector;
use num_dual::DualDVec64;

use crate::discretization::{CellGrid, GridError, Region};
use crate::numerics::{DaeSystem, Tolerances};
use crate::parameters::ValidatedParameters;
use crate::physics::cell::var;
use crate::physics::{CellPhysics, N_FIELDS};

/// Slot layout of the combined state vector.
///
/// Slots are node-major: node 0's five variables, then node 1's, and so on,
/// nodes ordered anode → separator → cathode. The layout is a pure function
/// of the grid and the region porosities; two problems built from identical
/// inputs get bit-identical layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct StateLayout {
    pub n_nodes: usize,
    pub n_vars: usize,
    /// Per slot: does the governing equation involve the time derivative?
    pub differential: Vec<bool>,
    /// Per slot: coefficient multiplying `y'` (zero on algebraic slots).
    pub mass: Vec<f64>,
    pub lower_bandwidth: usize,
    pub upper_bandwidth: usize,
}

impl StateLayout {
    fn for_physics(physics: &CellPhysics) -> Self {
        let grid = &physics.grid;
        let n_nodes = grid.n_nodes;
        let last = n_nodes - 1;
        let len = n_nodes * N_FIELDS;

        let mut differential = vec![false; len];
        let mut mass = vec![0.0; len];

        for node in 0..n_nodes {
            // Interior species balances carry the porosity as storage
            // coefficient; boundary and interface rows are constraints.
            let boundary =
                node == 0 || node == grid.sep_node || node == grid.cath_node || node == last;
            if !boundary {
                let eps = match grid.region_of(node) {
                    Region::Anode => physics.anode.eps,
                    Region::Separator => physics.separator.eps,
                    Region::Cathode => physics.cathode.eps,
                };
                differential[node * N_FIELDS + var::C] = true;
                mass[node * N_FIELDS + var::C] = eps;
            }
            // Solid concentration evolves wherever particles exist.
            if node <= grid.sep_node || node >= grid.cath_node {
                differential[node * N_FIELDS + var::C_S] = true;
                mass[node * N_FIELDS + var::C_S] = 1.0;
            }
        }

        // Nearest-neighbor node coupling in a node-major interleaved layout:
        // the farthest entry sits a full block plus a block-minus-one away.
        let band = 2 * N_FIELDS - 1;

        Self {
            n_nodes,
            n_vars: N_FIELDS,
            differential,
            mass,
            lower_bandwidth: band,
            upper_bandwidth: band,
        }
    }

    pub fn len(&self) -> usize {
        self.n_nodes * self.n_vars
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, node: usize, variable: usize) -> usize {
        node * self.n_vars + variable
    }

    pub fn n_differential(&self) -> usize {
        self.differential.iter().filter(|&&d| d).count()
    }

    pub fn n_algebraic(&self) -> usize {
        self.len() - self.n_differential()
    }

    /// Slot indices of the algebraic unknowns, ascending.
    pub fn algebraic_indices(&self) -> Vec<usize> {
        (0..self.len()).filter(|&i| !self.differential[i]).collect()
    }

    /// Split a combined state into its differential and algebraic parts,
    /// both in slot order.
    pub fn split(&self, y: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
        let mut diff = Vec::with_capacity(self.n_differential());
        let mut alg = Vec::with_capacity(self.n_algebraic());
        for (i, &is_diff) in self.differential.iter().enumerate() {
            if is_diff {
                diff.push(y[i]);
            } else {
                alg.push(y[i]);
            }
        }
        (DVector::from_vec(diff), DVector::from_vec(alg))
    }
}

/// Self-contained numeric problem: everything the DAE integrator needs,
/// holding no reference back to the form layer.
#[derive(Debug, Clone)]
pub struct SolverProblem {
    pub physics: CellPhysics,
    pub layout: StateLayout,
    pub y0: DVector<f64>,
    pub tolerances: Tolerances,
    pub t_end: f64,
}

impl SolverProblem {
    /// Map `params` onto `spatial_resolution` nodes. Consumes the validated
    /// record: one parameter set, one problem, one run.
    pub fn build(
        params: ValidatedParameters,
        spatial_resolution: usize,
    ) -> Result<Self, GridError> {
        let grid = CellGrid::build(
            params.anode_width,
            params.separator_width,
            params.cathode_width,
            spatial_resolution,
        )?;
        let t_end = params.simulation_duration;
        let physics = CellPhysics::new(&params, grid);
        let layout = StateLayout::for_physics(&physics);
        let y0 = initial_state(&physics, &layout);

        Ok(Self {
            physics,
            layout,
            y0,
            tolerances: Tolerances::default(),
            t_end,
        })
    }
}

/// Rest-state initial profile: uniform concentrations, potentials shifted so
/// the anode collector is ground, zero pore-wall flux. The algebraic slots
/// are a guess; the integrator's consistency correction owns them.
fn initial_state(physics: &CellPhysics, layout: &StateLayout) -> DVector<f64> {
    let (u_a, u_c) = physics.initial_ocps();
    let mut y0 = DVector::zeros(layout.len());

    for node in 0..layout.n_nodes {
        y0[layout.index(node, var::C)] = physics.c_init;
        y0[layout.index(node, var::PHI2)] = -u_a;
        match physics.grid.region_of(node) {
            Region::Anode => {
                y0[layout.index(node, var::C_S)] = physics.anode.c_s_init;
            }
            Region::Separator => {}
            Region::Cathode => {
                y0[layout.index(node, var::PHI1)] = u_c - u_a;
                y0[layout.index(node, var::C_S)] = physics.cathode.c_s_init;
            }
        }
    }
    y0
}

impl DaeSystem for SolverProblem {
    fn dim(&self) -> usize {
        self.layout.len()
    }

    fn residual(
        &self,
        t: f64,
        y: &DVector<DualDVec64>,
        yp: &DVector<DualDVec64>,
    ) -> DVector<DualDVec64> {
        self.physics.residual(t, y, yp)
    }

    fn initial_state(&self) -> DVector<f64> {
        self.y0.clone()
    }

    fn differential_mask(&self) -> &[bool] {
        &self.layout.differential
    }

    fn mass_coefficients(&self) -> &[f64] {
        &self.layout.mass
    }

    fn half_bandwidths(&self) -> (usize, usize) {
        (self.layout.lower_bandwidth, self.layout.upper_bandwidth)
    }

    fn tolerances(&self) -> Tolerances {
        self.tolerances
    }

    fn end_time(&self) -> f64 {
        self.t_end
    }
}
