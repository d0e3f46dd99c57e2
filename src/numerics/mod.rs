pub mod integrator;
pub mod newton;
pub mod problem;
pub mod session;
pub mod timing;

pub use integrator::{BdfIntegrator, DaeIntegrator, StepFailure, StepReport};
pub use newton::{NewtonSolver, SolverError, SolverResult};
pub use problem::{SolverProblem, StateLayout};
pub use session::{CancelToken, RunReport, Sample, SolveSession, SolveError, TerminalStatus};

use nalgebra::DVector;
use num_dual::DualDVec64;

/// Absolute/relative tolerance pair used for the weighted-RMS convergence
/// norm. Fixed configuration constants; not exposed on the input form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
        }
    }
}

impl Tolerances {
    /// Weighted RMS norm of an update `delta` against the state `y` it
    /// applies to. Values below 1 mean every component moved less than its
    /// tolerance-weighted resolution.
    pub fn wrms(&self, delta: &DVector<f64>, y: &DVector<f64>) -> f64 {
        let n = delta.len().max(1);
        let mut acc = 0.0;
        for i in 0..delta.len() {
            let w = self.atol + self.rtol * y[i].abs();
            let r = delta[i] / w;
            acc += r * r;
        }
        (acc / n as f64).sqrt()
    }
}

/// Everything an implicit DAE integrator needs from a problem: residual
/// evaluation over AD duals, the differential/algebraic split, the storage
/// coefficients of the differential rows, and the Jacobian band.
///
/// Any integrator honoring this contract can be substituted for the bundled
/// one; the problem side never learns which integrator is driving it.
pub trait DaeSystem {
    fn dim(&self) -> usize;

    /// Evaluate `F(t, y, y')`. A zero vector means `(y, y')` satisfies the
    /// governing equations at `t`.
    fn residual(
        &self,
        t: f64,
        y: &DVector<DualDVec64>,
        yp: &DVector<DualDVec64>,
    ) -> DVector<DualDVec64>;

    /// Initial values for every slot. Differential slots are prescribed;
    /// algebraic slots are a starting guess the integrator must correct.
    fn initial_state(&self) -> DVector<f64>;

    /// `true` for slots whose equation involves `y'`.
    fn differential_mask(&self) -> &[bool];

    /// Coefficient multiplying `y'` in each differential row; zero for
    /// algebraic rows.
    fn mass_coefficients(&self) -> &[f64];

    /// (lower, upper) half-bandwidths of `dF/dy`.
    fn half_bandwidths(&self) -> (usize, usize);

    /// Convergence tolerances the caller wants honored.
    fn tolerances(&self) -> Tolerances;

    /// Integration end time.
    fn end_time(&self) -> f64;
}
